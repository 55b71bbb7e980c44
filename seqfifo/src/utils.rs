//! Utilities.

use arrayvec::ArrayVec;

/// Narrowest supported register width.
pub const MIN_WIDTH: u32 = 2;

/// Widest supported register width.
pub const MAX_WIDTH: u32 = 32;

/// Returns the mask selecting the low `width` bits.
///
/// `width` must not exceed [`MAX_WIDTH`].
pub const fn mask(width: u32) -> u32 {
    if width >= u32::BITS {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Returns `true` if `value` fits in `width` bits.
pub const fn is_representable(value: u32, width: u32) -> bool { value & !mask(width) == 0 }

/// XNOR reduction: `true` when `value` has an even number of set bits.
pub const fn xnor_reduce(value: u32) -> bool { value.count_ones() % 2 == 0 }

/// Returns bit-represented value of an integer, LSB first.
pub fn u32_to_bits<const N: usize>(value: u32) -> [bool; N] {
    (0..N)
        .map(|i| if i >= u32::BITS as usize { false } else { (value & (1 << i)) != 0 })
        .collect::<ArrayVec<bool, N>>()
        .into_inner()
        .unwrap()
}

/// Packs bits, LSB first, into an integer. Bits beyond the 32nd are dropped.
pub fn bits_to_u32(bits: &[bool]) -> u32 {
    bits.iter().take(u32::BITS as usize).enumerate().fold(0, |acc, (i, bit)| acc | (u32::from(*bit) << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_covers_full_range() {
        assert_eq!(mask(2), 0b11);
        assert_eq!(mask(5), 0b1_1111);
        assert_eq!(mask(31), 0x7fff_ffff);
        assert_eq!(mask(32), u32::MAX);
    }

    #[test]
    fn representable() {
        assert!(is_representable(3, 2));
        assert!(!is_representable(4, 2));
        assert!(is_representable(u32::MAX, 32));
    }

    #[test]
    fn xnor_is_even_parity() {
        assert!(xnor_reduce(0));
        assert!(!xnor_reduce(0b1));
        assert!(xnor_reduce(0b11));
        assert!(!xnor_reduce(0b1011));
    }

    #[test]
    fn bits_conversion() {
        assert_eq!(u32_to_bits::<4>(0b0101), [true, false, true, false]);
        assert_eq!(bits_to_u32(&[true, false, true, false]), 0b0101);
        assert_eq!(bits_to_u32(&u32_to_bits::<3>(0b110)), 0b110);
    }
}
