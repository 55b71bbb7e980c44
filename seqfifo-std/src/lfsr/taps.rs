//! Feedback tap masks.

use seqfifo::{MAX_WIDTH, MIN_WIDTH};
use static_assertions::const_assert_eq;

/// Maximal-length XNOR tap masks, indexed by `width - MIN_WIDTH`.
///
/// Bit `i` of an entry taps register bit `i`; the register shifts towards the MSB and the feedback enters at bit 0.
/// Every entry taps the MSB and encodes a primitive polynomial (Xilinx XAPP052), so the plain rule cycles through
/// every state except all-ones.
const TAPS: [u32; 31] = [
    0x0000_0003, // 2
    0x0000_0006, // 3
    0x0000_000c, // 4
    0x0000_0014, // 5
    0x0000_0030, // 6
    0x0000_0060, // 7
    0x0000_00b8, // 8
    0x0000_0110, // 9
    0x0000_0240, // 10
    0x0000_0500, // 11
    0x0000_0829, // 12
    0x0000_100d, // 13
    0x0000_2015, // 14
    0x0000_6000, // 15
    0x0000_d008, // 16
    0x0001_2000, // 17
    0x0002_0400, // 18
    0x0004_0023, // 19
    0x0009_0000, // 20
    0x0014_0000, // 21
    0x0030_0000, // 22
    0x0042_0000, // 23
    0x00e1_0000, // 24
    0x0120_0000, // 25
    0x0200_0023, // 26
    0x0400_0013, // 27
    0x0900_0000, // 28
    0x1400_0000, // 29
    0x2000_0029, // 30
    0x4800_0000, // 31
    0x8020_0003, // 32
];

const_assert_eq!(TAPS.len(), (MAX_WIDTH - MIN_WIDTH + 1) as usize);

/// Returns the tap mask for `width`, or `None` if the width is unsupported.
pub(crate) fn taps(width: u32) -> Option<u32> {
    if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
        return None;
    }
    TAPS.get((width - MIN_WIDTH) as usize).copied()
}
