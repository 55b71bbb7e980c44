//! Valid, ready and handshake signals.

/// Forward half of a valid/ready channel: a payload qualified by a valid bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Valid<V> {
    /// Inner data
    pub inner: V,

    /// Valid bit
    pub valid: bool,
}

impl<V> Valid<V> {
    /// Creates a payload with the given valid bit.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner, valid } }

    /// Creates a valid payload.
    pub fn valid(inner: V) -> Self { Self::new(true, inner) }

    /// Returns the payload if valid.
    pub fn into_option(self) -> Option<V> {
        if self.valid {
            Some(self.inner)
        } else {
            None
        }
    }

    /// Maps the payload, keeping the valid bit.
    pub fn map<W, F: FnOnce(V) -> W>(self, f: F) -> Valid<W> { Valid { inner: f(self.inner), valid: self.valid } }
}

impl<V: Default> Valid<V> {
    /// Creates an invalid payload.
    pub fn invalid() -> Self { Self::new(false, V::default()) }
}

impl<V: Default> From<Option<V>> for Valid<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(inner) => Self::valid(inner),
            None => Self::invalid(),
        }
    }
}

/// Ready signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl Ready {
    /// Creates a new ready signal.
    pub fn new(ready: bool) -> Self { Self { ready } }
}

/// Response to a request in the tick it was presented.
///
/// - `Acknowledge`: the transaction is accepted and final.
/// - `Stall`: the target cannot take it this tick; the requester must hold the request unchanged and
///   present it again.
/// - `Retry`: the target refuses for lack of capacity (full on write, empty on read); the requester may
///   withdraw with no side effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Handshake {
    /// No request was presented.
    #[default]
    Idle,
    /// Accepted.
    Acknowledge,
    /// Backpressure.
    Stall,
    /// Refused.
    Retry,
}

impl Handshake {
    /// Acknowledge bit.
    pub fn acknowledge(self) -> bool { self == Self::Acknowledge }

    /// Stall bit.
    pub fn stall(self) -> bool { self == Self::Stall }

    /// Retry bit.
    pub fn retry(self) -> bool { self == Self::Retry }

    /// Returns `true` if no request was presented.
    pub fn is_idle(self) -> bool { self == Self::Idle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_option_conversion() {
        assert_eq!(Valid::valid(7u32).into_option(), Some(7));
        assert_eq!(Valid::<u32>::invalid().into_option(), None);
        assert_eq!(Valid::from(Some(3u8)), Valid::new(true, 3));
        assert!(!Valid::<u8>::from(None).valid);
        assert_eq!(Valid::valid(2u32).map(|x| x * 2), Valid::valid(4));
    }

    #[test]
    fn handshake_bits_are_exclusive() {
        for handshake in [Handshake::Idle, Handshake::Acknowledge, Handshake::Stall, Handshake::Retry] {
            let bits = [handshake.acknowledge(), handshake.stall(), handshake.retry()];
            let set = bits.iter().filter(|bit| **bit).count();
            assert_eq!(set, usize::from(!handshake.is_idle()));
        }
    }
}
