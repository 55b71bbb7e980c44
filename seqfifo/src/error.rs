//! Configuration errors.

use thiserror::Error;

use crate::utils::{MAX_WIDTH, MIN_WIDTH};

/// Rejected construction-time configuration.
///
/// Every variant is produced by a constructor. Run-time conditions such as a full queue are reported through
/// [`Handshake`](crate::Handshake) instead.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("width {width} is outside the supported range {}..={}", MIN_WIDTH, MAX_WIDTH)]
    WidthOutOfRange { width: u32 },

    #[error("{field} {value:#x} is not representable in {width} bits")]
    NotRepresentable { field: &'static str, value: u32, width: u32 },

    #[error("{field} {value:#x} is the excluded lock-up state")]
    LockupState { field: &'static str, value: u32 },

    #[error("reset state {reset_state:#x} lies in the run skipped by {from:#x} -> {to:#x}")]
    UnreachableReset { reset_state: u32, from: u32, to: u32 },

    #[error("a queue needs at least one read requester")]
    NoRequesters,
}
