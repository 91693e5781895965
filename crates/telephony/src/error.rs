//! Error types for call detection.

use thiserror::Error;

/// Errors surfaced by the listener control surface.
///
/// The classifier itself never fails; everything here originates in the
/// interaction with the OS telephony service or in host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The OS telephony service handle could not be obtained.
    #[error("telephony service unavailable")]
    ServiceUnavailable,

    /// The host process lacks permission to read phone state.
    #[error("permission to read phone state denied")]
    PermissionDenied,

    /// The OS reported a call state code outside idle/ringing/off-hook.
    #[error("unrecognized call state code: {0}")]
    InvalidState(i32),

    #[error("invalid detector configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DetectError>;
