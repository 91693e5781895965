//! Raw telephony states as reported by the OS.

use crate::error::DetectError;
use serde::{Deserialize, Serialize};

/// Instantaneous phone state. Carries no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawState {
    /// No call activity.
    Idle,
    /// A call is ringing.
    Ringing,
    /// A call is dialing, active or on hold.
    OffHook,
}

impl RawState {
    pub const IDLE_CODE: i32 = 0;
    pub const RINGING_CODE: i32 = 1;
    pub const OFF_HOOK_CODE: i32 = 2;

    /// Platform state code for this state.
    pub fn code(self) -> i32 {
        match self {
            RawState::Idle => Self::IDLE_CODE,
            RawState::Ringing => Self::RINGING_CODE,
            RawState::OffHook => Self::OFF_HOOK_CODE,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, DetectError> {
        match code {
            Self::IDLE_CODE => Ok(RawState::Idle),
            Self::RINGING_CODE => Ok(RawState::Ringing),
            Self::OFF_HOOK_CODE => Ok(RawState::OffHook),
            other => Err(DetectError::InvalidState(other)),
        }
    }
}

impl TryFrom<i32> for RawState {
    type Error = DetectError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}
