//! Shared event contracts between the call detector and the host application.
//!
//! The host receives a single event, [`event_names::PHONE_CALL_STATE_UPDATE`],
//! whose payload is a plain string `eventName|phoneNumber`. This crate owns
//! both directions of that encoding so the detector and any host-side
//! consumer agree on it.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{EmittedEvent, EventBus, EventBusRef, InMemoryEventBus};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the event name and the phone number in a payload.
pub const PAYLOAD_DELIMITER: char = '|';

/// Higher-level call lifecycle event derived from raw phone states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallEvent {
    /// The phone started ringing.
    Incoming,
    /// A call is active (answered or outgoing).
    Offhook,
    /// An active call ended.
    Disconnected,
    /// A ringing call ended without ever being answered.
    Missed,
}

impl CallEvent {
    pub const ALL: [CallEvent; 4] = [
        CallEvent::Incoming,
        CallEvent::Offhook,
        CallEvent::Disconnected,
        CallEvent::Missed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CallEvent::Incoming => "Incoming",
            CallEvent::Offhook => "Offhook",
            CallEvent::Disconnected => "Disconnected",
            CallEvent::Missed => "Missed",
        }
    }
}

impl fmt::Display for CallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallEvent {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CallEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| PayloadError::UnknownEvent(s.to_string()))
    }
}

/// Errors decoding a `PhoneCallStateUpdate` payload on the host side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("unknown call event: {0:?}")]
    UnknownEvent(String),
}

/// Event emitted to the host whenever the classifier derives a call event.
///
/// Producers: telephony crate (call detector)
/// Consumers: host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneCallStateUpdate {
    pub event: CallEvent,
    /// Phone number attached by the OS. Empty when the OS provided none.
    pub phone_number: String,
}

impl PhoneCallStateUpdate {
    pub fn new(event: CallEvent, phone_number: Option<&str>) -> Self {
        Self {
            event,
            phone_number: phone_number.unwrap_or_default().to_string(),
        }
    }

    /// Encode as `eventName|phoneNumber`.
    ///
    /// The phone number is written verbatim; a `|` inside it is not escaped.
    pub fn to_payload(&self) -> String {
        format!("{}{}{}", self.event, PAYLOAD_DELIMITER, self.phone_number)
    }

    /// Decode a payload produced by [`to_payload`](Self::to_payload).
    ///
    /// Splits on the first delimiter, so the event name is always recovered
    /// and anything after it belongs to the phone number. A payload without
    /// a delimiter is a bare event name with no number.
    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        let (event, phone_number) = payload
            .split_once(PAYLOAD_DELIMITER)
            .unwrap_or((payload, ""));

        Ok(Self {
            event: event.parse()?,
            phone_number: phone_number.to_string(),
        })
    }

    /// The phone number, or `None` when the OS did not provide one.
    pub fn phone_number(&self) -> Option<&str> {
        if self.phone_number.is_empty() {
            None
        } else {
            Some(&self.phone_number)
        }
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Call state update emitted to the host application.
    pub const PHONE_CALL_STATE_UPDATE: &str = "PhoneCallStateUpdate";

    /// The user refused the phone state permission. Payload is the reason
    /// string `"PERMISSION DENIED"`.
    pub const PERMISSION_DENIED: &str = "CallDetectPermissionDenied";
}

/// Read-only map of the event name literals, exposed to the host so it can
/// compare against constants instead of strings.
pub fn event_constants() -> BTreeMap<&'static str, &'static str> {
    CallEvent::ALL
        .into_iter()
        .map(|event| (event.as_str(), event.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_number() {
        let update = PhoneCallStateUpdate::new(CallEvent::Incoming, Some("+15551234"));
        assert_eq!(update.to_payload(), "Incoming|+15551234");
    }

    #[test]
    fn test_payload_without_number() {
        let update = PhoneCallStateUpdate::new(CallEvent::Missed, None);
        assert_eq!(update.to_payload(), "Missed|");
        assert_eq!(update.phone_number(), None);
    }

    #[test]
    fn test_parse_payload() {
        let update = PhoneCallStateUpdate::from_payload("Disconnected|555-0100").unwrap();
        assert_eq!(update.event, CallEvent::Disconnected);
        assert_eq!(update.phone_number(), Some("555-0100"));
    }

    #[test]
    fn test_parse_payload_empty_number_is_none() {
        let update = PhoneCallStateUpdate::from_payload("Offhook|").unwrap();
        assert_eq!(update.event, CallEvent::Offhook);
        assert_eq!(update.phone_number(), None);
    }

    #[test]
    fn test_parse_payload_keeps_delimiter_in_number() {
        let update = PhoneCallStateUpdate::from_payload("Incoming|12|34").unwrap();
        assert_eq!(update.event, CallEvent::Incoming);
        assert_eq!(update.phone_number, "12|34");
    }

    #[test]
    fn test_parse_payload_without_delimiter_has_no_number() {
        let update = PhoneCallStateUpdate::from_payload("Incoming").unwrap();
        assert_eq!(update.event, CallEvent::Incoming);
        assert_eq!(update.phone_number(), None);
    }

    #[test]
    fn test_parse_payload_errors() {
        assert_eq!(
            PhoneCallStateUpdate::from_payload("Bogus"),
            Err(PayloadError::UnknownEvent("Bogus".to_string()))
        );
        assert_eq!(
            PhoneCallStateUpdate::from_payload("Ringing|555"),
            Err(PayloadError::UnknownEvent("Ringing".to_string()))
        );
    }

    #[test]
    fn test_event_constants_map_to_themselves() {
        let constants = event_constants();
        assert_eq!(constants.len(), 4);
        for (key, value) in &constants {
            assert_eq!(key, value);
        }
        assert_eq!(constants.get("Offhook"), Some(&"Offhook"));
        assert_eq!(constants.get("Missed"), Some(&"Missed"));
    }

    #[test]
    fn test_call_event_serde_uses_event_names() {
        let json = serde_json::to_string(&CallEvent::Disconnected).unwrap();
        assert_eq!(json, "\"Disconnected\"");

        let event: CallEvent = serde_json::from_str("\"Offhook\"").unwrap();
        assert_eq!(event, CallEvent::Offhook);
    }
}
