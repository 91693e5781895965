//! Event bus abstraction for decoupled event emission.
//!
//! The detector only knows how to hand a topic and a payload to something
//! that implements [`EventBus`]. The Tauri plugin forwards to the webview,
//! tests capture into an [`InMemoryEventBus`].

use std::sync::{Arc, Mutex};

/// Trait for emitting events to the host application.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name (e.g., "PhoneCallStateUpdate")
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// In-memory event bus for testing.
///
/// Captures all emitted events for later inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

/// A captured event from InMemoryEventBus.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl EmittedEvent {
    /// The payload as a string, if it is one.
    pub fn payload_str(&self) -> Option<&str> {
        self.payload.as_str()
    }
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get events for a specific topic.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// String payloads emitted on `topic`, in order.
    pub fn payloads_for(&self, topic: &str) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.topic == topic)
            .filter_map(|e| e.payload_str().map(String::from))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EmittedEvent>> {
        // A panicking test thread must not hide the events it already saw.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.lock().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}
