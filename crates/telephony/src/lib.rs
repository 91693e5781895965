//! Call state detection for calldetect.
//!
//! Turns the OS's memoryless phone states into call lifecycle events:
//!
//! ```text
//! OS telephony ──► RawStateListener ──► CallStateClassifier ──► EventBus
//!   (source)          (subscribe)         (two-flag history)     (host)
//! ```
//!
//! | history      | Idle           | OffHook   | Ringing    |
//! |--------------|----------------|-----------|------------|
//! | was off-hook | `Disconnected` | `Offhook` | `Incoming` |
//! | was ringing  | `Missed`       | `Offhook` | `Incoming` |
//! | none         | -              | `Offhook` | `Incoming` |
//!
//! # Example
//!
//! ```
//! use calldetect_events::{event_names, InMemoryEventBus};
//! use calldetect_telephony::{CallDetector, DetectorConfig, HostTelephonySource};
//! use std::sync::Arc;
//!
//! let source = Arc::new(HostTelephonySource::new());
//! let bus = Arc::new(InMemoryEventBus::new());
//! let mut detector = CallDetector::new(source.clone(), bus.clone()).with_config(DetectorConfig {
//!     read_phone_number: true,
//!     ..Default::default()
//! });
//!
//! detector.start_listener().unwrap();
//! source.notify(1, Some("555-0100"));
//! source.notify(0, None);
//!
//! assert_eq!(
//!     bus.payloads_for(event_names::PHONE_CALL_STATE_UPDATE),
//!     vec!["Incoming|555-0100", "Missed|"]
//! );
//! ```

mod classifier;
mod config;
mod detector;
mod error;
mod lifecycle;
mod listener;
mod permission;
mod source;
mod state;

pub use classifier::*;
pub use config::*;
pub use detector::*;
pub use error::*;
pub use lifecycle::*;
pub use listener::*;
pub use permission::*;
pub use source::*;
pub use state::*;
