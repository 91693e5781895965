//! Telephony source traits.
//!
//! These traits abstract the OS telephony service so the listener can be
//! driven by a real platform shim or by a fake in tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{DetectError, Result};
use crate::state::RawState;

/// Something that can receive raw state notifications.
pub trait RawStateReceiver: Send + Sync {
    fn on_raw_state(&self, state: RawState, phone_number: Option<&str>);
}

impl<F> RawStateReceiver for F
where
    F: Fn(RawState, Option<&str>) + Send + Sync,
{
    fn on_raw_state(&self, state: RawState, phone_number: Option<&str>) {
        self(state, phone_number)
    }
}

/// Type alias for shared receiver reference.
pub type ReceiverRef = Arc<dyn RawStateReceiver>;

/// Handle for one active subscription to a [`TelephonySource`].
///
/// Not `Clone`: whoever holds it owns the subscription and must hand it back
/// through [`TelephonySource::unregister`].
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    id: u64,
}

impl Registration {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// The OS telephony service.
pub trait TelephonySource: Send + Sync {
    /// Subscribe `receiver` to call state notifications.
    fn register(&self, receiver: ReceiverRef) -> Result<Registration>;

    /// Cancel a subscription obtained from [`register`](Self::register).
    fn unregister(&self, registration: Registration) -> Result<()>;
}

/// Type alias for shared source reference.
pub type SourceRef = Arc<dyn TelephonySource>;

/// Source for platforms without a telephony service.
pub struct NullTelephonySource;

impl TelephonySource for NullTelephonySource {
    fn register(&self, _receiver: ReceiverRef) -> Result<Registration> {
        Err(DetectError::ServiceUnavailable)
    }

    fn unregister(&self, _registration: Registration) -> Result<()> {
        Ok(())
    }
}

/// Telephony source fed by the host platform layer.
///
/// The native side of the host (or a test) pushes each OS notification with
/// [`notify`](Self::notify); every registered receiver gets it synchronously,
/// in push order.
pub struct HostTelephonySource {
    receivers: Mutex<Vec<(u64, ReceiverRef)>>,
    next_id: AtomicU64,
    available: AtomicBool,
    permission_granted: AtomicBool,
}

impl Default for HostTelephonySource {
    fn default() -> Self {
        Self {
            receivers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            available: AtomicBool::new(true),
            permission_granted: AtomicBool::new(true),
        }
    }
}

impl HostTelephonySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the underlying service as reachable or not.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Record whether the OS granted the phone state permission.
    pub fn set_permission_granted(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    /// Number of active subscriptions.
    pub fn registration_count(&self) -> usize {
        self.receivers().len()
    }

    /// Deliver a platform state code. Unknown codes are dropped.
    pub fn notify(&self, code: i32, phone_number: Option<&str>) {
        match RawState::from_code(code) {
            Ok(state) => self.notify_state(state, phone_number),
            Err(e) => tracing::warn!(code, "ignoring call state notification: {}", e),
        }
    }

    /// Deliver a raw state to every registered receiver.
    pub fn notify_state(&self, state: RawState, phone_number: Option<&str>) {
        // Snapshot so a receiver may unregister from inside its callback.
        let receivers: Vec<ReceiverRef> = self
            .receivers()
            .iter()
            .map(|(_, receiver)| Arc::clone(receiver))
            .collect();

        for receiver in receivers {
            receiver.on_raw_state(state, phone_number);
        }
    }

    fn receivers(&self) -> MutexGuard<'_, Vec<(u64, ReceiverRef)>> {
        self.receivers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TelephonySource for HostTelephonySource {
    fn register(&self, receiver: ReceiverRef) -> Result<Registration> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DetectError::ServiceUnavailable);
        }
        if !self.permission_granted.load(Ordering::SeqCst) {
            return Err(DetectError::PermissionDenied);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.receivers().push((id, receiver));
        Ok(Registration::new(id))
    }

    fn unregister(&self, registration: Registration) -> Result<()> {
        self.receivers().retain(|(id, _)| *id != registration.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_receiver() -> (ReceiverRef, Arc<Mutex<Vec<(RawState, Option<String>)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let receiver: ReceiverRef = Arc::new(move |state: RawState, number: Option<&str>| {
            sink.lock().unwrap().push((state, number.map(String::from)));
        });
        (receiver, seen)
    }

    #[test]
    fn test_null_source_is_unavailable() {
        let (receiver, _) = recording_receiver();
        assert_eq!(
            NullTelephonySource.register(receiver),
            Err(DetectError::ServiceUnavailable)
        );
    }

    #[test]
    fn test_host_source_delivers_in_order() {
        let source = HostTelephonySource::new();
        let (receiver, seen) = recording_receiver();
        source.register(receiver).unwrap();

        source.notify(1, Some("555"));
        source.notify(2, Some("555"));
        source.notify(0, None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (RawState::Ringing, Some("555".to_string())),
                (RawState::OffHook, Some("555".to_string())),
                (RawState::Idle, None),
            ]
        );
    }

    #[test]
    fn test_host_source_drops_unknown_codes() {
        let source = HostTelephonySource::new();
        let (receiver, seen) = recording_receiver();
        source.register(receiver).unwrap();

        source.notify(7, Some("555"));

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let source = HostTelephonySource::new();
        let (receiver, seen) = recording_receiver();
        let registration = source.register(receiver).unwrap();
        assert_eq!(source.registration_count(), 1);

        source.unregister(registration).unwrap();
        source.notify(1, None);

        assert_eq!(source.registration_count(), 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_register_failures() {
        let source = HostTelephonySource::new();

        source.set_available(false);
        let (receiver, _) = recording_receiver();
        assert_eq!(
            source.register(receiver.clone()),
            Err(DetectError::ServiceUnavailable)
        );

        source.set_available(true);
        source.set_permission_granted(false);
        assert_eq!(source.register(receiver), Err(DetectError::PermissionDenied));
        assert_eq!(source.registration_count(), 0);
    }
}
