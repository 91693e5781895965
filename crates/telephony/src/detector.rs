//! Call detector: the control surface exposed to the host application.
//!
//! Ties a [`RawStateListener`] to a [`CallStateClassifier`] and forwards every
//! derived event to an [`EventBus`] as a `PhoneCallStateUpdate` payload.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use calldetect_events::{event_constants, event_names, EventBusRef};

use crate::classifier::CallStateClassifier;
use crate::config::DetectorConfig;
use crate::error::Result;
use crate::listener::RawStateListener;
use crate::permission::{
    AlwaysGranted, PermissionDeniedCallback, PermissionProviderRef, PERMISSION_DENIED,
};
use crate::source::{RawStateReceiver, ReceiverRef, SourceRef};
use crate::state::RawState;

/// Receiver that classifies raw states and emits the resulting events.
///
/// One instance per listening session, so history never leaks across a
/// stop/start cycle.
struct ClassifyingReceiver {
    classifier: Mutex<CallStateClassifier>,
    bus: EventBusRef,
    read_phone_number: bool,
}

impl RawStateReceiver for ClassifyingReceiver {
    fn on_raw_state(&self, state: RawState, phone_number: Option<&str>) {
        let phone_number = phone_number.filter(|_| self.read_phone_number);

        let update = {
            let mut classifier = self.classifier.lock().unwrap_or_else(|e| e.into_inner());
            classifier.transition(state, phone_number)
        };

        let Some(update) = update else {
            tracing::debug!(?state, "no call event");
            return;
        };

        tracing::debug!(
            ?state,
            event = %update.event,
            has_number = !update.phone_number.is_empty(),
            "call event"
        );
        self.bus.emit(
            event_names::PHONE_CALL_STATE_UPDATE,
            serde_json::Value::String(update.to_payload()),
        );
    }
}

pub struct CallDetector {
    source: SourceRef,
    bus: EventBusRef,
    permissions: PermissionProviderRef,
    config: DetectorConfig,
    permission_denied: Option<PermissionDeniedCallback>,
    listener: Option<RawStateListener>,
    /// The host asked for listening and has not asked to stop.
    pub(crate) requested: bool,
    permission_asked: bool,
}

impl CallDetector {
    pub fn new(source: SourceRef, bus: EventBusRef) -> Self {
        Self {
            source,
            bus,
            permissions: Arc::new(AlwaysGranted),
            config: DetectorConfig::default(),
            permission_denied: None,
            listener: None,
            requested: false,
            permission_asked: false,
        }
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_permissions(mut self, permissions: PermissionProviderRef) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn on_permission_denied(mut self, callback: PermissionDeniedCallback) -> Self {
        self.permission_denied = Some(callback);
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Start listening for call state changes.
    ///
    /// Idempotent: while already listening this does nothing, so a real
    /// transition is never delivered twice. Fails with `ServiceUnavailable`
    /// or `PermissionDenied` when the OS refuses the subscription; no retry
    /// is attempted and listening is not considered requested.
    ///
    /// When phone numbers are read, the permission flow runs once, before
    /// the first subscription of this detector.
    pub fn start_listener(&mut self) -> Result<()> {
        if self.is_listening() {
            tracing::debug!("call detector already listening");
            self.requested = true;
            return Ok(());
        }

        if self.config.read_phone_number && !self.permission_asked {
            self.permission_asked = true;
            self.ensure_permission();
        }

        let result = self.attach();
        self.requested = result.is_ok();
        result
    }

    /// Stop listening and discard classifier history. Idempotent.
    pub fn stop_listener(&mut self) -> Result<()> {
        self.requested = false;
        self.detach()
    }

    /// Stop listening and drop the permission-denied callback.
    pub fn dispose(&mut self) -> Result<()> {
        self.permission_denied = None;
        self.stop_listener()
    }

    pub fn is_listening(&self) -> bool {
        self.listener
            .as_ref()
            .map(RawStateListener::is_registered)
            .unwrap_or(false)
    }

    /// Event name constants for the host.
    pub fn constants(&self) -> BTreeMap<&'static str, &'static str> {
        event_constants()
    }

    /// Subscribe with a fresh classifier, without the permission flow or
    /// touching `requested`.
    pub(crate) fn attach(&mut self) -> Result<()> {
        let receiver: ReceiverRef = Arc::new(ClassifyingReceiver {
            classifier: Mutex::new(CallStateClassifier::new()),
            bus: self.bus.clone(),
            read_phone_number: self.config.read_phone_number,
        });

        let mut listener = RawStateListener::new(self.source.clone(), receiver);
        if let Err(e) = listener.start() {
            tracing::warn!("failed to start call detector: {}", e);
            return Err(e);
        }

        self.listener = Some(listener);
        tracing::info!("call detector started");
        Ok(())
    }

    /// Release the OS subscription without touching `requested`.
    pub(crate) fn detach(&mut self) -> Result<()> {
        let Some(mut listener) = self.listener.take() else {
            return Ok(());
        };
        let result = listener.stop();
        tracing::info!("call detector stopped");
        result
    }

    /// Ask for permission if needed. A refusal is reported to the host but
    /// does not prevent the subscription attempt; the OS has the final say.
    fn ensure_permission(&self) {
        if self.permissions.check() {
            return;
        }
        if self.permissions.request(&self.config.permission_rationale) {
            return;
        }

        tracing::warn!("phone state permission denied");
        if let Some(callback) = &self.permission_denied {
            callback(PERMISSION_DENIED);
        }
    }
}

impl Drop for CallDetector {
    fn drop(&mut self) {
        if let Err(e) = self.detach() {
            tracing::warn!("failed to stop call detector: {}", e);
        }
    }
}
