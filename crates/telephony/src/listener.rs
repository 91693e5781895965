//! Raw state listener.
//!
//! Owns the subscription to the telephony source. No logic beyond
//! subscribing and unsubscribing; notifications go straight to the receiver.

use crate::error::Result;
use crate::source::{ReceiverRef, Registration, SourceRef};

pub struct RawStateListener {
    source: SourceRef,
    receiver: ReceiverRef,
    registration: Option<Registration>,
    registered: bool,
}

impl RawStateListener {
    pub fn new(source: SourceRef, receiver: ReceiverRef) -> Self {
        Self {
            source,
            receiver,
            registration: None,
            registered: false,
        }
    }

    /// Subscribe to the source. A second call while registered is a no-op.
    ///
    /// On failure the listener stays unregistered and the receiver never
    /// hears from the source.
    pub fn start(&mut self) -> Result<()> {
        if self.registered {
            tracing::warn!("raw state listener already registered");
            return Ok(());
        }

        let registration = self.source.register(self.receiver.clone())?;
        tracing::info!(registration = registration.id(), "raw state listener registered");

        self.registration = Some(registration);
        self.registered = true;
        Ok(())
    }

    /// Unsubscribe and release the handle. A no-op when not registered.
    ///
    /// The handle is released even if the source reports an error.
    pub fn stop(&mut self) -> Result<()> {
        if !self.registered {
            return Ok(());
        }
        self.registered = false;

        let Some(registration) = self.registration.take() else {
            return Ok(());
        };
        let id = registration.id();
        let result = self.source.unregister(registration);
        tracing::info!(registration = id, "raw state listener unregistered");
        result
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

impl Drop for RawStateListener {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("failed to unregister raw state listener: {}", e);
        }
    }
}
