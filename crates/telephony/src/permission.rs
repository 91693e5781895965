//! Phone state permission checks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use calldetect_events::{event_names, EventBusRef};

use crate::config::PermissionRationale;

/// Reason string handed to the permission-denied callback.
pub const PERMISSION_DENIED: &str = "PERMISSION DENIED";

/// Host-side permission manager.
pub trait PermissionProvider: Send + Sync {
    /// Whether the phone state permission is already held.
    fn check(&self) -> bool;

    /// Prompt for the permission. Returns true if it was granted.
    fn request(&self, rationale: &PermissionRationale) -> bool;
}

/// Type alias for shared permission provider reference.
pub type PermissionProviderRef = Arc<dyn PermissionProvider>;

/// Callback invoked with [`PERMISSION_DENIED`] when the user refuses.
pub type PermissionDeniedCallback = Arc<dyn Fn(&str) + Send + Sync + 'static>;

pub fn new_permission_denied_callback<F>(f: F) -> PermissionDeniedCallback
where
    F: Fn(&str) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Callback that forwards the denial to the host as a
/// [`event_names::PERMISSION_DENIED`] event.
pub fn emit_permission_denied(bus: EventBusRef) -> PermissionDeniedCallback {
    new_permission_denied_callback(move |reason| {
        bus.emit(
            event_names::PERMISSION_DENIED,
            serde_json::Value::String(reason.to_string()),
        );
    })
}

/// Provider for hosts that grant phone state access up front.
pub struct AlwaysGranted;

impl PermissionProvider for AlwaysGranted {
    fn check(&self) -> bool {
        true
    }

    fn request(&self, _rationale: &PermissionRationale) -> bool {
        true
    }
}

/// Provider whose answer is reported by the host platform layer.
///
/// The native side shows the system prompt itself and reports the outcome
/// with [`set_granted`](Self::set_granted) before listening starts. Granted
/// until told otherwise.
pub struct HostPermissionProvider {
    granted: AtomicBool,
}

impl HostPermissionProvider {
    pub fn new() -> Self {
        Self {
            granted: AtomicBool::new(true),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }
}

impl Default for HostPermissionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionProvider for HostPermissionProvider {
    fn check(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request(&self, rationale: &PermissionRationale) -> bool {
        tracing::debug!(title = %rationale.title, "phone state permission requested");
        self.check()
    }
}
