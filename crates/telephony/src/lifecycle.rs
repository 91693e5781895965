//! Host lifecycle hook.
//!
//! Hosts forward their foreground/background transitions here. The detector
//! keeps listening in the background; it only detaches when the host is torn
//! down and re-attaches on the next resume if listening was still wanted.

use serde::{Deserialize, Serialize};

use crate::detector::CallDetector;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostLifecycle {
    Resumed,
    Paused,
    Destroyed,
}

impl CallDetector {
    pub fn on_host_lifecycle(&mut self, event: HostLifecycle) -> Result<()> {
        tracing::debug!(?event, "host lifecycle");
        match event {
            HostLifecycle::Resumed if self.requested && !self.is_listening() => {
                // One attempt per resume; a failure drops the request.
                let result = self.attach();
                self.requested = result.is_ok();
                result
            }
            HostLifecycle::Resumed | HostLifecycle::Paused => Ok(()),
            HostLifecycle::Destroyed => self.detach(),
        }
    }
}
