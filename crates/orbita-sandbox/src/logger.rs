//! Structured logging stamped with orbit identity.

use tracing::{debug, info, warn};

use orbita_core::{OrbitId, UserId};

/// A logger bound to the orbit and user of one context.
///
/// Always available — logging is not capability-gated. Every record carries
/// the orbit and user so host operators can attribute noise.
#[derive(Debug, Clone)]
pub struct OrbitLogger {
    orbit_id: OrbitId,
    user_id: UserId,
}

impl OrbitLogger {
    pub(crate) fn new(orbit_id: OrbitId, user_id: UserId) -> Self {
        Self { orbit_id, user_id }
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        info!(orbit_id = %self.orbit_id, user_id = %self.user_id, "{message}");
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        debug!(orbit_id = %self.orbit_id, user_id = %self.user_id, "{message}");
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        warn!(orbit_id = %self.orbit_id, user_id = %self.user_id, "{message}");
    }
}
