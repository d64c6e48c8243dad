//! Event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use orbita_core::OrbitId;

/// A host domain event delivered to subscribed orbits.
///
/// Types are dot-separated `domain.entity.action` strings, e.g.
/// `tasks.task.completed` or `inbox.item.received`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Structured event data.
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl DomainEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// An event an orbit raises toward the host.
///
/// Before leaving the sandbox the type is rewritten to
/// `orbit.{orbit_id}.{type}` (see [`OrbitEvent::qualified`]), which keeps
/// the outbound namespace collision-free across orbits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitEvent {
    /// Orbit-local event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Structured event data.
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl OrbitEvent {
    /// Create an orbit event.
    #[must_use]
    pub fn new(event_type: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// The event with its type rewritten into the orbit namespace.
    #[must_use]
    pub fn qualified(self, orbit_id: &OrbitId) -> Self {
        Self {
            event_type: format!("orbit.{orbit_id}.{}", self.event_type),
            payload: self.payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_event_serde_round_trip() {
        let mut payload = Map::new();
        payload.insert("task_id".into(), json!("t-1"));
        let event = DomainEvent::new("tasks.task.completed", payload);

        let encoded = serde_json::to_string(&event).unwrap();
        assert!(encoded.contains("\"type\":\"tasks.task.completed\""));
        let back: DomainEvent = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn qualified_rewrites_type() {
        let event = OrbitEvent::new("session.finished", Map::new());
        let qualified = event.qualified(&OrbitId::from_static("acme.pomodoro"));
        assert_eq!(qualified.event_type, "orbit.acme.pomodoro.session.finished");
    }
}
