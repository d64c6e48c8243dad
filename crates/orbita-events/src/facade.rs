//! The per-orbit events facade.

use std::sync::Arc;

use tracing::debug;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::OrbitId;

use crate::bus::{EventBus, EventHandler};
use crate::error::{EventError, EventResult};
use crate::event::OrbitEvent;

/// The event surface an orbit sees.
///
/// Bound to one orbit and its grant set: subscribing requires
/// `subscribe:events`, publishing requires `publish:events`, and every
/// published type is rewritten into the `orbit.{orbit_id}.` namespace
/// before it leaves the sandbox.
#[derive(Clone)]
pub struct OrbitEvents {
    orbit_id: OrbitId,
    capabilities: CapabilitySet,
    bus: Arc<EventBus>,
}

impl OrbitEvents {
    /// Bind the facade to an orbit, its grants, and the host bus.
    #[must_use]
    pub fn new(orbit_id: OrbitId, capabilities: CapabilitySet, bus: Arc<EventBus>) -> Self {
        Self {
            orbit_id,
            capabilities,
            bus,
        }
    }

    /// The orbit this facade is bound to.
    #[must_use]
    pub fn orbit_id(&self) -> &OrbitId {
        &self.orbit_id
    }

    /// Subscribe a handler to an exact domain event type.
    ///
    /// # Errors
    ///
    /// `subscribe:events` missing, or an empty event type.
    pub fn subscribe(
        &self,
        event_type: &str,
        handler: Arc<dyn EventHandler>,
    ) -> EventResult<()> {
        self.capabilities.require(Capability::SubscribeEvents)?;
        self.bus.subscribe(&self.orbit_id, event_type, handler)
    }

    /// Publish an orbit event toward the host.
    ///
    /// The type is rewritten to `orbit.{orbit_id}.{type}` before
    /// forwarding. With no host publisher wired the event is dropped
    /// successfully.
    ///
    /// # Errors
    ///
    /// `publish:events` missing, an empty event type, or a publisher
    /// failure.
    pub async fn publish(&self, event: OrbitEvent) -> EventResult<()> {
        self.capabilities.require(Capability::PublishEvents)?;
        if event.event_type.is_empty() {
            return Err(EventError::InvalidEventType);
        }
        let qualified = event.qualified(&self.orbit_id);
        debug!(orbit_id = %self.orbit_id, event_type = %qualified.event_type, "Publishing orbit event");
        self.bus.forward(&qualified).await
    }
}

impl std::fmt::Debug for OrbitEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitEvents")
            .field("orbit_id", &self.orbit_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::Mutex;

    use crate::bus::HostPublisher;
    use crate::event::DomainEvent;

    struct NullHandler;

    #[async_trait]
    impl EventHandler for NullHandler {
        async fn handle(&self, _event: &DomainEvent) -> EventResult<()> {
            Ok(())
        }
    }

    struct CapturingPublisher {
        events: Mutex<Vec<OrbitEvent>>,
    }

    #[async_trait]
    impl HostPublisher for CapturingPublisher {
        async fn publish(&self, event: &OrbitEvent) -> EventResult<()> {
            self.events
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(event.clone());
            Ok(())
        }
    }

    fn facade(caps: CapabilitySet, bus: Arc<EventBus>) -> OrbitEvents {
        OrbitEvents::new(OrbitId::from_static("acme.pomodoro"), caps, bus)
    }

    #[tokio::test]
    async fn subscribe_requires_capability() {
        let bus = Arc::new(EventBus::new());
        let events = facade(CapabilitySet::empty(), Arc::clone(&bus));

        let err = events
            .subscribe("tasks.task.completed", Arc::new(NullHandler))
            .unwrap_err();
        assert!(matches!(err, EventError::Capability(_)));
        assert_eq!(bus.handler_count("tasks.task.completed"), 0);
    }

    #[tokio::test]
    async fn subscribe_with_capability_registers() {
        let bus = Arc::new(EventBus::new());
        let events = facade(
            CapabilitySet::new([Capability::SubscribeEvents]),
            Arc::clone(&bus),
        );

        events
            .subscribe("tasks.task.completed", Arc::new(NullHandler))
            .unwrap();
        assert_eq!(bus.handler_count("tasks.task.completed"), 1);
    }

    #[tokio::test]
    async fn publish_requires_capability() {
        let bus = Arc::new(EventBus::new());
        let events = facade(CapabilitySet::empty(), bus);

        let err = events
            .publish(OrbitEvent::new("done", Map::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Capability(_)));
    }

    #[tokio::test]
    async fn publish_rejects_empty_type() {
        let bus = Arc::new(EventBus::new());
        let events = facade(CapabilitySet::new([Capability::PublishEvents]), bus);

        let err = events
            .publish(OrbitEvent::new("", Map::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::InvalidEventType));
    }

    #[tokio::test]
    async fn publish_rewrites_type_into_orbit_namespace() {
        let publisher = Arc::new(CapturingPublisher {
            events: Mutex::new(Vec::new()),
        });
        let bus = Arc::new(EventBus::with_publisher(
            Arc::clone(&publisher) as Arc<dyn HostPublisher>
        ));
        let events = facade(CapabilitySet::new([Capability::PublishEvents]), bus);

        events
            .publish(OrbitEvent::new("session.finished", Map::new()))
            .await
            .unwrap();

        let captured = publisher
            .events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        assert_eq!(captured.len(), 1);
        assert_eq!(
            captured[0].event_type,
            "orbit.acme.pomodoro.session.finished"
        );
    }

    #[tokio::test]
    async fn publish_without_publisher_succeeds() {
        let bus = Arc::new(EventBus::new());
        let events = facade(CapabilitySet::new([Capability::PublishEvents]), bus);

        events
            .publish(OrbitEvent::new("session.finished", Map::new()))
            .await
            .unwrap();
    }
}
