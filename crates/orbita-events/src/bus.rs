//! The host-owned event bus.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use orbita_core::OrbitId;

use crate::error::{EventError, EventResult};
use crate::event::{DomainEvent, OrbitEvent};

/// A subscribed handler for one event type.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// React to a dispatched domain event.
    ///
    /// # Errors
    ///
    /// A returned error is logged by the bus and swallowed; it never stops
    /// dispatch to later handlers.
    async fn handle(&self, event: &DomainEvent) -> EventResult<()>;
}

/// Outbound sink for orbit-originated events.
///
/// Typically backed by the host's message broker client. Wiring one is
/// optional — orbits running in isolation (or tests) publish into the void
/// successfully.
#[async_trait]
pub trait HostPublisher: Send + Sync {
    /// Forward an already-qualified orbit event outward.
    async fn publish(&self, event: &OrbitEvent) -> EventResult<()>;
}

struct Subscription {
    orbit_id: OrbitId,
    handler: Arc<dyn EventHandler>,
}

/// Connects host domain events to orbit handlers and orbit events back out.
///
/// Handlers are kept in registration order per event type; dispatch is
/// sequential with no per-handler timeout. The handler table is the only
/// mutable state and sits behind a read-write lock — handler invocation
/// happens after the lock is released so a slow handler never blocks
/// subscription changes.
pub struct EventBus {
    handlers: RwLock<HashMap<String, Vec<Subscription>>>,
    publisher: Option<Arc<dyn HostPublisher>>,
}

impl EventBus {
    /// Create a bus with no outbound publisher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            publisher: None,
        }
    }

    /// Create a bus that forwards orbit events to the given publisher.
    #[must_use]
    pub fn with_publisher(publisher: Arc<dyn HostPublisher>) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            publisher: Some(publisher),
        }
    }

    /// Register a handler for an exact event type on behalf of an orbit.
    ///
    /// Multiple handlers per type are allowed and run in registration
    /// order. Capability checks happen in the per-orbit facade
    /// ([`OrbitEvents`](crate::OrbitEvents)); the bus itself is host-level.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidEventType`] for an empty type.
    pub fn subscribe(
        &self,
        orbit_id: &OrbitId,
        event_type: &str,
        handler: Arc<dyn EventHandler>,
    ) -> EventResult<()> {
        if event_type.is_empty() {
            return Err(EventError::InvalidEventType);
        }
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(Subscription {
                orbit_id: orbit_id.clone(),
                handler,
            });
        debug!(orbit_id = %orbit_id, event_type, "Subscribed event handler");
        Ok(())
    }

    /// Number of handlers registered for an event type.
    #[must_use]
    pub fn handler_count(&self, event_type: &str) -> usize {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        handlers.get(event_type).map_or(0, Vec::len)
    }

    /// Remove every handler an orbit registered.
    pub fn unsubscribe_orbit(&self, orbit_id: &OrbitId) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for subscriptions in handlers.values_mut() {
            subscriptions.retain(|sub| &sub.orbit_id != orbit_id);
        }
        handlers.retain(|_, subscriptions| !subscriptions.is_empty());
    }

    /// Deliver a host domain event to every handler of its exact type.
    ///
    /// Handlers run sequentially in registration order. A handler error is
    /// logged with the owning orbit's id and swallowed — delivery continues
    /// and dispatch itself succeeds. Returns the number of handlers
    /// invoked.
    pub async fn dispatch(&self, event: &DomainEvent) -> usize {
        let matched: Vec<(OrbitId, Arc<dyn EventHandler>)> = {
            let handlers = self
                .handlers
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            handlers
                .get(&event.event_type)
                .map(|subs| {
                    subs.iter()
                        .map(|sub| (sub.orbit_id.clone(), Arc::clone(&sub.handler)))
                        .collect()
                })
                .unwrap_or_default()
        };

        if matched.is_empty() {
            trace!(event_type = %event.event_type, "No handlers for event");
            return 0;
        }

        let mut invoked: usize = 0;
        for (orbit_id, handler) in matched {
            if let Err(e) = handler.handle(event).await {
                warn!(
                    orbit_id = %orbit_id,
                    event_type = %event.event_type,
                    error = %e,
                    "Event handler failed, continuing dispatch"
                );
            }
            invoked = invoked.saturating_add(1);
        }
        debug!(event_type = %event.event_type, invoked, "Dispatched event");
        invoked
    }

    /// Forward an already-qualified orbit event to the outbound publisher.
    ///
    /// No publisher wired means the event is dropped successfully.
    ///
    /// # Errors
    ///
    /// Propagates the publisher's failure.
    pub async fn forward(&self, event: &OrbitEvent) -> EventResult<()> {
        match &self.publisher {
            Some(publisher) => publisher.publish(event).await,
            None => {
                trace!(event_type = %event.event_type, "No host publisher, dropping orbit event");
                Ok(())
            },
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types = {
            let handlers = self
                .handlers
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            handlers.len()
        };
        f.debug_struct("EventBus")
            .field("event_types", &types)
            .field("has_publisher", &self.publisher.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct RecordingHandler {
        label: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, _event: &DomainEvent) -> EventResult<()> {
            self.seen.lock().await.push(self.label);
            if self.fail {
                return Err(EventError::HandlerFailed("boom".into()));
            }
            Ok(())
        }
    }

    fn orbit() -> OrbitId {
        OrbitId::from_static("acme.pomodoro")
    }

    #[tokio::test]
    async fn dispatch_runs_handlers_in_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            bus.subscribe(
                &orbit(),
                "tasks.task.completed",
                Arc::new(RecordingHandler {
                    label,
                    seen: Arc::clone(&seen),
                    fail: false,
                }),
            )
            .unwrap();
        }

        let invoked = bus
            .dispatch(&DomainEvent::new("tasks.task.completed", Map::new()))
            .await;
        assert_eq!(invoked, 3);
        assert_eq!(*seen.lock().await, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_block_later_ones() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            &orbit(),
            "tasks.task.completed",
            Arc::new(RecordingHandler {
                label: "fails",
                seen: Arc::clone(&seen),
                fail: true,
            }),
        )
        .unwrap();
        bus.subscribe(
            &orbit(),
            "tasks.task.completed",
            Arc::new(RecordingHandler {
                label: "runs",
                seen: Arc::clone(&seen),
                fail: false,
            }),
        )
        .unwrap();

        let invoked = bus
            .dispatch(&DomainEvent::new("tasks.task.completed", Map::new()))
            .await;
        assert_eq!(invoked, 2);
        assert_eq!(*seen.lock().await, vec!["fails", "runs"]);
    }

    #[tokio::test]
    async fn dispatch_matches_exact_type_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            &orbit(),
            "tasks.task.completed",
            Arc::new(RecordingHandler {
                label: "tasks",
                seen: Arc::clone(&seen),
                fail: false,
            }),
        )
        .unwrap();

        let invoked = bus
            .dispatch(&DomainEvent::new("tasks.task.created", Map::new()))
            .await;
        assert_eq!(invoked, 0);
        assert!(seen.lock().await.is_empty());
    }

    #[tokio::test]
    async fn subscribe_rejects_empty_type() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let result = bus.subscribe(
            &orbit(),
            "",
            Arc::new(RecordingHandler {
                label: "x",
                seen,
                fail: false,
            }),
        );
        assert!(matches!(result, Err(EventError::InvalidEventType)));
    }

    #[tokio::test]
    async fn unsubscribe_orbit_removes_its_handlers() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let other = OrbitId::from_static("acme.wellness");

        bus.subscribe(
            &orbit(),
            "habits.habit.completed",
            Arc::new(RecordingHandler {
                label: "pomodoro",
                seen: Arc::clone(&seen),
                fail: false,
            }),
        )
        .unwrap();
        bus.subscribe(
            &other,
            "habits.habit.completed",
            Arc::new(RecordingHandler {
                label: "wellness",
                seen: Arc::clone(&seen),
                fail: false,
            }),
        )
        .unwrap();

        bus.unsubscribe_orbit(&orbit());
        assert_eq!(bus.handler_count("habits.habit.completed"), 1);

        bus.dispatch(&DomainEvent::new("habits.habit.completed", Map::new()))
            .await;
        assert_eq!(*seen.lock().await, vec!["wellness"]);
    }

    struct CountingPublisher {
        published: AtomicUsize,
    }

    #[async_trait]
    impl HostPublisher for CountingPublisher {
        async fn publish(&self, _event: &OrbitEvent) -> EventResult<()> {
            self.published.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn forward_without_publisher_is_noop_success() {
        let bus = EventBus::new();
        let event = OrbitEvent::new("orbit.acme.pomodoro.done", Map::new());
        assert!(bus.forward(&event).await.is_ok());
    }

    #[tokio::test]
    async fn forward_reaches_publisher() {
        let publisher = Arc::new(CountingPublisher {
            published: AtomicUsize::new(0),
        });
        let bus = EventBus::with_publisher(Arc::clone(&publisher) as Arc<dyn HostPublisher>);

        let event = OrbitEvent::new("orbit.acme.pomodoro.done", Map::new());
        bus.forward(&event).await.unwrap();
        assert_eq!(publisher.published.load(Ordering::SeqCst), 1);
    }
}
