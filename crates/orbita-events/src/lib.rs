//! Orbita Events - the bus between host domain events and orbit handlers.
//!
//! Two directions of flow:
//!
//! - **Host → orbit**: the host runtime calls [`EventBus::dispatch`] with a
//!   [`DomainEvent`]; every handler subscribed to that exact event type runs
//!   in registration order. A failing handler is logged and skipped — it
//!   never blocks delivery to the others.
//! - **Orbit → host**: an orbit publishes an [`OrbitEvent`] through its
//!   [`OrbitEvents`] facade; the type is rewritten to
//!   `orbit.{orbit_id}.{type}` so orbits can never collide in the host's
//!   event namespace, then forwarded to the wired [`HostPublisher`] (a
//!   missing publisher is a no-op success, not an error).
//!
//! Subscribing requires `subscribe:events`; publishing requires
//! `publish:events`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod bus;
mod error;
mod event;
mod facade;

pub use bus::{EventBus, EventHandler, HostPublisher};
pub use error::{EventError, EventResult};
pub use event::{DomainEvent, OrbitEvent};
pub use facade::OrbitEvents;
