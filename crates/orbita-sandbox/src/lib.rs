//! Orbita Sandbox - the mediated surface between orbits and the host.
//!
//! An [`OrbitContext`] is constructed per activation, capturing
//! `(orbit_id, user_id, capability_set)` plus the injected [`HostServices`]
//! collaborators. Every host API an orbit can touch goes through it:
//!
//! - Domain reads (`tasks()`, `habits()`, `schedule()`, `meetings()`,
//!   `inbox()`, `user()`) return either a capability-gated wrapper around
//!   the real query handler or an inert null object whose every method
//!   fails with a not-granted error — gating happens once, at API-surface
//!   construction time, instead of being scattered through business logic.
//! - `storage()` and `events()` return the scoped facades from
//!   `orbita-storage` / `orbita-events`, which gate per operation.
//! - `logger()` and `metrics()` are always available.
//!
//! Each concrete wrapper method still re-validates its own capability
//! before delegating, so a context handle that outlives its construction
//! check cannot be replayed past the gate.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod api;
mod context;
mod error;
mod logger;
mod metrics;
mod registrar;
mod services;

pub use api::{HabitApi, InboxApi, MeetingApi, ScheduleApi, TaskApi, UserApi};
pub use context::OrbitContext;
pub use error::{SandboxError, SandboxResult};
pub use logger::OrbitLogger;
pub use metrics::{MetricsSink, NoopMetrics};
pub use registrar::{CommandDefinition, CommandRegistrar, ToolDefinition, ToolRegistrar};
pub use services::{HostServices, HostServicesBuilder};
