//! Orbita Runtime - the executor tying the runtime together.
//!
//! [`OrbitRuntime`] owns the registry and the injected host services.
//! Activation is the central flow: look the orbit up (entitlement-gated,
//! lazily loaded), construct an [`OrbitContext`](orbita_sandbox::OrbitContext)
//! bound to `(orbit, user)` with the manifest's declared capabilities,
//! run the orbit's lifecycle hooks, and collect what it contributes
//! (tools, commands, event subscriptions).
//!
//! Host domain events enter through [`OrbitRuntime::dispatch_event`];
//! discovery over the configured search paths enters through
//! [`OrbitRuntime::discover_and_register`].

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod runtime;

pub use config::{API_VERSION, RuntimeConfig};
pub use runtime::{Activation, OrbitRuntime};
