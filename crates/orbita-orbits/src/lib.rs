//! Orbita Orbits - the extension registry and lifecycle machinery.
//!
//! This crate provides:
//!
//! - [`Orbit`]: the trait every extension implements, built-in or
//!   discovered (`metadata` / `required_capabilities` / `initialize` /
//!   `shutdown` / `register_tools` / `register_commands` /
//!   `subscribe_events`)
//! - [`OrbitManifest`]: the on-disk `orbit.json` descriptor with its
//!   validation rules
//! - [`discover`] / [`discover_with_errors`]: filesystem discovery over
//!   ordered search paths with first-found-wins dedup by orbit id
//! - [`OrbitRegistry`]: the central authority mapping orbit ids to loaded
//!   instances or deferred factories, tracking lifecycle status
//!   (`Unloaded → Loading → Ready | Failed`, `Ready → Shutdown`) and
//!   checking entitlements on every lookup
//!
//! The registry is an explicitly constructed, dependency-injected service —
//! never a package-level singleton. Factories and lifecycle hooks always
//! run outside the registry lock, and a factory executes at most once per
//! id no matter how many callers race on an unloaded orbit.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod discovery;
mod error;
mod manifest;
mod orbit;
mod registry;

pub use discovery::{DiscoveredOrbit, DiscoveryError, discover, discover_with_errors};
pub use error::{OrbitError, OrbitResult};
pub use manifest::{MANIFEST_FILE_NAME, MANIFEST_TYPE, OrbitManifest};
pub use orbit::{Orbit, OrbitFactory, OrbitMetadata, OrbitStatus};
pub use registry::{EntitlementChecker, OrbitRegistry};
