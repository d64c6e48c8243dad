//! Orbita Capabilities - typed permission tokens for sandboxed orbits.
//!
//! Every host API exposed to an orbit is gated by a [`Capability`], an
//! opaque `category:resource` token drawn from a closed set. An orbit's
//! manifest declares its capability ceiling; the runtime grants a
//! [`CapabilitySet`] per activation and the sandbox checks membership
//! before every delegation.
//!
//! # Example
//!
//! ```
//! use orbita_capabilities::{Capability, CapabilitySet};
//!
//! let caps = CapabilitySet::new([Capability::ReadTasks, Capability::WriteStorage]);
//! assert!(caps.has(Capability::ReadTasks));
//! assert!(!caps.has(Capability::PublishEvents));
//! assert_eq!(Capability::ReadTasks.category(), "read");
//! assert_eq!(Capability::ReadTasks.resource(), "tasks");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod capability;
mod error;
mod set;

pub use capability::{Capability, validate_capabilities};
pub use error::{CapabilityError, CapabilityResult};
pub use set::CapabilitySet;
