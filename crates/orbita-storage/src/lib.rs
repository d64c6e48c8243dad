//! Orbita Storage - namespaced key-value storage for orbits.
//!
//! Two layers:
//!
//! - [`KvBackend`]: the raw byte-level store the host wires in. The in-tree
//!   implementation is [`MemoryKvStore`]; external backends (a shared cache,
//!   an embedded database) implement the same trait.
//! - [`ScopedStorage`]: the orbit-facing view. Every key is transparently
//!   namespaced `orbit:{orbit_id}:user:{user_id}:{key}` so an orbit never
//!   observes another orbit's or another user's data, and every operation is
//!   capability-checked (`read:storage` / `write:storage`).
//!
//! The physical key format is stable and documented because external
//! backends may be inspected directly.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod backend;
mod error;
mod scoped;

pub use backend::{KvBackend, MemoryKvStore};
pub use error::{StorageError, StorageResult};
pub use scoped::{MAX_KEY_LEN, MAX_VALUE_LEN, ScopedStorage};
