//! Orbita Core - Foundation types for the Orbita extension runtime.
//!
//! This crate provides:
//! - Validated identifiers (`OrbitId`, `UserId`) used throughout the runtime
//! - Read-only domain models the host hands to sandboxed orbits
//! - The query handler traits the sandbox delegates domain reads to
//! - Resolution of the standard orbit search paths

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod dirs;
pub mod domain;
pub mod id;
pub mod query;

pub use domain::{
    Habit, HabitCadence, InboxItem, Meeting, ScheduleBlock, TaskItem, TaskStatus, UserProfile,
};
pub use id::{IdError, OrbitId, UserId};
pub use query::{
    HabitQueries, InboxQueries, MeetingQueries, QueryError, QueryResult, ScheduleQueries,
    TaskQueries, UserQueries,
};
