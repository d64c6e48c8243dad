//! Sandboxed domain API surfaces.
//!
//! One trait per resource category. Each has two implementations: a gated
//! wrapper that re-checks its capability and delegates to the injected
//! query handler, and a null object returned when the capability was never
//! granted — every method on it fails with a not-granted error without
//! touching the collaborator. The context picks which one to hand out at
//! construction time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbita_capabilities::{Capability, CapabilityError};
use orbita_core::{Habit, InboxItem, Meeting, ScheduleBlock, TaskItem, UserProfile};

use crate::error::{SandboxError, SandboxResult};

/// The error every null-object method fails with.
pub(crate) fn denied(capability: Capability) -> SandboxError {
    CapabilityError::NotGranted { capability }.into()
}

mod habits;
mod inbox;
mod meetings;
mod schedule;
mod tasks;
mod user;

pub(crate) use habits::{DeniedHabitApi, GatedHabitApi};
pub(crate) use inbox::{DeniedInboxApi, GatedInboxApi};
pub(crate) use meetings::{DeniedMeetingApi, GatedMeetingApi};
pub(crate) use schedule::{DeniedScheduleApi, GatedScheduleApi};
pub(crate) use tasks::{DeniedTaskApi, GatedTaskApi};
pub(crate) use user::{DeniedUserApi, GatedUserApi};

/// Read access to the bound user's tasks. Gated by `read:tasks`.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// All tasks.
    async fn list(&self) -> SandboxResult<Vec<TaskItem>>;

    /// A single task by id, `None` if absent.
    async fn get(&self, task_id: &str) -> SandboxResult<Option<TaskItem>>;
}

/// Read access to the bound user's habits. Gated by `read:habits`.
#[async_trait]
pub trait HabitApi: Send + Sync {
    /// All habits.
    async fn list(&self) -> SandboxResult<Vec<Habit>>;

    /// A single habit by id, `None` if absent.
    async fn get(&self, habit_id: &str) -> SandboxResult<Option<Habit>>;
}

/// Read access to the bound user's schedule. Gated by `read:schedule`.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// Schedule blocks overlapping the window.
    async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SandboxResult<Vec<ScheduleBlock>>;
}

/// Read access to the bound user's meetings. Gated by `read:meetings`.
#[async_trait]
pub trait MeetingApi: Send + Sync {
    /// Meetings overlapping the window.
    async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SandboxResult<Vec<Meeting>>;

    /// The next `limit` meetings from now.
    async fn upcoming(&self, limit: usize) -> SandboxResult<Vec<Meeting>>;
}

/// Read access to the bound user's inbox. Gated by `read:inbox`.
#[async_trait]
pub trait InboxApi: Send + Sync {
    /// All inbox items.
    async fn list(&self) -> SandboxResult<Vec<InboxItem>>;

    /// Unread inbox items.
    async fn unread(&self) -> SandboxResult<Vec<InboxItem>>;
}

/// Read access to the bound user's profile. Gated by `read:user`.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// The profile, `None` if the host does not know the user.
    async fn profile(&self) -> SandboxResult<Option<UserProfile>>;
}
