//! Read-only query handler traits.
//!
//! The host hands implementations of these traits to the runtime at
//! construction time. They are the only way the core reaches the
//! productivity domain — persistence and business logic stay on the host
//! side of the seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Habit, InboxItem, Meeting, ScheduleBlock, TaskItem, UserProfile};
use crate::id::UserId;

/// Errors from host query handlers.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The backing store failed.
    #[error("query backend error: {0}")]
    Backend(String),

    /// The handler does not serve this user.
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

/// Result type for query handler operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Read access to a user's tasks.
#[async_trait]
pub trait TaskQueries: Send + Sync {
    /// All tasks for the user.
    async fn list(&self, user: &UserId) -> QueryResult<Vec<TaskItem>>;

    /// A single task by id, `None` if absent.
    async fn get(&self, user: &UserId, task_id: &str) -> QueryResult<Option<TaskItem>>;
}

/// Read access to a user's habits.
#[async_trait]
pub trait HabitQueries: Send + Sync {
    /// All habits for the user.
    async fn list(&self, user: &UserId) -> QueryResult<Vec<Habit>>;

    /// A single habit by id, `None` if absent.
    async fn get(&self, user: &UserId, habit_id: &str) -> QueryResult<Option<Habit>>;
}

/// Read access to a user's schedule.
#[async_trait]
pub trait ScheduleQueries: Send + Sync {
    /// Schedule blocks overlapping the given window.
    async fn between(
        &self,
        user: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> QueryResult<Vec<ScheduleBlock>>;
}

/// Read access to a user's meetings.
#[async_trait]
pub trait MeetingQueries: Send + Sync {
    /// Meetings overlapping the given window.
    async fn between(
        &self,
        user: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> QueryResult<Vec<Meeting>>;

    /// The next `limit` meetings starting after `now`.
    async fn upcoming(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> QueryResult<Vec<Meeting>>;
}

/// Read access to a user's inbox.
#[async_trait]
pub trait InboxQueries: Send + Sync {
    /// All inbox items for the user.
    async fn list(&self, user: &UserId) -> QueryResult<Vec<InboxItem>>;

    /// Unread inbox items for the user.
    async fn unread(&self, user: &UserId) -> QueryResult<Vec<InboxItem>>;
}

/// Read access to user profiles.
#[async_trait]
pub trait UserQueries: Send + Sync {
    /// The user's profile, `None` if the user is unknown.
    async fn profile(&self, user: &UserId) -> QueryResult<Option<UserProfile>>;
}
