//! The injected host collaborator bundle.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbita_core::{
    Habit, HabitQueries, InboxItem, InboxQueries, Meeting, MeetingQueries, QueryError,
    QueryResult, ScheduleBlock, ScheduleQueries, TaskItem, TaskQueries, UserId, UserProfile,
    UserQueries,
};
use orbita_events::EventBus;
use orbita_storage::{KvBackend, MemoryKvStore};

use crate::metrics::{MetricsSink, NoopMetrics};

/// Every collaborator the sandbox delegates to, handed over at
/// construction time.
///
/// The runtime never reaches the productivity domain directly — only
/// through the read-only query handlers in this bundle.
#[derive(Clone)]
pub struct HostServices {
    pub(crate) tasks: Arc<dyn TaskQueries>,
    pub(crate) habits: Arc<dyn HabitQueries>,
    pub(crate) schedule: Arc<dyn ScheduleQueries>,
    pub(crate) meetings: Arc<dyn MeetingQueries>,
    pub(crate) inbox: Arc<dyn InboxQueries>,
    pub(crate) users: Arc<dyn UserQueries>,
    pub(crate) storage: Arc<dyn KvBackend>,
    pub(crate) events: Arc<EventBus>,
    pub(crate) metrics: Arc<dyn MetricsSink>,
}

impl HostServices {
    /// Start building a service bundle.
    #[must_use]
    pub fn builder() -> HostServicesBuilder {
        HostServicesBuilder::default()
    }

    /// The host event bus (for dispatching domain events).
    #[must_use]
    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}

/// Builder for [`HostServices`].
///
/// Unset query handlers default to a stub that fails with a
/// [`QueryError::Backend`] naming the missing wiring — a misconfigured host
/// surfaces loudly instead of returning empty data. Storage defaults to an
/// in-memory store, the bus to an unwired one, metrics to a no-op sink.
#[derive(Default)]
pub struct HostServicesBuilder {
    tasks: Option<Arc<dyn TaskQueries>>,
    habits: Option<Arc<dyn HabitQueries>>,
    schedule: Option<Arc<dyn ScheduleQueries>>,
    meetings: Option<Arc<dyn MeetingQueries>>,
    inbox: Option<Arc<dyn InboxQueries>>,
    users: Option<Arc<dyn UserQueries>>,
    storage: Option<Arc<dyn KvBackend>>,
    events: Option<Arc<EventBus>>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl HostServicesBuilder {
    /// Wire the task query handler.
    #[must_use]
    pub fn tasks(mut self, handler: Arc<dyn TaskQueries>) -> Self {
        self.tasks = Some(handler);
        self
    }

    /// Wire the habit query handler.
    #[must_use]
    pub fn habits(mut self, handler: Arc<dyn HabitQueries>) -> Self {
        self.habits = Some(handler);
        self
    }

    /// Wire the schedule query handler.
    #[must_use]
    pub fn schedule(mut self, handler: Arc<dyn ScheduleQueries>) -> Self {
        self.schedule = Some(handler);
        self
    }

    /// Wire the meeting query handler.
    #[must_use]
    pub fn meetings(mut self, handler: Arc<dyn MeetingQueries>) -> Self {
        self.meetings = Some(handler);
        self
    }

    /// Wire the inbox query handler.
    #[must_use]
    pub fn inbox(mut self, handler: Arc<dyn InboxQueries>) -> Self {
        self.inbox = Some(handler);
        self
    }

    /// Wire the user profile query handler.
    #[must_use]
    pub fn users(mut self, handler: Arc<dyn UserQueries>) -> Self {
        self.users = Some(handler);
        self
    }

    /// Wire the storage backend.
    #[must_use]
    pub fn storage(mut self, backend: Arc<dyn KvBackend>) -> Self {
        self.storage = Some(backend);
        self
    }

    /// Wire the event bus.
    #[must_use]
    pub fn events(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    /// Wire the metrics sink.
    #[must_use]
    pub fn metrics(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    /// Finish the bundle, filling in defaults for anything unset.
    #[must_use]
    pub fn build(self) -> HostServices {
        let unwired = Arc::new(UnwiredQueries);
        HostServices {
            tasks: self.tasks.unwrap_or_else(|| Arc::clone(&unwired) as _),
            habits: self.habits.unwrap_or_else(|| Arc::clone(&unwired) as _),
            schedule: self.schedule.unwrap_or_else(|| Arc::clone(&unwired) as _),
            meetings: self.meetings.unwrap_or_else(|| Arc::clone(&unwired) as _),
            inbox: self.inbox.unwrap_or_else(|| Arc::clone(&unwired) as _),
            users: self.users.unwrap_or_else(|| Arc::clone(&unwired) as _),
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(MemoryKvStore::new())),
            events: self.events.unwrap_or_else(|| Arc::new(EventBus::new())),
            metrics: self.metrics.unwrap_or_else(|| Arc::new(NoopMetrics)),
        }
    }
}

/// Stub query handler for domains the host did not wire.
struct UnwiredQueries;

fn unwired<T>(domain: &str) -> QueryResult<T> {
    Err(QueryError::Backend(format!(
        "no {domain} query handler configured"
    )))
}

#[async_trait]
impl TaskQueries for UnwiredQueries {
    async fn list(&self, _user: &UserId) -> QueryResult<Vec<TaskItem>> {
        unwired("task")
    }

    async fn get(&self, _user: &UserId, _task_id: &str) -> QueryResult<Option<TaskItem>> {
        unwired("task")
    }
}

#[async_trait]
impl HabitQueries for UnwiredQueries {
    async fn list(&self, _user: &UserId) -> QueryResult<Vec<Habit>> {
        unwired("habit")
    }

    async fn get(&self, _user: &UserId, _habit_id: &str) -> QueryResult<Option<Habit>> {
        unwired("habit")
    }
}

#[async_trait]
impl ScheduleQueries for UnwiredQueries {
    async fn between(
        &self,
        _user: &UserId,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> QueryResult<Vec<ScheduleBlock>> {
        unwired("schedule")
    }
}

#[async_trait]
impl MeetingQueries for UnwiredQueries {
    async fn between(
        &self,
        _user: &UserId,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> QueryResult<Vec<Meeting>> {
        unwired("meeting")
    }

    async fn upcoming(
        &self,
        _user: &UserId,
        _now: DateTime<Utc>,
        _limit: usize,
    ) -> QueryResult<Vec<Meeting>> {
        unwired("meeting")
    }
}

#[async_trait]
impl InboxQueries for UnwiredQueries {
    async fn list(&self, _user: &UserId) -> QueryResult<Vec<InboxItem>> {
        unwired("inbox")
    }

    async fn unread(&self, _user: &UserId) -> QueryResult<Vec<InboxItem>> {
        unwired("inbox")
    }
}

#[async_trait]
impl UserQueries for UnwiredQueries {
    async fn profile(&self, _user: &UserId) -> QueryResult<Option<UserProfile>> {
        unwired("user")
    }
}
