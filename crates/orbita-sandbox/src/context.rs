//! The per-activation orbit context.

use std::sync::Arc;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{OrbitId, UserId};
use orbita_events::OrbitEvents;
use orbita_storage::ScopedStorage;

use crate::api::{
    DeniedHabitApi, DeniedInboxApi, DeniedMeetingApi, DeniedScheduleApi, DeniedTaskApi,
    DeniedUserApi, GatedHabitApi, GatedInboxApi, GatedMeetingApi, GatedScheduleApi, GatedTaskApi,
    GatedUserApi, HabitApi, InboxApi, MeetingApi, ScheduleApi, TaskApi, UserApi,
};
use crate::logger::OrbitLogger;
use crate::metrics::MetricsSink;
use crate::services::HostServices;

/// The facade an orbit sees during lifecycle hooks and handler execution.
///
/// Captures `(orbit_id, user_id, capability_set)` for one activation —
/// orbit instances are shared across users, so all multi-tenant isolation
/// lives here. Domain accessors hand out either a gated wrapper or a null
/// object depending on the grant set; a missing capability makes the whole
/// sub-API inert rather than relying on call sites to remember checks.
#[derive(Clone)]
pub struct OrbitContext {
    orbit_id: OrbitId,
    user_id: UserId,
    capabilities: CapabilitySet,
    services: Arc<HostServices>,
}

impl OrbitContext {
    /// Bind a context to an orbit, a user, their grants, and the host
    /// collaborators.
    #[must_use]
    pub fn new(
        orbit_id: OrbitId,
        user_id: UserId,
        capabilities: CapabilitySet,
        services: Arc<HostServices>,
    ) -> Self {
        Self {
            orbit_id,
            user_id,
            capabilities,
            services,
        }
    }

    /// The orbit this context serves.
    #[must_use]
    pub fn orbit_id(&self) -> &OrbitId {
        &self.orbit_id
    }

    /// The user this context is bound to.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Whether a capability was granted — for orbits that branch on
    /// optional capabilities instead of failing.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }

    /// The granted capability set.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Task read access (`read:tasks`).
    #[must_use]
    pub fn tasks(&self) -> Arc<dyn TaskApi> {
        if self.capabilities.has(Capability::ReadTasks) {
            Arc::new(GatedTaskApi::new(
                self.user_id.clone(),
                self.capabilities.clone(),
                Arc::clone(&self.services.tasks),
            ))
        } else {
            Arc::new(DeniedTaskApi)
        }
    }

    /// Habit read access (`read:habits`).
    #[must_use]
    pub fn habits(&self) -> Arc<dyn HabitApi> {
        if self.capabilities.has(Capability::ReadHabits) {
            Arc::new(GatedHabitApi::new(
                self.user_id.clone(),
                self.capabilities.clone(),
                Arc::clone(&self.services.habits),
            ))
        } else {
            Arc::new(DeniedHabitApi)
        }
    }

    /// Schedule read access (`read:schedule`).
    #[must_use]
    pub fn schedule(&self) -> Arc<dyn ScheduleApi> {
        if self.capabilities.has(Capability::ReadSchedule) {
            Arc::new(GatedScheduleApi::new(
                self.user_id.clone(),
                self.capabilities.clone(),
                Arc::clone(&self.services.schedule),
            ))
        } else {
            Arc::new(DeniedScheduleApi)
        }
    }

    /// Meeting read access (`read:meetings`).
    #[must_use]
    pub fn meetings(&self) -> Arc<dyn MeetingApi> {
        if self.capabilities.has(Capability::ReadMeetings) {
            Arc::new(GatedMeetingApi::new(
                self.user_id.clone(),
                self.capabilities.clone(),
                Arc::clone(&self.services.meetings),
            ))
        } else {
            Arc::new(DeniedMeetingApi)
        }
    }

    /// Inbox read access (`read:inbox`).
    #[must_use]
    pub fn inbox(&self) -> Arc<dyn InboxApi> {
        if self.capabilities.has(Capability::ReadInbox) {
            Arc::new(GatedInboxApi::new(
                self.user_id.clone(),
                self.capabilities.clone(),
                Arc::clone(&self.services.inbox),
            ))
        } else {
            Arc::new(DeniedInboxApi)
        }
    }

    /// User profile read access (`read:user`).
    #[must_use]
    pub fn user(&self) -> Arc<dyn UserApi> {
        if self.capabilities.has(Capability::ReadUser) {
            Arc::new(GatedUserApi::new(
                self.user_id.clone(),
                self.capabilities.clone(),
                Arc::clone(&self.services.users),
            ))
        } else {
            Arc::new(DeniedUserApi)
        }
    }

    /// Scoped key-value storage (`read:storage` / `write:storage`, gated
    /// per operation).
    #[must_use]
    pub fn storage(&self) -> ScopedStorage {
        ScopedStorage::new(
            self.orbit_id.clone(),
            self.user_id.clone(),
            self.capabilities.clone(),
            Arc::clone(&self.services.storage),
        )
    }

    /// Event subscribe/publish facade (`subscribe:events` /
    /// `publish:events`, gated per operation).
    #[must_use]
    pub fn events(&self) -> OrbitEvents {
        OrbitEvents::new(
            self.orbit_id.clone(),
            self.capabilities.clone(),
            Arc::clone(&self.services.events),
        )
    }

    /// Structured logger stamped with this context's orbit and user.
    #[must_use]
    pub fn logger(&self) -> OrbitLogger {
        OrbitLogger::new(self.orbit_id.clone(), self.user_id.clone())
    }

    /// The host metrics sink.
    #[must_use]
    pub fn metrics(&self) -> Arc<dyn MetricsSink> {
        Arc::clone(&self.services.metrics)
    }
}

impl std::fmt::Debug for OrbitContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitContext")
            .field("orbit_id", &self.orbit_id)
            .field("user_id", &self.user_id)
            .field("capabilities", &self.capabilities.len())
            .finish_non_exhaustive()
    }
}
