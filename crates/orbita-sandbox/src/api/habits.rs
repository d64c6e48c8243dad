//! Habit API implementations.

use std::sync::Arc;

use async_trait::async_trait;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{Habit, HabitQueries, UserId};

use crate::api::{HabitApi, denied};
use crate::error::SandboxResult;

/// Real habit API: re-checks `read:habits`, then delegates.
pub(crate) struct GatedHabitApi {
    user_id: UserId,
    capabilities: CapabilitySet,
    inner: Arc<dyn HabitQueries>,
}

impl GatedHabitApi {
    pub(crate) fn new(
        user_id: UserId,
        capabilities: CapabilitySet,
        inner: Arc<dyn HabitQueries>,
    ) -> Self {
        Self {
            user_id,
            capabilities,
            inner,
        }
    }
}

#[async_trait]
impl HabitApi for GatedHabitApi {
    async fn list(&self) -> SandboxResult<Vec<Habit>> {
        self.capabilities.require(Capability::ReadHabits)?;
        Ok(self.inner.list(&self.user_id).await?)
    }

    async fn get(&self, habit_id: &str) -> SandboxResult<Option<Habit>> {
        self.capabilities.require(Capability::ReadHabits)?;
        Ok(self.inner.get(&self.user_id, habit_id).await?)
    }
}

/// Null object handed out when `read:habits` was not granted.
pub(crate) struct DeniedHabitApi;

#[async_trait]
impl HabitApi for DeniedHabitApi {
    async fn list(&self) -> SandboxResult<Vec<Habit>> {
        Err(denied(Capability::ReadHabits))
    }

    async fn get(&self, _habit_id: &str) -> SandboxResult<Option<Habit>> {
        Err(denied(Capability::ReadHabits))
    }
}
