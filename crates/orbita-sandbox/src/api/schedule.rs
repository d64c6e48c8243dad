//! Schedule API implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{ScheduleBlock, ScheduleQueries, UserId};

use crate::api::{ScheduleApi, denied};
use crate::error::SandboxResult;

/// Real schedule API: re-checks `read:schedule`, then delegates.
pub(crate) struct GatedScheduleApi {
    user_id: UserId,
    capabilities: CapabilitySet,
    inner: Arc<dyn ScheduleQueries>,
}

impl GatedScheduleApi {
    pub(crate) fn new(
        user_id: UserId,
        capabilities: CapabilitySet,
        inner: Arc<dyn ScheduleQueries>,
    ) -> Self {
        Self {
            user_id,
            capabilities,
            inner,
        }
    }
}

#[async_trait]
impl ScheduleApi for GatedScheduleApi {
    async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SandboxResult<Vec<ScheduleBlock>> {
        self.capabilities.require(Capability::ReadSchedule)?;
        Ok(self.inner.between(&self.user_id, from, to).await?)
    }
}

/// Null object handed out when `read:schedule` was not granted.
pub(crate) struct DeniedScheduleApi;

#[async_trait]
impl ScheduleApi for DeniedScheduleApi {
    async fn between(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> SandboxResult<Vec<ScheduleBlock>> {
        Err(denied(Capability::ReadSchedule))
    }
}
