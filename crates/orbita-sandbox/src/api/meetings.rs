//! Meeting API implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{Meeting, MeetingQueries, UserId};

use crate::api::{MeetingApi, denied};
use crate::error::SandboxResult;

/// Real meeting API: re-checks `read:meetings`, then delegates.
pub(crate) struct GatedMeetingApi {
    user_id: UserId,
    capabilities: CapabilitySet,
    inner: Arc<dyn MeetingQueries>,
}

impl GatedMeetingApi {
    pub(crate) fn new(
        user_id: UserId,
        capabilities: CapabilitySet,
        inner: Arc<dyn MeetingQueries>,
    ) -> Self {
        Self {
            user_id,
            capabilities,
            inner,
        }
    }
}

#[async_trait]
impl MeetingApi for GatedMeetingApi {
    async fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SandboxResult<Vec<Meeting>> {
        self.capabilities.require(Capability::ReadMeetings)?;
        Ok(self.inner.between(&self.user_id, from, to).await?)
    }

    async fn upcoming(&self, limit: usize) -> SandboxResult<Vec<Meeting>> {
        self.capabilities.require(Capability::ReadMeetings)?;
        Ok(self.inner.upcoming(&self.user_id, Utc::now(), limit).await?)
    }
}

/// Null object handed out when `read:meetings` was not granted.
pub(crate) struct DeniedMeetingApi;

#[async_trait]
impl MeetingApi for DeniedMeetingApi {
    async fn between(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> SandboxResult<Vec<Meeting>> {
        Err(denied(Capability::ReadMeetings))
    }

    async fn upcoming(&self, _limit: usize) -> SandboxResult<Vec<Meeting>> {
        Err(denied(Capability::ReadMeetings))
    }
}
