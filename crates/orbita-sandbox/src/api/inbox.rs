//! Inbox API implementations.

use std::sync::Arc;

use async_trait::async_trait;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{InboxItem, InboxQueries, UserId};

use crate::api::{InboxApi, denied};
use crate::error::SandboxResult;

/// Real inbox API: re-checks `read:inbox`, then delegates.
pub(crate) struct GatedInboxApi {
    user_id: UserId,
    capabilities: CapabilitySet,
    inner: Arc<dyn InboxQueries>,
}

impl GatedInboxApi {
    pub(crate) fn new(
        user_id: UserId,
        capabilities: CapabilitySet,
        inner: Arc<dyn InboxQueries>,
    ) -> Self {
        Self {
            user_id,
            capabilities,
            inner,
        }
    }
}

#[async_trait]
impl InboxApi for GatedInboxApi {
    async fn list(&self) -> SandboxResult<Vec<InboxItem>> {
        self.capabilities.require(Capability::ReadInbox)?;
        Ok(self.inner.list(&self.user_id).await?)
    }

    async fn unread(&self) -> SandboxResult<Vec<InboxItem>> {
        self.capabilities.require(Capability::ReadInbox)?;
        Ok(self.inner.unread(&self.user_id).await?)
    }
}

/// Null object handed out when `read:inbox` was not granted.
pub(crate) struct DeniedInboxApi;

#[async_trait]
impl InboxApi for DeniedInboxApi {
    async fn list(&self) -> SandboxResult<Vec<InboxItem>> {
        Err(denied(Capability::ReadInbox))
    }

    async fn unread(&self) -> SandboxResult<Vec<InboxItem>> {
        Err(denied(Capability::ReadInbox))
    }
}
