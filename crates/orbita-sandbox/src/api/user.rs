//! User profile API implementations.

use std::sync::Arc;

use async_trait::async_trait;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{UserId, UserProfile, UserQueries};

use crate::api::{UserApi, denied};
use crate::error::SandboxResult;

/// Real user API: re-checks `read:user`, then delegates.
pub(crate) struct GatedUserApi {
    user_id: UserId,
    capabilities: CapabilitySet,
    inner: Arc<dyn UserQueries>,
}

impl GatedUserApi {
    pub(crate) fn new(
        user_id: UserId,
        capabilities: CapabilitySet,
        inner: Arc<dyn UserQueries>,
    ) -> Self {
        Self {
            user_id,
            capabilities,
            inner,
        }
    }
}

#[async_trait]
impl UserApi for GatedUserApi {
    async fn profile(&self) -> SandboxResult<Option<UserProfile>> {
        self.capabilities.require(Capability::ReadUser)?;
        Ok(self.inner.profile(&self.user_id).await?)
    }
}

/// Null object handed out when `read:user` was not granted.
pub(crate) struct DeniedUserApi;

#[async_trait]
impl UserApi for DeniedUserApi {
    async fn profile(&self) -> SandboxResult<Option<UserProfile>> {
        Err(denied(Capability::ReadUser))
    }
}
