//! Task API implementations.

use std::sync::Arc;

use async_trait::async_trait;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::{TaskItem, TaskQueries, UserId};

use crate::api::{TaskApi, denied};
use crate::error::SandboxResult;

/// Real task API: re-checks `read:tasks`, then delegates.
pub(crate) struct GatedTaskApi {
    user_id: UserId,
    capabilities: CapabilitySet,
    inner: Arc<dyn TaskQueries>,
}

impl GatedTaskApi {
    pub(crate) fn new(
        user_id: UserId,
        capabilities: CapabilitySet,
        inner: Arc<dyn TaskQueries>,
    ) -> Self {
        Self {
            user_id,
            capabilities,
            inner,
        }
    }
}

#[async_trait]
impl TaskApi for GatedTaskApi {
    async fn list(&self) -> SandboxResult<Vec<TaskItem>> {
        self.capabilities.require(Capability::ReadTasks)?;
        Ok(self.inner.list(&self.user_id).await?)
    }

    async fn get(&self, task_id: &str) -> SandboxResult<Option<TaskItem>> {
        self.capabilities.require(Capability::ReadTasks)?;
        Ok(self.inner.get(&self.user_id, task_id).await?)
    }
}

/// Null object handed out when `read:tasks` was not granted.
pub(crate) struct DeniedTaskApi;

#[async_trait]
impl TaskApi for DeniedTaskApi {
    async fn list(&self) -> SandboxResult<Vec<TaskItem>> {
        Err(denied(Capability::ReadTasks))
    }

    async fn get(&self, _task_id: &str) -> SandboxResult<Option<TaskItem>> {
        Err(denied(Capability::ReadTasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbita_core::{QueryResult, TaskStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::SandboxError;
    use orbita_capabilities::CapabilityError;

    /// Spy that counts how often the collaborator is reached.
    struct SpyTasks {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TaskQueries for SpyTasks {
        async fn list(&self, _user: &UserId) -> QueryResult<Vec<TaskItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TaskItem {
                id: "t-1".into(),
                title: "Plan sprint".into(),
                status: TaskStatus::Open,
                due: None,
                project: None,
                tags: vec![],
            }])
        }

        async fn get(&self, _user: &UserId, task_id: &str) -> QueryResult<Option<TaskItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TaskItem {
                id: task_id.into(),
                title: "Plan sprint".into(),
                status: TaskStatus::Open,
                due: None,
                project: None,
                tags: vec![],
            }))
        }
    }

    #[tokio::test]
    async fn gated_api_delegates_with_capability() {
        let spy = Arc::new(SpyTasks {
            calls: AtomicUsize::new(0),
        });
        let api = GatedTaskApi::new(
            UserId::from_static("user-1"),
            CapabilitySet::new([Capability::ReadTasks]),
            Arc::clone(&spy) as Arc<dyn TaskQueries>,
        );

        let tasks = api.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(api.get("t-1").await.unwrap().is_some());
        assert_eq!(spy.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gated_api_rechecks_capability() {
        // Defense in depth: even a gated wrapper constructed with the wrong
        // set must refuse.
        let spy = Arc::new(SpyTasks {
            calls: AtomicUsize::new(0),
        });
        let api = GatedTaskApi::new(
            UserId::from_static("user-1"),
            CapabilitySet::empty(),
            Arc::clone(&spy) as Arc<dyn TaskQueries>,
        );

        assert!(matches!(
            api.list().await.unwrap_err(),
            SandboxError::Capability(CapabilityError::NotGranted { .. })
        ));
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn denied_api_never_reaches_collaborator() {
        let api = DeniedTaskApi;
        assert!(matches!(
            api.list().await.unwrap_err(),
            SandboxError::Capability(CapabilityError::NotGranted {
                capability: Capability::ReadTasks
            })
        ));
        assert!(matches!(
            api.get("t-1").await.unwrap_err(),
            SandboxError::Capability(CapabilityError::NotGranted { .. })
        ));
    }
}
