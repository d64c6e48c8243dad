//! The orbit trait and core types.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use orbita_capabilities::Capability;
use orbita_core::OrbitId;
use orbita_events::OrbitEvents;
use orbita_sandbox::{CommandRegistrar, OrbitContext, ToolRegistrar};

use crate::error::OrbitResult;

/// Self-description an orbit reports to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitMetadata {
    /// Unique orbit id (`{vendor}.{name}`).
    pub id: OrbitId,
    /// Human-readable display name.
    pub name: String,
    /// Semantic version string.
    pub version: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Lifecycle state of a registry entry.
///
/// `Unloaded → Loading → Ready` or `Loading → Failed`; any `Ready` entry
/// can transition to `Shutdown`, which is terminal. `Unloaded` and
/// `Failed` recover only through re-registration; the registry never
/// auto-retries a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitStatus {
    /// Registered but not yet constructed.
    Unloaded,
    /// A caller is currently running the factory.
    Loading,
    /// Instance available.
    Ready,
    /// The factory failed; the error is cached on the entry.
    Failed,
    /// Shut down; terminal for this entry.
    Shutdown,
}

impl std::fmt::Display for OrbitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Shutdown => "shutdown",
        };
        f.write_str(s)
    }
}

/// Deferred orbit constructor.
///
/// Runs outside every registry lock and at most once per id regardless of
/// how many lookups race on an unloaded orbit.
pub type OrbitFactory = Arc<dyn Fn() -> OrbitResult<Arc<dyn Orbit>> + Send + Sync>;

/// An extension module hosted by the runtime.
///
/// Built-in orbits (focus timers, wellness scoring, planning aides) and
/// discovered third-party orbits implement the same trait; the registry
/// makes no distinction beyond the `builtin` flag on its entry. Instances
/// are shared across all users — per-user isolation happens in the
/// [`OrbitContext`] the executor constructs for every activation, so
/// implementations must be internally synchronized if they keep state.
#[async_trait]
pub trait Orbit: Send + Sync {
    /// Identity and version of this orbit.
    fn metadata(&self) -> OrbitMetadata;

    /// The capabilities this orbit needs to function.
    ///
    /// Must be covered by the manifest's declared list; the registry's
    /// [`validate_capabilities`](crate::OrbitRegistry::validate_capabilities)
    /// flags any excess as a mismatch.
    fn required_capabilities(&self) -> Vec<Capability>;

    /// Called once per activation with the sandboxed context.
    async fn initialize(&self, ctx: &OrbitContext) -> OrbitResult<()>;

    /// Called when the registry shuts the orbit down. Best-effort; errors
    /// are logged, not propagated.
    async fn shutdown(&self) -> OrbitResult<()>;

    /// Contribute tools during activation. Default: none.
    fn register_tools(&self, registrar: &mut ToolRegistrar) -> OrbitResult<()> {
        let _ = registrar;
        Ok(())
    }

    /// Contribute CLI commands during activation. Default: none.
    fn register_commands(&self, registrar: &mut CommandRegistrar) -> OrbitResult<()> {
        let _ = registrar;
        Ok(())
    }

    /// Subscribe to host domain events during activation. Default: none.
    fn subscribe_events(&self, events: &OrbitEvents) -> OrbitResult<()> {
        let _ = events;
        Ok(())
    }
}

impl std::fmt::Debug for dyn Orbit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orbit")
            .field("id", &self.metadata().id)
            .finish_non_exhaustive()
    }
}
