//! The executor.

use std::sync::Arc;

use tracing::{debug, info, warn};

use orbita_core::{OrbitId, UserId};
use orbita_events::DomainEvent;
use orbita_orbits::{
    DiscoveryError, Orbit, OrbitError, OrbitRegistry, OrbitResult, discover_with_errors,
};
use orbita_sandbox::{
    CommandDefinition, CommandRegistrar, HostServices, OrbitContext, ToolDefinition,
    ToolRegistrar,
};

use crate::config::RuntimeConfig;

/// Everything an activation produced.
#[derive(Debug)]
pub struct Activation {
    /// The shared orbit instance.
    pub orbit: Arc<dyn Orbit>,
    /// The context the orbit was initialized with. Handler invocations for
    /// this `(orbit, user)` pair reuse it.
    pub context: OrbitContext,
    /// Tools the orbit registered, qualified `orbit:{id}:{tool}`.
    pub tools: Vec<ToolDefinition>,
    /// CLI commands the orbit registered.
    pub commands: Vec<CommandDefinition>,
}

/// Orchestrates registry lookups, context construction, and lifecycle
/// hooks.
///
/// Explicitly constructed and passed by reference wherever needed — the
/// runtime holds no global state.
pub struct OrbitRuntime {
    registry: Arc<OrbitRegistry>,
    services: Arc<HostServices>,
    config: RuntimeConfig,
}

impl OrbitRuntime {
    /// Assemble a runtime from its collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<OrbitRegistry>,
        services: Arc<HostServices>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            registry,
            services,
            config,
        }
    }

    /// The registry (for registration and introspection).
    #[must_use]
    pub fn registry(&self) -> &Arc<OrbitRegistry> {
        &self.registry
    }

    /// The runtime configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The injected host services.
    #[must_use]
    pub fn services(&self) -> &Arc<HostServices> {
        &self.services
    }

    /// Activate an orbit for a user.
    ///
    /// Looks the orbit up (running the entitlement gate and any lazy
    /// load), builds a context granting the manifest's declared
    /// capabilities, calls `initialize`, then collects tool, command, and
    /// event-subscription contributions. A failure at any step leaves
    /// other orbits untouched — one orbit degrading never destabilizes
    /// the host.
    ///
    /// # Errors
    ///
    /// Registry lookup errors, manifest capability errors, or whatever
    /// the orbit's own hooks return.
    pub async fn activate(&self, id: &OrbitId, user_id: &UserId) -> OrbitResult<Activation> {
        let orbit = self.registry.get(id, user_id).await?;
        let manifest = self.registry.manifest(id).await?;
        let capabilities = manifest.declared_capabilities()?;

        let context = OrbitContext::new(
            id.clone(),
            user_id.clone(),
            capabilities.clone(),
            Arc::clone(&self.services),
        );

        orbit.initialize(&context).await?;

        let mut tools = ToolRegistrar::new(id.clone(), capabilities.clone());
        orbit.register_tools(&mut tools)?;

        let mut commands = CommandRegistrar::new(id.clone(), capabilities);
        orbit.register_commands(&mut commands)?;

        let events = context.events();
        orbit.subscribe_events(&events)?;

        info!(orbit_id = %id, user_id = %user_id, "Activated orbit");
        Ok(Activation {
            orbit,
            context,
            tools: tools.into_tools(),
            commands: commands.into_commands(),
        })
    }

    /// Forward a host domain event to every subscribed handler.
    ///
    /// Returns the number of handlers invoked; handler failures are
    /// swallowed by the bus.
    pub async fn dispatch_event(&self, event: &DomainEvent) -> usize {
        self.services.event_bus().dispatch(event).await
    }

    /// Discover orbits over the configured search paths and register
    /// their manifests.
    ///
    /// Manifests needing a newer host API than
    /// [`RuntimeConfig::api_version`] are refused and reported; ids that
    /// are already registered (e.g. a builtin shadowing an on-disk orbit)
    /// are skipped. Returns how many were registered plus every problem
    /// encountered.
    pub async fn discover_and_register(&self) -> (usize, Vec<DiscoveryError>) {
        let (found, mut errors) = discover_with_errors(&self.config.search_paths);
        let mut registered: usize = 0;

        for candidate in found {
            if !candidate.manifest.is_compatible_with(&self.config.api_version) {
                warn!(
                    orbit_id = %candidate.manifest.id,
                    min_api_version = candidate.manifest.min_api_version.as_deref().unwrap_or(""),
                    "Orbit requires a newer host API"
                );
                errors.push(DiscoveryError::InvalidManifest {
                    path: candidate.path,
                    source: OrbitError::ManifestInvalid {
                        message: format!(
                            "requires host API {} but this host is {}",
                            candidate.manifest.min_api_version.as_deref().unwrap_or("?"),
                            self.config.api_version
                        ),
                    },
                });
                continue;
            }

            let id = candidate.manifest.id.clone();
            match self
                .registry
                .register_manifest(candidate.manifest, candidate.path.clone())
                .await
            {
                Ok(()) => registered = registered.saturating_add(1),
                Err(OrbitError::AlreadyLoaded(_)) => {
                    debug!(orbit_id = %id, "Orbit id already registered, skipping");
                },
                Err(e) => {
                    errors.push(DiscoveryError::InvalidManifest {
                        path: candidate.path,
                        source: e,
                    });
                },
            }
        }

        info!(registered, errors = errors.len(), "Discovery registration finished");
        (registered, errors)
    }

    /// Shut down every ready orbit, best-effort.
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
    }
}

impl std::fmt::Debug for OrbitRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitRuntime")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
