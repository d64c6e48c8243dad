//! The orbit registry.
//!
//! Central authority mapping orbit ids to either a live instance or a
//! deferred factory, tracking lifecycle status, and checking entitlements.
//! The registry is the exclusive owner and only writer of entry state;
//! callers read through [`get`](OrbitRegistry::get),
//! [`status`](OrbitRegistry::status), and
//! [`manifest`](OrbitRegistry::manifest).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};
use tracing::{debug, info, warn};

use orbita_capabilities::CapabilityError;
use orbita_core::{OrbitId, UserId};

use crate::error::{OrbitError, OrbitResult};
use crate::manifest::OrbitManifest;
use crate::orbit::{Orbit, OrbitFactory, OrbitStatus};

/// Pluggable billing/plan gate.
///
/// Consulted on **every** lookup of an orbit whose manifest declares an
/// entitlement — results are deliberately not cached so a live plan
/// downgrade takes effect on the next call.
#[async_trait]
pub trait EntitlementChecker: Send + Sync {
    /// Whether the user's plan includes the entitlement.
    ///
    /// # Errors
    ///
    /// A checker failure propagates verbatim to the `get` caller.
    async fn has_entitlement(&self, user_id: &UserId, entitlement: &str) -> OrbitResult<bool>;
}

/// Registry-internal record for one orbit id.
struct OrbitEntry {
    instance: Option<Arc<dyn Orbit>>,
    factory: Option<OrbitFactory>,
    manifest: OrbitManifest,
    status: OrbitStatus,
    last_error: Option<String>,
    builtin: bool,
    install_path: Option<PathBuf>,
    /// Wakes callers parked on a `Loading` entry once the factory settles.
    loaded: Arc<Notify>,
}

impl OrbitEntry {
    fn new(manifest: OrbitManifest) -> Self {
        Self {
            instance: None,
            factory: None,
            manifest,
            status: OrbitStatus::Unloaded,
            last_error: None,
            builtin: false,
            install_path: None,
            loaded: Arc::new(Notify::new()),
        }
    }
}

/// Registry of known orbits.
///
/// A single reader-writer lock guards the id → entry map. Lazy loads use
/// double-checked locking: the factory is chosen under the write lock but
/// runs *outside* it, so one orbit's slow or reentrant factory never
/// stalls lookups of other orbits — and the `Loading` status bounds the
/// factory to at most one execution per id no matter how many `get`
/// callers race.
pub struct OrbitRegistry {
    entries: RwLock<HashMap<OrbitId, OrbitEntry>>,
    entitlements: Option<Arc<dyn EntitlementChecker>>,
}

impl OrbitRegistry {
    /// Create a registry with no entitlement gating.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            entitlements: None,
        }
    }

    /// Create a registry that consults the checker on every gated lookup.
    #[must_use]
    pub fn with_entitlements(checker: Arc<dyn EntitlementChecker>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            entitlements: Some(checker),
        }
    }

    /// Register an already-constructed built-in orbit.
    ///
    /// The entry goes straight to `Ready` with a manifest synthesized from
    /// the orbit's metadata and required capabilities.
    ///
    /// # Errors
    ///
    /// [`OrbitError::AlreadyLoaded`] when the id is taken.
    pub async fn register_builtin(&self, orbit: Arc<dyn Orbit>) -> OrbitResult<()> {
        let metadata = orbit.metadata();
        let id = metadata.id.clone();
        let manifest = OrbitManifest::for_builtin(&metadata, &orbit.required_capabilities());

        let mut entries = self.entries.write().await;
        if entries.contains_key(&id) {
            return Err(OrbitError::AlreadyLoaded(id));
        }

        let mut entry = OrbitEntry::new(manifest);
        entry.instance = Some(orbit);
        entry.status = OrbitStatus::Ready;
        entry.builtin = true;
        entries.insert(id.clone(), entry);

        info!(orbit_id = %id, "Registered builtin orbit");
        Ok(())
    }

    /// Register a factory for deferred construction.
    ///
    /// The id is reserved immediately; the factory runs on the first
    /// [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Manifest validation errors, or [`OrbitError::AlreadyLoaded`] when
    /// the id is taken.
    pub async fn register_factory(
        &self,
        manifest: OrbitManifest,
        factory: OrbitFactory,
    ) -> OrbitResult<()> {
        manifest.validate()?;
        let id = manifest.orbit_id()?;

        let mut entries = self.entries.write().await;
        if entries.contains_key(&id) {
            return Err(OrbitError::AlreadyLoaded(id));
        }

        let mut entry = OrbitEntry::new(manifest);
        entry.factory = Some(factory);
        entries.insert(id.clone(), entry);

        info!(orbit_id = %id, "Registered orbit factory");
        Ok(())
    }

    /// Register a discovered manifest with no factory yet.
    ///
    /// Reserves the id and records where the orbit lives on disk. Lookups
    /// fail with [`OrbitError::NotInitialized`] until a factory or
    /// instance is attached — dynamic code loading happens outside the
    /// registry.
    ///
    /// # Errors
    ///
    /// Manifest validation errors, or [`OrbitError::AlreadyLoaded`] when
    /// the id is taken.
    pub async fn register_manifest(
        &self,
        manifest: OrbitManifest,
        path: impl Into<PathBuf>,
    ) -> OrbitResult<()> {
        manifest.validate()?;
        let id = manifest.orbit_id()?;

        let mut entries = self.entries.write().await;
        if entries.contains_key(&id) {
            return Err(OrbitError::AlreadyLoaded(id));
        }

        let mut entry = OrbitEntry::new(manifest);
        entry.install_path = Some(path.into());
        entries.insert(id.clone(), entry);

        debug!(orbit_id = %id, "Registered orbit manifest");
        Ok(())
    }

    /// Look up an orbit for a user, lazily loading it if necessary.
    ///
    /// The entitlement gate runs first, on every call — even for orbits
    /// that are already `Ready`. Then:
    ///
    /// - `Ready` returns the shared instance (read lock only)
    /// - `Failed` returns the cached load error; no automatic retry
    /// - `Loading` waits for the in-flight factory and re-reads
    /// - `Unloaded` attempts the load itself under double-checked locking
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`], [`OrbitError::NotEntitled`], a checker
    /// error verbatim, [`OrbitError::LoadFailed`], or
    /// [`OrbitError::NotInitialized`] for factory-less or shut-down
    /// entries.
    pub async fn get(&self, id: &OrbitId, user_id: &UserId) -> OrbitResult<Arc<dyn Orbit>> {
        self.check_entitlement(id, user_id).await?;

        loop {
            let entries = self.entries.read().await;
            let entry = entries
                .get(id)
                .ok_or_else(|| OrbitError::NotFound(id.clone()))?;

            match entry.status {
                OrbitStatus::Ready => {
                    return entry
                        .instance
                        .as_ref()
                        .map(Arc::clone)
                        .ok_or_else(|| OrbitError::NotInitialized(id.clone()));
                },
                OrbitStatus::Failed => {
                    let message = entry
                        .last_error
                        .clone()
                        .unwrap_or_else(|| "orbit load failed".to_string());
                    return Err(OrbitError::LoadFailed {
                        orbit_id: id.clone(),
                        message,
                    });
                },
                OrbitStatus::Shutdown => return Err(OrbitError::NotInitialized(id.clone())),
                OrbitStatus::Loading => {
                    let notify = Arc::clone(&entry.loaded);
                    let mut notified = Box::pin(notify.notified());
                    // Register interest before releasing the lock: the
                    // loader needs the write lock to record its outcome, so
                    // its wakeup cannot fire before we are listening.
                    notified.as_mut().enable();
                    drop(entries);
                    notified.await;
                },
                OrbitStatus::Unloaded => {
                    drop(entries);
                    if let Some(instance) = self.try_load(id).await? {
                        return Ok(instance);
                    }
                    // Another caller advanced the state first; re-read it.
                },
            }
        }
    }

    /// Attempt the load for an `Unloaded` entry.
    ///
    /// Returns `Ok(None)` when another caller changed the state between
    /// our status read and the write lock (double-checked locking) — the
    /// caller loops and observes the final outcome instead of re-invoking
    /// the factory.
    async fn try_load(&self, id: &OrbitId) -> OrbitResult<Option<Arc<dyn Orbit>>> {
        let factory = {
            let mut entries = self.entries.write().await;
            let entry = entries
                .get_mut(id)
                .ok_or_else(|| OrbitError::NotFound(id.clone()))?;

            if entry.status != OrbitStatus::Unloaded {
                return Ok(None);
            }
            let Some(factory) = entry.factory.clone() else {
                return Err(OrbitError::NotInitialized(id.clone()));
            };
            entry.status = OrbitStatus::Loading;
            factory
        };

        // User-supplied construction runs with no lock held: a slow or
        // reentrant factory must not stall lookups of other orbits.
        debug!(orbit_id = %id, "Loading orbit");
        let result = factory();

        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| OrbitError::NotFound(id.clone()))?;

        let outcome = match result {
            Ok(instance) => {
                entry.instance = Some(Arc::clone(&instance));
                entry.status = OrbitStatus::Ready;
                entry.last_error = None;
                info!(orbit_id = %id, "Orbit loaded");
                Ok(Some(instance))
            },
            Err(e) => {
                let message = e.to_string();
                entry.status = OrbitStatus::Failed;
                entry.last_error = Some(message.clone());
                warn!(orbit_id = %id, error = %message, "Orbit load failed");
                Err(OrbitError::LoadFailed {
                    orbit_id: id.clone(),
                    message,
                })
            },
        };
        entry.loaded.notify_waiters();
        outcome
    }

    async fn check_entitlement(&self, id: &OrbitId, user_id: &UserId) -> OrbitResult<()> {
        let Some(checker) = &self.entitlements else {
            return Ok(());
        };
        let entitlement = {
            let entries = self.entries.read().await;
            let entry = entries
                .get(id)
                .ok_or_else(|| OrbitError::NotFound(id.clone()))?;
            entry
                .manifest
                .required_entitlement()
                .map(ToString::to_string)
        };
        let Some(entitlement) = entitlement else {
            return Ok(());
        };

        if checker.has_entitlement(user_id, &entitlement).await? {
            Ok(())
        } else {
            debug!(orbit_id = %id, user_id = %user_id, entitlement, "User not entitled");
            Err(OrbitError::NotEntitled {
                orbit_id: id.clone(),
                entitlement,
            })
        }
    }

    /// Check that a loaded orbit's requirements fit its manifest ceiling.
    ///
    /// Self-consistency, independent of any user's grants: every
    /// capability the instance reports in `required_capabilities()` must
    /// appear in the manifest's declared list.
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`], [`OrbitError::NotInitialized`] when no
    /// instance exists yet, invalid declared tokens, or a
    /// [`CapabilityError::Mismatch`] listing what is missing.
    pub async fn validate_capabilities(&self, id: &OrbitId) -> OrbitResult<()> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(id)
            .ok_or_else(|| OrbitError::NotFound(id.clone()))?;
        let instance = entry
            .instance
            .as_ref()
            .ok_or_else(|| OrbitError::NotInitialized(id.clone()))?;

        let declared = entry.manifest.declared_capabilities()?;
        let missing: Vec<_> = instance
            .required_capabilities()
            .into_iter()
            .filter(|cap| !declared.has(*cap))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CapabilityError::Mismatch {
                orbit_id: id.clone(),
                missing,
            }
            .into())
        }
    }

    /// Current lifecycle status of an entry.
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`] for unknown ids.
    pub async fn status(&self, id: &OrbitId) -> OrbitResult<OrbitStatus> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .map(|entry| entry.status)
            .ok_or_else(|| OrbitError::NotFound(id.clone()))
    }

    /// The manifest registered for an id.
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`] for unknown ids.
    pub async fn manifest(&self, id: &OrbitId) -> OrbitResult<OrbitManifest> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .map(|entry| entry.manifest.clone())
            .ok_or_else(|| OrbitError::NotFound(id.clone()))
    }

    /// Whether an id is registered (any status).
    pub async fn is_registered(&self, id: &OrbitId) -> bool {
        self.entries.read().await.contains_key(id)
    }

    /// Whether the entry was registered as a built-in.
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`] for unknown ids.
    pub async fn is_builtin(&self, id: &OrbitId) -> OrbitResult<bool> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .map(|entry| entry.builtin)
            .ok_or_else(|| OrbitError::NotFound(id.clone()))
    }

    /// Where a discovered orbit lives on disk, `None` for builtins and
    /// factory registrations.
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`] for unknown ids.
    pub async fn install_path(&self, id: &OrbitId) -> OrbitResult<Option<PathBuf>> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .map(|entry| entry.install_path.clone())
            .ok_or_else(|| OrbitError::NotFound(id.clone()))
    }

    /// Manifests of every registered orbit, sorted by id.
    pub async fn list(&self) -> Vec<OrbitManifest> {
        let entries = self.entries.read().await;
        let mut manifests: Vec<OrbitManifest> =
            entries.values().map(|entry| entry.manifest.clone()).collect();
        manifests.sort_by(|a, b| a.id.cmp(&b.id));
        manifests
    }

    /// Manifests of the orbits a user is entitled to, sorted by id.
    ///
    /// Filters [`list`](Self::list) through the entitlement checker
    /// without ever triggering a load. A checker failure counts as
    /// not-available for that orbit and is logged rather than failing the
    /// whole listing.
    pub async fn list_available(&self, user_id: &UserId) -> Vec<OrbitManifest> {
        let manifests = self.list().await;
        let Some(checker) = &self.entitlements else {
            return manifests;
        };

        let mut available = Vec::with_capacity(manifests.len());
        for manifest in manifests {
            match manifest.required_entitlement() {
                None => available.push(manifest),
                Some(entitlement) => {
                    match checker.has_entitlement(user_id, entitlement).await {
                        Ok(true) => available.push(manifest),
                        Ok(false) => {},
                        Err(e) => {
                            warn!(
                                orbit_id = %manifest.id,
                                user_id = %user_id,
                                error = %e,
                                "Entitlement check failed while listing"
                            );
                        },
                    }
                },
            }
        }
        available
    }

    /// Shut down every `Ready` orbit.
    ///
    /// Best-effort: each instance's `shutdown` runs outside the lock,
    /// errors are logged and the iteration continues. Entries transition
    /// to `Shutdown`, which is terminal.
    pub async fn shutdown(&self) {
        let to_stop: Vec<(OrbitId, Arc<dyn Orbit>)> = {
            let mut entries = self.entries.write().await;
            entries
                .iter_mut()
                .filter_map(|(id, entry)| {
                    if entry.status == OrbitStatus::Ready {
                        entry.status = OrbitStatus::Shutdown;
                        entry
                            .instance
                            .as_ref()
                            .map(|instance| (id.clone(), Arc::clone(instance)))
                    } else {
                        None
                    }
                })
                .collect()
        };

        for (id, orbit) in to_stop {
            if let Err(e) = orbit.shutdown().await {
                warn!(orbit_id = %id, error = %e, "Orbit shutdown error");
            } else {
                info!(orbit_id = %id, "Orbit shut down");
            }
        }
    }

    /// Shut down one orbit (if `Ready`) and remove its entry.
    ///
    /// Removing the entry is what makes a `Failed` orbit recoverable: the
    /// id becomes free for re-registration with a fresh factory.
    ///
    /// # Errors
    ///
    /// [`OrbitError::NotFound`] for unknown ids.
    pub async fn unregister(&self, id: &OrbitId) -> OrbitResult<()> {
        let removed = {
            let mut entries = self.entries.write().await;
            entries
                .remove(id)
                .ok_or_else(|| OrbitError::NotFound(id.clone()))?
        };

        if removed.status == OrbitStatus::Ready
            && let Some(instance) = removed.instance
            && let Err(e) = instance.shutdown().await
        {
            warn!(orbit_id = %id, error = %e, "Orbit shutdown error during unregister");
        }

        info!(orbit_id = %id, "Unregistered orbit");
        Ok(())
    }

    /// Number of registered orbits.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for OrbitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrbitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitRegistry")
            .field("has_entitlement_checker", &self.entitlements.is_some())
            .finish_non_exhaustive()
    }
}
