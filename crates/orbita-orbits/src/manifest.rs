//! Orbit manifest types.
//!
//! An orbit manifest (`orbit.json`) describes an orbit before anything is
//! loaded: identity, version, capability ceiling, and the optional
//! entitlement gate. Manifests are loaded from disk during discovery.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use orbita_capabilities::{Capability, CapabilitySet, validate_capabilities};
use orbita_core::OrbitId;

use crate::error::{OrbitError, OrbitResult};
use crate::orbit::OrbitMetadata;

/// Standard manifest file name, one per orbit directory.
pub const MANIFEST_FILE_NAME: &str = "orbit.json";

/// The only accepted `type` value.
pub const MANIFEST_TYPE: &str = "orbit";

/// An orbit manifest loaded from `orbit.json`.
///
/// The `capabilities` list is the orbit's declared ceiling — activation
/// grants at most what is listed here, and
/// [`OrbitRegistry::validate_capabilities`](crate::OrbitRegistry::validate_capabilities)
/// cross-checks it against what the loaded instance actually requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitManifest {
    /// Globally unique id in `{vendor}.{name}` form.
    ///
    /// Kept as a raw string so validation can distinguish "missing" from
    /// "malformed"; [`OrbitManifest::orbit_id`] returns the typed form.
    #[serde(default)]
    pub id: String,
    /// Human-readable display name.
    #[serde(default)]
    pub name: String,
    /// Semantic version string.
    #[serde(default)]
    pub version: String,
    /// Must be exactly `"orbit"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Optional author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional license identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Optional homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Minimum host API version this orbit supports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_api_version: Option<String>,
    /// Declared capability ceiling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    /// Billing/plan gate. Absent or empty means open to all users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlement: Option<String>,
    /// Free-form JSON Schema for orbit configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<Value>,
}

impl OrbitManifest {
    /// Synthesize a manifest for a built-in orbit from its metadata and
    /// required capabilities.
    #[must_use]
    pub fn for_builtin(metadata: &OrbitMetadata, capabilities: &[Capability]) -> Self {
        Self {
            id: metadata.id.as_str().to_string(),
            name: metadata.name.clone(),
            version: metadata.version.clone(),
            kind: MANIFEST_TYPE.to_string(),
            author: None,
            description: metadata.description.clone(),
            license: None,
            homepage: None,
            min_api_version: None,
            capabilities: capabilities
                .iter()
                .map(|cap| cap.as_str().to_string())
                .collect(),
            entitlement: None,
            config_schema: None,
        }
    }

    /// Load and validate a manifest from disk.
    ///
    /// Nothing is partially registered on failure — the caller gets a typed
    /// error and no side effects.
    ///
    /// # Errors
    ///
    /// [`OrbitError::ManifestNotFound`] when the file does not exist,
    /// [`OrbitError::ManifestInvalid`] (or a more specific manifest error)
    /// on decode or validation failure.
    pub fn load(path: &Path) -> OrbitResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OrbitError::ManifestNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                OrbitError::Io(e)
            }
        })?;

        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| OrbitError::ManifestInvalid {
                message: format!("{}: {e}", path.display()),
            })?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Write the manifest as pretty JSON.
    ///
    /// # Errors
    ///
    /// I/O failure, or a serialization failure rendered as
    /// [`OrbitError::ManifestInvalid`].
    pub fn save(&self, path: &Path) -> OrbitResult<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| OrbitError::ManifestInvalid {
                message: e.to_string(),
            })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the manifest invariants.
    ///
    /// # Errors
    ///
    /// - [`OrbitError::ManifestMissingId`] for an empty id
    /// - [`OrbitError::ManifestMissingType`] for an empty type
    /// - [`OrbitError::ManifestInvalid`] for a malformed id, wrong type,
    ///   empty name, or a version that does not parse as semver
    /// - [`CapabilityError::InvalidCapability`](orbita_capabilities::CapabilityError)
    ///   naming every unknown capability token
    pub fn validate(&self) -> OrbitResult<()> {
        if self.id.is_empty() {
            return Err(OrbitError::ManifestMissingId);
        }
        if !OrbitId::is_valid(&self.id) {
            return Err(OrbitError::ManifestInvalid {
                message: format!("id must be {{vendor}}.{{name}}, got: {}", self.id),
            });
        }
        if self.name.is_empty() {
            return Err(OrbitError::ManifestInvalid {
                message: "name must not be empty".to_string(),
            });
        }
        if self.kind.is_empty() {
            return Err(OrbitError::ManifestMissingType);
        }
        if self.kind != MANIFEST_TYPE {
            return Err(OrbitError::ManifestInvalid {
                message: format!("type must be \"{MANIFEST_TYPE}\", got: {}", self.kind),
            });
        }
        if self.version.is_empty() {
            return Err(OrbitError::ManifestInvalid {
                message: "version must not be empty".to_string(),
            });
        }
        if let Err(e) = semver::Version::parse(&self.version) {
            return Err(OrbitError::ManifestInvalid {
                message: format!("version is not valid semver: {e}"),
            });
        }
        if let Some(min) = &self.min_api_version
            && let Err(e) = semver::Version::parse(min)
        {
            return Err(OrbitError::ManifestInvalid {
                message: format!("min_api_version is not valid semver: {e}"),
            });
        }
        validate_capabilities(&self.capabilities)?;
        Ok(())
    }

    /// The typed orbit id. Call after [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// The same manifest errors `validate` raises for the id field.
    pub fn orbit_id(&self) -> OrbitResult<OrbitId> {
        if self.id.is_empty() {
            return Err(OrbitError::ManifestMissingId);
        }
        OrbitId::parse(self.id.clone()).map_err(|e| OrbitError::ManifestInvalid {
            message: e.to_string(),
        })
    }

    /// The declared capability ceiling as a set.
    ///
    /// # Errors
    ///
    /// Invalid capability tokens.
    pub fn declared_capabilities(&self) -> OrbitResult<CapabilitySet> {
        Ok(CapabilitySet::from_tokens(&self.capabilities)?)
    }

    /// The entitlement gate, `None` when absent or empty (open to all).
    #[must_use]
    pub fn required_entitlement(&self) -> Option<&str> {
        self.entitlement.as_deref().filter(|e| !e.is_empty())
    }

    /// Whether this orbit supports the given host API version.
    ///
    /// A manifest without `min_api_version` (or with one that does not
    /// parse — `validate` rejects those up front) is compatible with any
    /// host.
    #[must_use]
    pub fn is_compatible_with(&self, api_version: &semver::Version) -> bool {
        self.min_api_version
            .as_deref()
            .and_then(|min| semver::Version::parse(min).ok())
            .is_none_or(|min| min <= *api_version)
    }
}
