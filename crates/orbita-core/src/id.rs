//! Validated runtime identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error produced when parsing an identifier fails.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The orbit id string is malformed.
    #[error("invalid orbit id: {0}")]
    InvalidOrbitId(String),

    /// The user id string is empty.
    #[error("user id must not be empty")]
    EmptyUserId,
}

/// Unique, stable orbit identifier in `{vendor}.{name}` form.
///
/// Both segments must be non-empty, lowercase alphanumeric with interior
/// hyphens, e.g. `acme.pomodoro` or `orbita.ideal-week`. The vendor segment
/// keeps ids globally unique across third-party authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrbitId(String);

/// Deserialize with validation so malformed ids in manifests or stored
/// state are rejected at the boundary.
impl<'de> Deserialize<'de> for OrbitId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

impl OrbitId {
    /// Parse and validate an orbit id.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidOrbitId`] if the id is not in
    /// `{vendor}.{name}` form or a segment contains invalid characters.
    pub fn parse(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create an `OrbitId` without validation (tests and internal constants).
    #[must_use]
    pub fn from_static(id: &str) -> Self {
        Self(id.to_string())
    }

    /// The inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The vendor segment (before the dot).
    #[must_use]
    pub fn vendor(&self) -> &str {
        self.0.split_once('.').map_or("", |(vendor, _)| vendor)
    }

    /// The name segment (after the dot).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, name)| name)
    }

    /// Check whether a string is a valid orbit id without constructing one.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        Self::validate(id).is_ok()
    }

    fn validate(id: &str) -> Result<(), IdError> {
        let Some((vendor, name)) = id.split_once('.') else {
            return Err(IdError::InvalidOrbitId(format!(
                "expected {{vendor}}.{{name}}, got: {id}"
            )));
        };
        for segment in [vendor, name] {
            if segment.is_empty() {
                return Err(IdError::InvalidOrbitId(format!(
                    "vendor and name segments must be non-empty, got: {id}"
                )));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(IdError::InvalidOrbitId(format!(
                    "segments must be lowercase alphanumeric with hyphens, got: {id}"
                )));
            }
            if segment.starts_with('-') || segment.ends_with('-') {
                return Err(IdError::InvalidOrbitId(format!(
                    "segments must not start or end with a hyphen, got: {id}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for OrbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrbitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque identifier for a host user.
///
/// The runtime treats this as an opaque handle; its shape is owned by the
/// host's identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(String);

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

impl UserId {
    /// Create a user id, rejecting the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::EmptyUserId`] for an empty input.
    pub fn parse(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdError::EmptyUserId);
        }
        Ok(Self(id))
    }

    /// Create a `UserId` without validation (tests and internal constants).
    #[must_use]
    pub fn from_static(id: &str) -> Self {
        Self(id.to_string())
    }

    /// The inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
