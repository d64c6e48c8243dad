//! Capability grant sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, validate_capabilities};
use crate::error::{CapabilityError, CapabilityResult};

/// An immutable set of granted capabilities.
///
/// Membership tests are O(1). From the orbit's perspective the set never
/// changes for the duration of a session — grants are fixed at activation
/// and revocation is not supported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    granted: HashSet<Capability>,
}

impl CapabilitySet {
    /// Build a set from granted capabilities.
    #[must_use]
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            granted: capabilities.into_iter().collect(),
        }
    }

    /// The empty grant set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from token strings, validating each.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidCapability`] naming every token not
    /// in the vocabulary.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> CapabilityResult<Self> {
        Ok(Self::new(validate_capabilities(tokens)?))
    }

    /// Whether the capability is granted.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    /// Whether every listed capability is granted.
    #[must_use]
    pub fn has_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|cap| self.granted.contains(cap))
    }

    /// Fail with [`CapabilityError::NotGranted`] unless the capability is
    /// granted.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::NotGranted`] when the capability is absent.
    pub fn require(&self, capability: Capability) -> CapabilityResult<()> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(CapabilityError::NotGranted { capability })
        }
    }

    /// Iterate the granted capabilities (unordered).
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.granted.iter().copied()
    }

    /// Number of granted capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    /// Whether nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self::new(iter)
    }
}
