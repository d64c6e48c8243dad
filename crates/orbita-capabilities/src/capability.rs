//! The closed capability vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CapabilityError, CapabilityResult};

/// A permission token of the form `category:resource`.
///
/// The vocabulary is closed: only the variants below are valid, and manifest
/// validation rejects anything else. Granularity is per resource category —
/// `read:tasks` covers all of a user's tasks, never individual records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Read the user's tasks.
    ReadTasks,
    /// Read the user's habits.
    ReadHabits,
    /// Read the user's schedule blocks.
    ReadSchedule,
    /// Read the user's meetings.
    ReadMeetings,
    /// Read the user's inbox items.
    ReadInbox,
    /// Read the user's profile.
    ReadUser,
    /// Read from scoped key-value storage.
    ReadStorage,
    /// Write to scoped key-value storage.
    WriteStorage,
    /// Subscribe to host domain events.
    SubscribeEvents,
    /// Publish orbit events to the host.
    PublishEvents,
    /// Register tools during activation.
    RegisterTools,
    /// Register CLI commands during activation.
    RegisterCommands,
}

impl Capability {
    /// Every valid capability, in vocabulary order.
    pub const ALL: [Self; 12] = [
        Self::ReadTasks,
        Self::ReadHabits,
        Self::ReadSchedule,
        Self::ReadMeetings,
        Self::ReadInbox,
        Self::ReadUser,
        Self::ReadStorage,
        Self::WriteStorage,
        Self::SubscribeEvents,
        Self::PublishEvents,
        Self::RegisterTools,
        Self::RegisterCommands,
    ];

    /// The token string for this capability.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadTasks => "read:tasks",
            Self::ReadHabits => "read:habits",
            Self::ReadSchedule => "read:schedule",
            Self::ReadMeetings => "read:meetings",
            Self::ReadInbox => "read:inbox",
            Self::ReadUser => "read:user",
            Self::ReadStorage => "read:storage",
            Self::WriteStorage => "write:storage",
            Self::SubscribeEvents => "subscribe:events",
            Self::PublishEvents => "publish:events",
            Self::RegisterTools => "register:tools",
            Self::RegisterCommands => "register:commands",
        }
    }

    /// Parse a token string.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidCapability`] if the token is not in
    /// the vocabulary.
    pub fn parse(token: &str) -> CapabilityResult<Self> {
        Self::ALL
            .into_iter()
            .find(|cap| cap.as_str() == token)
            .ok_or_else(|| CapabilityError::InvalidCapability {
                tokens: vec![token.to_string()],
            })
    }

    /// Check whether a token string is in the vocabulary.
    #[must_use]
    pub fn is_valid(token: &str) -> bool {
        Self::parse(token).is_ok()
    }

    /// The category segment (before the colon).
    #[must_use]
    pub fn category(&self) -> &'static str {
        self.as_str().split_once(':').map_or("", |(c, _)| c)
    }

    /// The resource segment (after the colon).
    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.as_str().split_once(':').map_or("", |(_, r)| r)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Validate a list of capability tokens, parsing them all or failing once.
///
/// Unlike [`Capability::parse`], this aggregates every offending token into
/// a single [`CapabilityError::InvalidCapability`] so a manifest author sees
/// the full list of mistakes at once.
///
/// # Errors
///
/// Returns [`CapabilityError::InvalidCapability`] naming every token that is
/// not in the vocabulary.
pub fn validate_capabilities<S: AsRef<str>>(tokens: &[S]) -> CapabilityResult<Vec<Capability>> {
    let mut parsed = Vec::with_capacity(tokens.len());
    let mut invalid = Vec::new();

    for token in tokens {
        match Capability::parse(token.as_ref()) {
            Ok(cap) => parsed.push(cap),
            Err(_) => invalid.push(token.as_ref().to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(parsed)
    } else {
        Err(CapabilityError::InvalidCapability { tokens: invalid })
    }
}
