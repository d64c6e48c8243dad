//! Tool and command registrars.
//!
//! During activation the executor hands an orbit a registrar per surface;
//! the orbit declares what it contributes and the host collects the
//! definitions. Registration itself is capability-gated (`register:tools`,
//! `register:commands`).

use serde_json::Value;
use tracing::debug;

use orbita_capabilities::{Capability, CapabilitySet};
use orbita_core::OrbitId;

use crate::error::SandboxResult;

/// A tool an orbit exposes to the host's assistant layer.
///
/// Names are qualified `orbit:{orbit_id}:{tool}` so orbit tools can never
/// collide with built-in tools (no colons in their names) or with each
/// other.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// Fully qualified tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool input.
    pub input_schema: Value,
}

/// A CLI command an orbit contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefinition {
    /// The contributing orbit.
    pub orbit_id: OrbitId,
    /// Command name as typed by the user.
    pub name: String,
    /// One-line description.
    pub about: String,
    /// Usage string shown in help output.
    pub usage: String,
}

/// Collects tool definitions during activation. Gated by `register:tools`.
#[derive(Debug)]
pub struct ToolRegistrar {
    orbit_id: OrbitId,
    capabilities: CapabilitySet,
    tools: Vec<ToolDefinition>,
}

impl ToolRegistrar {
    /// Create a registrar bound to an orbit and its grants.
    #[must_use]
    pub fn new(orbit_id: OrbitId, capabilities: CapabilitySet) -> Self {
        Self {
            orbit_id,
            capabilities,
            tools: Vec::new(),
        }
    }

    /// Register a tool under the orbit's qualified namespace.
    ///
    /// # Errors
    ///
    /// Fails with a not-granted error when `register:tools` is missing.
    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        input_schema: Value,
    ) -> SandboxResult<()> {
        self.capabilities.require(Capability::RegisterTools)?;
        let qualified = format!("orbit:{}:{name}", self.orbit_id);
        debug!(orbit_id = %self.orbit_id, tool = %qualified, "Registered tool");
        self.tools.push(ToolDefinition {
            name: qualified,
            description: description.to_string(),
            input_schema,
        });
        Ok(())
    }

    /// The collected definitions, consuming the registrar.
    #[must_use]
    pub fn into_tools(self) -> Vec<ToolDefinition> {
        self.tools
    }
}

/// Collects command definitions during activation. Gated by
/// `register:commands`.
#[derive(Debug)]
pub struct CommandRegistrar {
    orbit_id: OrbitId,
    capabilities: CapabilitySet,
    commands: Vec<CommandDefinition>,
}

impl CommandRegistrar {
    /// Create a registrar bound to an orbit and its grants.
    #[must_use]
    pub fn new(orbit_id: OrbitId, capabilities: CapabilitySet) -> Self {
        Self {
            orbit_id,
            capabilities,
            commands: Vec::new(),
        }
    }

    /// Register a CLI command.
    ///
    /// # Errors
    ///
    /// Fails with a not-granted error when `register:commands` is missing.
    pub fn register(&mut self, name: &str, about: &str, usage: &str) -> SandboxResult<()> {
        self.capabilities.require(Capability::RegisterCommands)?;
        debug!(orbit_id = %self.orbit_id, command = name, "Registered command");
        self.commands.push(CommandDefinition {
            orbit_id: self.orbit_id.clone(),
            name: name.to_string(),
            about: about.to_string(),
            usage: usage.to_string(),
        });
        Ok(())
    }

    /// The collected definitions, consuming the registrar.
    #[must_use]
    pub fn into_commands(self) -> Vec<CommandDefinition> {
        self.commands
    }
}
