//! Configuration for netcli-exporter.
//!
//! Loads the device inventory and executor settings from a TOML file.

use anyhow::{Context, Result};
use netcli_core::{CommandFamily, OsType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Config file path used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/netcli/config.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no devices configured")]
    NoDevices,

    #[error("duplicate device target '{0}'")]
    DuplicateTarget(String),

    #[error("device target must not be empty")]
    EmptyTarget,

    #[error("command_template must contain a {{command}} placeholder")]
    MissingCommandPlaceholder,

    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// How commands reach the devices and how metrics are named
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Shell command run per CLI command; `{host}` and `{command}` are substituted
    #[serde(default = "default_command_template")]
    pub command_template: String,

    /// Per-command deadline enforced by the executor
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_prefix_environment")]
    pub prefix_environment: String,

    #[serde(default = "default_prefix_facts")]
    pub prefix_facts: String,
}

fn default_command_template() -> String {
    "ssh -o BatchMode=yes {host} '{command}'".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_prefix_environment() -> String {
    "cisco_environment_".to_string()
}

fn default_prefix_facts() -> String {
    "cisco_facts_".to_string()
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            command_template: default_command_template(),
            timeout_secs: default_timeout_secs(),
            prefix_environment: default_prefix_environment(),
            prefix_facts: default_prefix_facts(),
        }
    }
}

/// One polled device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Value of the `target` label
    pub target: String,

    /// Address handed to the command template; defaults to `target`
    #[serde(default)]
    pub host: Option<String>,

    pub os: OsType,

    /// Sub-collections to run; all of them when absent
    #[serde(default)]
    pub families: Option<Vec<CommandFamily>>,
}

impl DeviceConfig {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(&self.target)
    }

    pub fn families(&self) -> Vec<CommandFamily> {
        self.families
            .clone()
            .unwrap_or_else(|| CommandFamily::ALL.to_vec())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exporter: ExporterConfig,

    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl Config {
    /// Load and validate config from a specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        info!("Loaded config from {} ({} devices)", path.display(), config.devices.len());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        if !self.exporter.command_template.contains("{command}") {
            return Err(ConfigError::MissingCommandPlaceholder);
        }
        if self.exporter.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.target.trim().is_empty() {
                return Err(ConfigError::EmptyTarget);
            }
            if !seen.insert(device.target.as_str()) {
                return Err(ConfigError::DuplicateTarget(device.target.clone()));
            }
        }
        Ok(())
    }
}
