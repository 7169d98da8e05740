//! Supervisor configuration loading.
//!
//! One TOML file with a `[shared]` table plus the `[cycle]`, `[link]` and
//! `[sampler]` tables. Every table and field is optional; missing values
//! fall back to the factory defaults.

use std::path::Path;

use drive_common::config::{ConfigError, ConfigLoader, SharedConfig};
use drive_common::supervisor::config::{CycleConfig, LinkConfig, SamplerConfig, SupervisorConfig};
use serde::Deserialize;

/// On-disk layout.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    shared: SharedConfig,
    #[serde(default)]
    cycle: CycleConfig,
    #[serde(default)]
    link: LinkConfig,
    #[serde(default)]
    sampler: SamplerConfig,
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub shared: SharedConfig,
    pub supervisor: SupervisorConfig,
}

impl LoadedConfig {
    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        file.shared.validate()?;
        let supervisor = SupervisorConfig {
            cycle: file.cycle,
            link: file.link,
            sampler: file.sampler,
        };
        supervisor
            .validate()
            .map_err(ConfigError::ValidationError)?;
        Ok(Self {
            shared: file.shared,
            supervisor,
        })
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    LoadedConfig::from_file(ConfigFile::load(path)?)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    LoadedConfig::from_file(ConfigFile::from_toml_str(content)?)
}
