//! Layered application configuration.
//!
//! Sources, lowest to highest precedence:
//! 1) built-in defaults
//! 2) YAML file given with `--config`
//! 3) environment variables `FARMCONF__<SECTION>__<KEY>`
//! 4) command-line overrides

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use propagator::{DiscoveryConfig, NodeConfig, PayloadConfig, PropagationConfig};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "FARMCONF__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub discovery: DiscoveryConfig,
    pub propagation: PropagationConfig,
    pub payload: PayloadConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    pub format: LogFormat,

    /// Also write logs to this file, rotated daily.
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

/// Values given on the command line that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub node_name: Option<String>,
    pub inventory: Option<PathBuf>,
    pub verbose: u8,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `FARMCONF__*` variables.
    ///
    /// # Errors
    /// Fails if `path` is given but missing, or any source does not fit the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(name) = &overrides.node_name {
            self.node.name = Some(name.clone());
        }
        if let Some(inventory) = &overrides.inventory {
            self.discovery.inventory.clone_from(inventory);
        }
        match overrides.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// # Errors
    /// Fails only if a value cannot be represented as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render configuration")
    }
}
