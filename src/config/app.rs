// src/config/app.rs
use super::defaults::*;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use crate::error::{ChainError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_buffers")]
    pub buffers: Buffers,
    #[serde(default = "default_limits")]
    pub limits: Limits,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Buffers {
    /// Chunk size used while draining a source for complete-data filters
    #[serde(default = "default_accumulate_chunk_size")]
    pub accumulate_chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    /// Upper bound on a materialized payload; `None` means unbounded
    #[serde(default)]
    pub max_payload_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffers: default_buffers(),
            limits: default_limits(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let conf: Config = toml::from_str(content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffers.accumulate_chunk_size == 0 {
            return Err(ChainError::InvalidConfig(
                "buffers.accumulate_chunk_size must be greater than zero".into(),
            ));
        }
        if self.limits.max_payload_size == Some(0) {
            return Err(ChainError::InvalidConfig(
                "limits.max_payload_size must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load config once: falls back to defaults if missing or invalid
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&config_path).exists() {
            debug!(path = %config_path, "no config file, using built-in defaults");
            return Config::default();
        }

        match Config::from_path(&config_path) {
            Ok(conf) => {
                debug!(path = %config_path, ?conf, "loaded config");
                conf
            }
            Err(err) => {
                warn!(path = %config_path, error = %err, "invalid config, using built-in defaults");
                Config::default()
            }
        }
    })
}
