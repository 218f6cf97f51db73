use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::engine::driver::{InferenceLimits, DEFAULT_MAX_PASSES};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ChainerConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InferenceConfig {
    /// Passes allowed per inference before it fails as non-terminating.
    pub max_passes: usize,
    /// Wall-clock budget per inference in milliseconds; 0 disables it.
    pub deadline_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_chainer_dir()
            .join("rules.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            deadline_ms: 0,
        }
    }
}

impl InferenceConfig {
    pub fn limits(&self) -> InferenceLimits {
        InferenceLimits {
            max_passes: self.max_passes,
            deadline: (self.deadline_ms > 0).then(|| Duration::from_millis(self.deadline_ms)),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `~/.chainer/`
pub fn default_chainer_dir() -> PathBuf {
    home_dir().join(".chainer")
}

/// Returns the default config file path: `~/.chainer/config.toml`
pub fn default_config_path() -> PathBuf {
    default_chainer_dir().join("config.toml")
}

impl ChainerConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ChainerConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every inference fail before its first pass.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.inference.max_passes >= 1,
            "inference.max_passes must be at least 1, got {}",
            self.inference.max_passes
        );
        Ok(())
    }

    /// Apply environment variable overrides (CHAINER_DB, CHAINER_LOG_LEVEL, CHAINER_MAX_PASSES).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CHAINER_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("CHAINER_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("CHAINER_MAX_PASSES") {
            match val.parse::<usize>() {
                Ok(n) if n >= 1 => self.inference.max_passes = n,
                _ => tracing::warn!(value = %val, "ignoring invalid CHAINER_MAX_PASSES"),
            }
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}
