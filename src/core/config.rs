use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::aggregator::DEFAULT_DELIMITER;
use super::block::BlockRegistry;
use crate::error::{Result, SbError};
use crate::providers::ProviderSettings;

const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 2000;

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_shutdown_grace_ms() -> u64 {
    DEFAULT_SHUTDOWN_GRACE_MS
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Separator placed between fragments
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// How long shutdown waits for workers before aborting them
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
    /// Per-block enabled overrides, keyed by block name
    #[serde(default)]
    pub blocks: HashMap<String, bool>,
    #[serde(default)]
    pub providers: ProviderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
            blocks: HashMap::new(),
            providers: ProviderSettings::default(),
        }
    }
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Missing file means defaults; anything unparsable is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(e.into()),
        };

        Self::parse(&text).map_err(|source| SbError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SbError::config("Could not determine config directory"))?;

        Ok(config_dir.join("sb").join("config.toml"))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Reset `registry` to defaults and apply this config's block flags.
    pub fn apply_to(&self, registry: &mut BlockRegistry) {
        for name in registry.apply_overrides(&self.blocks) {
            log::warn!("Ignoring unknown block '{}' in config", name);
        }
    }
}

/// Where the controller reads its configuration at every start.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// The per-user config file, resolved at load time
    Default,
    File(PathBuf),
    /// Fixed configuration, never re-read
    Static(Config),
}

impl ConfigSource {
    pub fn from_arg(path: Option<&str>) -> Self {
        match path {
            Some(path) => ConfigSource::File(PathBuf::from(path)),
            None => ConfigSource::Default,
        }
    }

    pub fn load(&self) -> Result<Config> {
        match self {
            ConfigSource::Default => Config::load(),
            ConfigSource::File(path) => Config::load_from(path),
            ConfigSource::Static(config) => Ok(config.clone()),
        }
    }

    /// Human-readable origin for log lines.
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Default => Config::get_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "<no config dir>".to_string()),
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::Static(_) => "<built-in>".to_string(),
        }
    }
}
