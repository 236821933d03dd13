// src/infrastructure/config.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_RATE_LIMIT, DEFAULT_TARGET, DEFAULT_TIMEOUT_SECS};

/// TOML configuration for tana-cli
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub default: Defaults,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paste: PasteConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Paste,
    Api,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Defaults {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_target")]
    pub target: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Calls per second
    #[serde(default = "default_rate_limit")]
    pub rate_limit: f64,
    /// Seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PasteConfig {
    #[serde(default = "default_format_style")]
    pub format_style: String,
}

// Default value functions
fn default_target() -> String { DEFAULT_TARGET.to_string() }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_rate_limit() -> f64 { DEFAULT_RATE_LIMIT }
fn default_timeout() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_format_style() -> String { "standard".to_string() }

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            target: default_target(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: default_endpoint(),
            rate_limit: default_rate_limit(),
            timeout: default_timeout(),
        }
    }
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            format_style: default_format_style(),
        }
    }
}

impl Config {
    /// `<config_dir>/tana-cli/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not find configuration directory")?;
        Ok(dir.join("tana-cli").join("config.toml"))
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        config.check()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(?path, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Look up a dotted key such as `api.token`.
    pub fn get(&self, key: &str) -> Result<Option<toml::Value>> {
        let root = toml::Value::try_from(self).context("Failed to serialize config")?;
        Ok(key
            .split('.')
            .try_fold(&root, |value, part| value.get(part))
            .cloned())
    }

    /// Set a dotted key. The value is read as a TOML integer, float or bool when
    /// it parses as one and the key accepts it; otherwise it is stored as a string.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let candidates = [parse_scalar(value), toml::Value::String(value.to_string())];
        let mut last_error = None;
        for candidate in candidates {
            match self.with_value(key, candidate) {
                Ok(updated) => {
                    *self = updated;
                    return Ok(());
                }
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow!("Invalid value for {key}")))
    }

    fn with_value(&self, key: &str, value: toml::Value) -> Result<Self> {
        let mut root = toml::Value::try_from(self).context("Failed to serialize config")?;
        let mut parts: Vec<&str> = key.split('.').collect();
        let last = parts.pop().filter(|p| !p.is_empty()).context("Empty config key")?;

        let mut table = root.as_table_mut().context("Config root is not a table")?;
        for part in parts {
            table = table
                .entry(part)
                .or_insert(toml::Value::Table(toml::map::Map::new()))
                .as_table_mut()
                .with_context(|| format!("'{part}' in '{key}' is not a section"))?;
        }
        table.insert(last.to_string(), value);

        let updated = root
            .try_into::<Config>()
            .with_context(|| format!("Invalid value for {key}"))?;
        updated.check()?;
        Ok(updated)
    }

    fn check(&self) -> Result<()> {
        if RateLimiter::interval_for(self.api.rate_limit).is_none() {
            bail!("api.rate_limit must be a usable positive number, got {}", self.api.rate_limit);
        }
        Ok(())
    }
}

fn parse_scalar(value: &str) -> toml::Value {
    if let Ok(b) = value.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = value.parse::<f64>() {
        toml::Value::Float(f)
    } else {
        toml::Value::String(value.to_string())
    }
}
