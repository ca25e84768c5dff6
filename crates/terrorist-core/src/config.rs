//! Configuration loading
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. User config: ~/.terrorist.toml
//! 3. Environment variables: `TERRORIST_*`
//!
//! # Example Config
//!
//! ```toml
//! [terrorist]
//! short_name_resolution = true
//! ```
//!
//! Other top-level tables are ignored, so the file can be shared with tools
//! that keep their own sections in it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, Result};

/// File name of the user config, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".terrorist.toml";

/// Overrides `terrorist.short_name_resolution`.
pub const ENV_SHORT_NAME_RESOLUTION: &str = "TERRORIST_SHORT_NAME_RESOLUTION";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub terrorist: DispatchConfig,
}

/// The `[terrorist]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Let an unqualified name match commands in any namespace.
    pub short_name_resolution: bool,
}

impl Config {
    /// Parse TOML; `origin` names the source in error messages.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConfigError::Parse {
                path: origin.to_string(),
                message: e.message().to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub const fn short_name_resolution(&self) -> bool {
        self.terrorist.short_name_resolution
    }

    #[must_use]
    pub const fn with_short_name_resolution(mut self, enabled: bool) -> Self {
        self.terrorist.short_name_resolution = enabled;
        self
    }

    fn apply_env_value(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(raw) = value {
            self.terrorist.short_name_resolution = parse_env_bool(ENV_SHORT_NAME_RESOLUTION, raw)?;
        }
        Ok(())
    }
}

fn parse_env_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }
        .into()),
    }
}

/// Path of the user config file, if a home directory can be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
}

/// Load defaults, then the user config file if it exists, then environment
/// overrides.
///
/// # Errors
///
/// Returns error if:
/// - The config file exists but cannot be read or is malformed
/// - An environment override is not a boolean
pub fn load_config() -> Result<Config> {
    let mut config = match default_config_path() {
        Some(path) => read_config_file(&path)?.unwrap_or_default(),
        None => {
            tracing::debug!("No home directory, using default config");
            Config::default()
        }
    };

    let env_value = std::env::var(ENV_SHORT_NAME_RESOLUTION).ok();
    config.apply_env_value(env_value.as_deref())?;

    Ok(config)
}

/// Load an explicit config file, then environment overrides.
///
/// # Errors
///
/// Returns error if the file is missing, unreadable or malformed, or an
/// environment override is not a boolean.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut config = read_config_file(path)?.ok_or_else(|| ConfigError::Io {
        path: path.display().to_string(),
        message: "file not found".to_string(),
    })?;

    let env_value = std::env::var(ENV_SHORT_NAME_RESOLUTION).ok();
    config.apply_env_value(env_value.as_deref())?;

    Ok(config)
}

/// `Ok(None)` when the file does not exist.
fn read_config_file(path: &Path) -> Result<Option<Config>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "loading config");
            Config::from_toml_str(&content, &path.display().to_string()).map(Some)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()),
    }
}
