//! Runtime configuration: built-in defaults, then an optional YAML file, then environment.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::store::StateStore;
use crate::format::Locale;

pub const DEFAULT_CONFIG_PATH: &str = "commission.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATE_DIR: &str = "data/state";

pub const CONFIG_PATH_VAR: &str = "COMMISSION_CONFIG";
pub const BIND_VAR: &str = "COMMISSION_BIND";
pub const STATE_DIR_VAR: &str = "COMMISSION_STATE_DIR";
pub const PERSIST_VAR: &str = "COMMISSION_PERSIST";
pub const LOCALE_VAR: &str = "COMMISSION_LOCALE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid {var} value '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub state_dir: PathBuf,
    /// Off by default: a fresh run starts from an empty session and clears stale state.
    pub persistence_enabled: bool,
    pub locale: Locale,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            persistence_enabled: false,
            locale: Locale::En,
        }
    }
}

impl AppConfig {
    /// Reads the file named by `COMMISSION_CONFIG` (or `commission.yaml`), then applies env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|var| env::var(var).ok())?;
        Ok(config)
    }

    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_VAR) {
            self.bind_addr = bind;
        }
        if let Some(dir) = lookup(STATE_DIR_VAR) {
            self.state_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(PERSIST_VAR) {
            self.persistence_enabled = parse_flag(&raw).ok_or(ConfigError::InvalidEnv {
                var: PERSIST_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(LOCALE_VAR) {
            self.locale = Locale::parse(&raw).ok_or(ConfigError::InvalidEnv {
                var: LOCALE_VAR,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(&self.state_dir, self.persistence_enabled)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_disable_persistence() {
        let config = AppConfig::default();
        assert!(!config.persistence_enabled);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let config =
            AppConfig::from_yaml("persistence_enabled: true\nlocale: ar\n").expect("yaml should parse");
        assert!(config.persistence_enabled);
        assert_eq!(config.locale, Locale::Ar);
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("persistence_enabled: [").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::from_file(Path::new("/nonexistent/commission.yaml"))
            .expect("missing file should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn env_overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [
            (BIND_VAR, "0.0.0.0:8080"),
            (PERSIST_VAR, "yes"),
            (LOCALE_VAR, "ar-EG"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config
            .apply_overrides(|var| vars.get(var).map(|v| v.to_string()))
            .expect("overrides should apply");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.persistence_enabled);
        assert_eq!(config.locale, Locale::Ar);
    }

    #[test]
    fn invalid_persist_flag_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|var| (var == PERSIST_VAR).then(|| "maybe".to_string()))
            .expect_err("flag should be rejected");
        assert!(err.to_string().contains(PERSIST_VAR));
    }
}
