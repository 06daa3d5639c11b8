//! Session cache on disk: one JSON file per key in a state directory.
//!
//! With persistence disabled, loading wipes whatever an earlier run left behind and
//! hands back a fresh session; saving does nothing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::roster::EmployeeRow;
use crate::session::{Session, DEFAULT_OUTLET_TARGET};

pub const ROWS_KEY: &str = "tcc_rows_v2";
pub const META_KEY: &str = "tcc_meta_v2";
/// Keys written by earlier releases. Only ever removed.
pub const LEGACY_KEYS: [&str; 2] = ["tcc_rows_v1", "tcc_meta_v1"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state store io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Metadata record stored beside the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    #[serde(default = "default_outlet_target")]
    pub outlet_target: f64,
    #[serde(default)]
    pub outlet_ach_percent: f64,
    #[serde(default)]
    pub suggest_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

fn default_outlet_target() -> f64 {
    DEFAULT_OUTLET_TARGET
}

impl SessionMeta {
    pub fn from_session(session: &Session) -> Self {
        Self {
            outlet_target: session.outlet_target,
            outlet_ach_percent: session.outlet_achievement_percent,
            suggest_count: session.suggest_count,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
    persistence_enabled: bool,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>, persistence_enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            persistence_enabled,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn persistence_enabled(&self) -> bool {
        self.persistence_enabled
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Restores the last saved session. Missing or unreadable records fall back to defaults.
    pub fn load(&self) -> Result<Session, StoreError> {
        if !self.persistence_enabled {
            let removed = self.clear()?;
            if removed > 0 {
                info!(removed, dir = %self.dir.display(), "persistence disabled, cleared stored state");
            }
            return Ok(Session::default());
        }

        let rows: Vec<EmployeeRow> = self.read_record(ROWS_KEY)?.unwrap_or_default();
        let meta: Option<SessionMeta> = self.read_record(META_KEY)?;
        let session = match meta {
            Some(meta) => Session {
                outlet_target: meta.outlet_target,
                outlet_achievement_percent: meta.outlet_ach_percent,
                suggest_count: meta.suggest_count,
                rows,
            },
            None => Session {
                rows,
                ..Session::default()
            },
        };
        debug!(rows = session.rows.len(), "restored session");
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        if !self.persistence_enabled {
            debug!("persistence disabled, skipping save");
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.display().to_string(),
            source,
        })?;
        self.write_record(ROWS_KEY, &session.rows)?;
        self.write_record(META_KEY, &SessionMeta::from_session(session))?;
        debug!(rows = session.rows.len(), dir = %self.dir.display(), "saved session");
        Ok(())
    }

    /// Removes every known record, current and legacy. Returns how many files were deleted.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for key in [ROWS_KEY, META_KEY].into_iter().chain(LEGACY_KEYS) {
            let path = self.key_path(key);
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(StoreError::Io {
                        path: path.display().to_string(),
                        source,
                    })
                }
            }
        }
        Ok(removed)
    }

    fn read_record<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.key_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring corrupt state record");
                Ok(None)
            }
        }
    }

    fn write_record<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(&path, raw).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
