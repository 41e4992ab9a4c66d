//! Session persistence.
//!
//! A [`SessionSnapshot`] bundles the navigation position, the generic
//! selection ledger, the active filters and the selected products. The
//! [`SnapshotStore`] keeps one snapshot as pretty-printed JSON on disk.

use crate::model::SelectedProduct;
use crate::state::{NavigationSnapshot, SelectionSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Snapshot format written by this version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version.
    #[serde(default = "current_version")]
    pub version: u32,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Navigation position.
    #[serde(default)]
    pub navigation: NavigationSnapshot,
    /// Generic selection ledger.
    #[serde(default)]
    pub selections: SelectionSnapshot,
    /// Active filters, by filter kind.
    #[serde(default)]
    pub filters: SelectionSnapshot,
    /// Directly-selected products.
    #[serde(default)]
    pub products: Vec<SelectedProduct>,
}

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Errors reading or writing snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or creating the directory failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid snapshot.
    #[error("Invalid snapshot in {path}: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot was written by a newer format.
    #[error("Unsupported snapshot version {found} (expected at most {SNAPSHOT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
    },
}

/// One JSON snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store backed by `path`. Nothing is touched until load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot to load");
                return Ok(None);
            }
            Err(source) => return Err(self.io_error(source)),
        };
        let snapshot: SessionSnapshot =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        debug!(path = %self.path.display(), saved_at = %snapshot.saved_at, "Snapshot loaded");
        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating the parent directory. The file is
    /// replaced through a temporary sibling so readers never see half of it.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(snapshot).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        info!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Delete the snapshot. A missing file is fine.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
