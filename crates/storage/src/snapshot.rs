// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for join barriers.
//!
//! A snapshot stores every live barrier record at a point in time, so
//! pending joins survive a host restart. The file is zstd-compressed JSON.

use chrono::{DateTime, Utc};
use joinery_core::JoinState;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const COMPRESSION_LEVEL: i32 = 3;

/// Errors that can occur in snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is newer than supported ({supported})")]
    TooNew { found: u32, supported: u32 },
}

/// Barrier records at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version for migrations
    #[serde(rename = "v")]
    pub version: u32,
    /// When this snapshot was created
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub records: Vec<JoinState>,
}

#[derive(Deserialize)]
struct Header {
    v: u32,
}

impl Snapshot {
    pub fn new(records: Vec<JoinState>) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, created_at: Utc::now(), records }
    }

    /// Write the snapshot to `path`.
    ///
    /// The data goes to a temporary file first and is renamed into place,
    /// so readers never see a partial snapshot. An existing snapshot is
    /// kept as a rotating `.bak` backup.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(self)?;
        let compressed = zstd::stream::encode_all(json.as_slice(), COMPRESSION_LEVEL)?;

        let tmp = path.with_extension("tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(&compressed)?;
        file.sync_all()?;
        drop(file);

        if path.exists() {
            fs::rename(path, rotate_bak_path(path))?;
        }
        fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), records = self.records.len(), "snapshot saved");
        Ok(())
    }

    /// Read the snapshot at `path`, or `None` when there is none yet.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        if !path.exists() {
            return Ok(None);
        }
        let compressed = fs::read(path)?;
        let json = zstd::stream::decode_all(compressed.as_slice())?;

        let header: Header = serde_json::from_slice(&json)?;
        if header.v > CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::TooNew {
                found: header.v,
                supported: CURRENT_SNAPSHOT_VERSION,
            });
        }
        let snapshot: Snapshot = serde_json::from_slice(&json)?;
        tracing::debug!(
            path = %path.display(),
            records = snapshot.records.len(),
            "snapshot loaded"
        );
        Ok(Some(snapshot))
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
/// The oldest backup is removed when the limit is reached.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
