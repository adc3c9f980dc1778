// Copyright 2026 The Mogen Authors
// SPDX-License-Identifier: Apache-2.0

//! Persistent store for converted motion artifacts.
//!
//! Artifacts are written under a timestamp-derived name (`gen_%Y%m%d_%H%M%S`)
//! so lexicographic order equals creation order; `list` and `prune` both
//! lean on that. A same-second collision overwrites, which is acceptable
//! because every generation round-trip takes multiple seconds.

use crate::ClientError;
use chrono::{Local, NaiveDateTime};
use mogen_motion::{codec, MotionArtifact};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PREFIX: &str = "gen_";
const EXTENSION: &str = "npz";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Filesystem store for deployment-format NPZ artifacts.
pub struct MotionArchiveStore {
    dir: PathBuf,
}

impl MotionArchiveStore {
    /// Open (creating if needed) the store directory.
    pub fn new(dir: &Path) -> Result<Self, ClientError> {
        fs::create_dir_all(dir).map_err(|e| {
            ClientError::Archive(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of an artifact by identifier.
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{identifier}.{EXTENSION}"))
    }

    /// Encode and persist an artifact; returns its identifier.
    pub fn save(&self, artifact: &MotionArtifact) -> Result<String, ClientError> {
        let identifier = format!("{PREFIX}{}", Local::now().format(TIMESTAMP_FORMAT));
        let path = self.path_for(&identifier);
        let bytes = codec::encode(artifact)?;
        fs::write(&path, bytes)
            .map_err(|e| ClientError::Archive(format!("cannot write {}: {e}", path.display())))?;
        info!("saved artifact {}", path.display());
        Ok(identifier)
    }

    /// Identifiers of all stored artifacts, oldest first (name order equals
    /// creation order).
    pub fn list(&self) -> Result<Vec<String>, ClientError> {
        let mut identifiers = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ClientError::Archive(format!("cannot read {}: {e}", self.dir.display()))
        })?;
        for entry in entries {
            let entry = entry
                .map_err(|e| ClientError::Archive(format!("cannot read directory entry: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem.starts_with(PREFIX) {
                    identifiers.push(stem.to_string());
                }
            }
        }
        identifiers.sort();
        Ok(identifiers)
    }

    /// Delete all but the newest `keep` artifacts. Per-file failures are
    /// logged and skipped; returns the number actually removed.
    pub fn prune(&self, keep: usize) -> Result<usize, ClientError> {
        let identifiers = self.list()?;
        if identifiers.len() <= keep {
            return Ok(0);
        }
        let doomed = &identifiers[..identifiers.len() - keep];
        let mut removed = 0;
        for identifier in doomed {
            let path = self.path_for(identifier);
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("deleted old artifact {identifier}");
                    removed += 1;
                }
                Err(e) => {
                    warn!("failed to delete {}: {e}", path.display());
                }
            }
        }
        Ok(removed)
    }

    /// Parse the creation time encoded in an identifier, for display.
    pub fn timestamp_of(identifier: &str) -> Option<NaiveDateTime> {
        let ts = identifier.strip_prefix(PREFIX)?;
        NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()
    }
}
