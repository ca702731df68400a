//! Per-remote sync state
//!
//! Stored as `.c4/sync/<remote>.json`, which is git-ignored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exchange::WorkspaceDocument;

/// What we last exchanged with a remote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Fingerprint of the last document pushed or pulled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pushed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pulled_at: Option<DateTime<Utc>>,
}

/// Content fingerprint of a document, ignoring its modification stamp
pub fn fingerprint(doc: &WorkspaceDocument) -> Result<String> {
    let mut doc = doc.clone();
    doc.last_modified_date = None;
    let bytes = serde_json::to_vec(&doc).context("Failed to serialize workspace")?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Reads and writes one remote's state file
#[derive(Debug, Clone)]
pub struct SyncStateStore {
    path: PathBuf,
}

impl SyncStateStore {
    pub fn new(sync_dir: &Path, remote: &str) -> Self {
        Self {
            path: sync_dir.join(format!("{}.json", remote)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state; a missing file means nothing was exchanged yet
    pub fn load(&self) -> Result<SyncState> {
        if !self.path.exists() {
            return Ok(SyncState::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sync state: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sync state: {}", self.path.display()))
    }

    pub fn save(&self, state: &SyncState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(state).context("Failed to serialize sync state")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write sync state: {}", self.path.display()))
    }
}
