//! Directory remote: one JSON file per workspace id

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::WorkspaceRemote;
use crate::storage::WorkspaceStore;

/// Keeps workspace documents as `<dir>/workspace-<id>.json`
#[derive(Debug, Clone)]
pub struct DirectoryRemote {
    name: String,
    dir: PathBuf,
}

impl DirectoryRemote {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `workspace_id`
    pub fn document_path(&self, workspace_id: i64) -> PathBuf {
        self.dir.join(format!("workspace-{}.json", workspace_id))
    }

    fn store(&self, workspace_id: i64) -> WorkspaceStore {
        // Documents are written exactly as received
        WorkspaceStore::new(self.document_path(workspace_id), false)
    }
}

impl WorkspaceRemote for DirectoryRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_workspace(&self, workspace_id: i64) -> Result<Option<String>> {
        let store = self.store(workspace_id);
        if !store.exists() {
            return Ok(None);
        }
        store.read_raw().map(Some)
    }

    fn put_workspace(&self, workspace_id: i64, json: &str) -> Result<()> {
        self.store(workspace_id).write_raw(json)?;
        log::debug!(
            remote = self.name.as_str(),
            workspace_id = workspace_id;
            "stored workspace in directory"
        );
        Ok(())
    }

    fn test(&self) -> Result<bool> {
        Ok(self.dir.is_dir())
    }
}
