//! On-disk workspace document
//!
//! The workspace lives in `.c4/workspace.json` as a single exchange
//! document. Reads take a shared lock; writes go to a locked temp file that
//! is atomically renamed over the original.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::Workspace;
use crate::exchange::{self, WorkspaceDocument};

/// Store for the workspace document
pub struct WorkspaceStore {
    path: PathBuf,
    pretty: bool,
}

impl WorkspaceStore {
    /// Creates a store at the given path
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    /// Returns the path to the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the document exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the raw document text
    pub fn read_raw(&self) -> Result<String> {
        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open workspace: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on workspace")?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read workspace: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(content)
    }

    /// Reads the document without resolving references
    pub fn read_document(&self) -> Result<WorkspaceDocument> {
        let content = self.read_raw()?;
        exchange::parse_document(&content)
            .with_context(|| format!("Failed to parse workspace: {}", self.path.display()))
    }

    /// Reads and hydrates the workspace
    pub fn read(&self) -> Result<Workspace> {
        let doc = self.read_document()?;
        let workspace = exchange::hydrate(doc)
            .with_context(|| format!("Failed to load workspace: {}", self.path.display()))?;
        log::debug!(
            path:% = self.path.display(),
            elements = workspace.model.element_count(),
            views = workspace.views.len();
            "loaded workspace"
        );
        Ok(workspace)
    }

    /// Serializes and writes the workspace
    pub fn write(&self, workspace: &Workspace) -> Result<()> {
        let json = exchange::to_json(workspace, self.pretty)
            .context("Failed to serialize workspace")?;
        self.write_raw(&json)
    }

    /// Writes document text (full rewrite)
    pub fn write_raw(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on workspace")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .context("Failed to write workspace")?;
            writeln!(writer).context("Failed to write workspace")?;
            writer.flush().context("Failed to flush workspace")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
