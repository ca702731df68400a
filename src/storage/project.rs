//! Project management
//!
//! Handles project initialization and provides access to the workspace store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, WorkspaceStore};
use crate::domain::Workspace;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a c4 project. Run 'c4 init' first.")]
    NotInProject,

    #[error("No workspace at {0}. Run 'c4 init' or 'c4 import' first.")]
    NoWorkspace(PathBuf),
}

/// A c4 project: a directory containing `.c4/`
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let c4_dir = root.join(".c4");

        if !c4_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left untouched, so running it twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let c4_dir = root.join(".c4");

        for dir in [c4_dir.clone(), c4_dir.join("plugins"), c4_dir.join("sync")] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let config_path = c4_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# c4 project configuration

# Workspace document inside .c4/
workspace_file = "workspace.json"

# Pretty-print the workspace document
pretty = true

# Copy diagram layout from the remote copy before pushing
merge_from_remote = true

# Remotes, e.g.
# [remotes.shared]
# type = "directory"
# path = "/mnt/architecture"
# workspace_id = 1
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = c4_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Ignore sync state (remote fingerprints and timestamps)
sync/

# Ignore interrupted writes
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        log::info!(root:% = root.display(); "initialized project");
        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .c4 directory path
    pub fn c4_dir(&self) -> PathBuf {
        self.root.join(".c4")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the workspace store
    pub fn store(&self) -> WorkspaceStore {
        WorkspaceStore::new(
            self.c4_dir().join(&self.config.project.workspace_file),
            self.config.project.pretty,
        )
    }

    /// Loads the workspace, failing if none has been written yet
    pub fn load_workspace(&self) -> Result<Workspace> {
        let store = self.store();
        if !store.exists() {
            return Err(ProjectError::NoWorkspace(store.path().to_path_buf()).into());
        }
        store.read()
    }

    /// Stamps and saves the workspace
    pub fn save_workspace(&self, workspace: &mut Workspace) -> Result<()> {
        workspace.touch();
        self.store().write(workspace)
    }

    /// Returns the plugins directory
    pub fn plugins_dir(&self) -> PathBuf {
        self.c4_dir().join("plugins")
    }

    /// Returns the sync directory
    pub fn sync_dir(&self) -> PathBuf {
        self.c4_dir().join("sync")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ElementSpec;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.c4_dir().is_dir());
        assert!(project.plugins_dir().is_dir());
        assert!(project.sync_dir().is_dir());
        assert!(project.c4_dir().join("config.toml").is_file());
        assert!(project.c4_dir().join(".gitignore").is_file());
    }

    #[test]
    fn default_config_file_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().project.workspace_file, "workspace.json");
        assert!(project.config().project.remotes.is_empty());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap();

        assert!(dir.path().join(".c4").is_dir());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Project::open(dir.path()).is_err());
    }

    #[test]
    fn load_without_workspace_fails() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let err = project.load_workspace().unwrap_err();
        assert!(err.to_string().contains("c4 init"));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let mut workspace = Workspace::new("Hiring", "");
        workspace
            .model
            .add_person(ElementSpec::new("Applicant").id("applicant"))
            .unwrap();
        project.save_workspace(&mut workspace).unwrap();

        let loaded = project.load_workspace().unwrap();
        assert!(loaded.last_modified.is_some());
        assert!(loaded.model.contains_element(&"applicant".parse().unwrap()));
        assert!(project.store().path().ends_with("workspace.json"));
    }
}
