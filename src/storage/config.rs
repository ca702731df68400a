//! Configuration handling for c4
//!
//! Configuration is stored in `.c4/config.toml` (project) and
//! `~/.config/c4/config.toml` (global).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Where a remote keeps its copy of the workspace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    /// A plain directory, e.g. a shared drive
    Directory,
    /// A `c4-remote-<name>` executable
    Plugin,
}

impl RemoteKind {
    pub fn as_str(&self) -> &str {
        match self {
            RemoteKind::Directory => "directory",
            RemoteKind::Plugin => "plugin",
        }
    }
}

/// A configured remote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(rename = "type")]
    pub kind: RemoteKind,

    /// Target directory (directory remotes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Plugin name without the `c4-remote-` prefix (plugin remotes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    /// Id of the workspace on the remote side
    pub workspace_id: i64,
}

impl RemoteConfig {
    pub fn directory(path: impl Into<PathBuf>, workspace_id: i64) -> Self {
        Self {
            kind: RemoteKind::Directory,
            path: Some(path.into()),
            plugin: None,
            workspace_id,
        }
    }

    pub fn plugin(name: impl Into<String>, workspace_id: i64) -> Self {
        Self {
            kind: RemoteKind::Plugin,
            path: None,
            plugin: Some(name.into()),
            workspace_id,
        }
    }

    /// Checks that the field required by the remote type is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            RemoteKind::Directory if self.path.is_none() => Err(ConfigError::Invalid(
                "directory remote requires 'path'".to_string(),
            )),
            RemoteKind::Plugin if self.plugin.as_deref().map_or(true, str::is_empty) => Err(
                ConfigError::Invalid("plugin remote requires 'plugin'".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Short human-readable target description
    pub fn target(&self) -> String {
        match self.kind {
            RemoteKind::Directory => self
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            RemoteKind::Plugin => self.plugin.clone().unwrap_or_default(),
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Workspace document name inside `.c4/`
    pub workspace_file: String,

    /// Pretty-print the workspace document
    pub pretty: bool,

    /// Merge layout from the remote copy before pushing
    pub merge_from_remote: bool,

    /// Remotes by name
    pub remotes: BTreeMap<String, RemoteConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            workspace_file: "workspace.json".to_string(),
            pretty: true,
            merge_from_remote: true,
            remotes: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Returns the named remote or an error listing the known ones
    pub fn remote(&self, name: &str) -> Result<&RemoteConfig> {
        self.remotes.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.remotes.keys().map(String::as_str).collect();
            anyhow::anyhow!(
                "Unknown remote '{}'. Configured remotes: {}",
                name,
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            )
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "workspace_file must not be empty".to_string(),
            ));
        }
        for (name, remote) in &self.remotes {
            if let Err(ConfigError::Invalid(reason) | ConfigError::Parse(reason)) = remote.validate()
            {
                return Err(ConfigError::Invalid(format!("remote '{}': {}", name, reason)));
            }
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project_root = Self::find_project_root();
        let project = match &project_root {
            Some(root) => Self::load_project_config(root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "c4").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".c4").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;
        config
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.c4/` directory upwards from the cwd
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Finds the project root by looking for a `.c4/` directory upwards from `start`
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(".c4").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a c4 project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Returns the project root, or an error if not in a project
    pub fn require_project_root(&self) -> Result<&Path> {
        self.project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a c4 project. Run 'c4 init' first."))
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self.require_project_root()?;
        let config_path = root.join(".c4").join("config.toml");

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}
