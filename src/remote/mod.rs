//! # Remote Sync
//!
//! Pushes the workspace document to, and pulls it from, a remote copy.
//!
//! ## Remotes
//!
//! | Type | Target | Storage |
//! |------|--------|---------|
//! | `directory` | A shared folder | `<dir>/workspace-<id>.json` |
//! | `plugin` | `c4-remote-{name}` executable | Whatever the plugin talks to |
//!
//! ## Plugin Protocol
//!
//! ```text
//! CLI                          Plugin Binary
//!  │                               │
//!  ├── Spawn: c4-remote-structurizr
//!  │                               │
//!  ├── Stdin: {"operation": "put", "params": {"workspace_id": 1, "workspace": {...}}}
//!  │                               │
//!  └── Stdout: {"success": true}
//! ```
//!
//! Every plugin must support `--manifest` to declare its capabilities.
//!
//! ## Key Types
//!
//! - [`WorkspaceRemote`] - Get/put of one workspace document
//! - [`SyncClient`] - Push with layout merge and change detection, pull
//! - [`SyncState`] - Per-remote fingerprint and timestamps

mod client;
mod directory;
mod loader;
mod plugin;
mod protocol;
mod state;

use std::path::Path;

use anyhow::Result;

use crate::storage::{RemoteConfig, RemoteKind};

pub use client::{PushOutcome, SyncClient};
pub use directory::DirectoryRemote;
pub use loader::{executable_name, PluginInfo, PluginLoader, PLUGIN_PREFIX};
pub use plugin::PluginRemote;
pub use protocol::{PluginManifest, PluginRequest, PluginResponse, OP_GET, OP_PUT, OP_TEST};
pub use state::{fingerprint, SyncState, SyncStateStore};

/// A place that keeps a copy of workspace documents by id
pub trait WorkspaceRemote {
    /// Name used in messages
    fn name(&self) -> &str;

    /// Fetches the workspace JSON, or `None` when the remote has no copy yet
    fn get_workspace(&self, workspace_id: i64) -> Result<Option<String>>;

    /// Stores the workspace JSON, replacing any existing copy
    fn put_workspace(&self, workspace_id: i64, json: &str) -> Result<()>;

    /// Checks that the remote is reachable
    fn test(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Builds the remote described by `config`
///
/// Relative directory paths resolve against `project_root`; plugins are
/// looked up in `plugins_dir` before PATH.
pub fn open_remote(
    name: &str,
    config: &RemoteConfig,
    project_root: &Path,
    plugins_dir: &Path,
) -> Result<Box<dyn WorkspaceRemote>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Remote '{}': {}", name, e))?;

    match config.kind {
        RemoteKind::Directory => {
            let path = config.path.as_deref().unwrap_or(Path::new("."));
            Ok(Box::new(DirectoryRemote::new(name, project_root.join(path))))
        }
        RemoteKind::Plugin => {
            let plugin = config.plugin.as_deref().unwrap_or_default();
            let mut loader = PluginLoader::new();
            loader.add_plugin_dir(plugins_dir);
            loader.discover()?;
            Ok(Box::new(PluginRemote::new(name, plugin, loader)?))
        }
    }
}
