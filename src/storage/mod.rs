//! # Storage Layer
//!
//! Persistence for c4 projects in git-friendly formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Workspace | Exchange document (JSON) | `.c4/workspace.json` |
//! | Config | TOML | `.c4/config.toml` |
//! | Sync state | JSON per remote | `.c4/sync/{remote}.json` |
//!
//! ## Concurrency Safety
//!
//! - [`WorkspaceStore`] takes `fs2` file locks
//! - Writes are atomic (temp file + rename)
//!
//! ## Project Structure
//!
//! ```text
//! .c4/
//! ├── workspace.json        # The workspace document
//! ├── config.toml           # Project configuration and remotes
//! ├── plugins/              # Local remote plugins
//! ├── sync/                 # Sync state per remote
//! └── .gitignore            # Ignores sync state
//! ```

mod config;
mod project;
mod workspace_store;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, RemoteConfig, RemoteKind};
pub use project::{Project, ProjectError};
pub use workspace_store::WorkspaceStore;
