//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project and document | `init`, `status`, `export`, `import`, `validate` |
//! | Model | Elements and relationships | `element add`, `element list`, `rel add` |
//! | Views | Diagram definitions | `view create`, `view neighbours`, `view interaction` |
//! | Layout | Coordinates | `layout copy` |
//! | Remote | Sync | `remote add`, `remote push`, `remote pull` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default comes from `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! c4 --verbose remote push shared
//! ```
//!
//! ## Entry Point
//!
//! Parse a [`Cli`] and pass it to [`run()`].

mod app;
mod element_cmd;
mod output;
mod rel_cmd;
mod remote_cmd;
mod view_cmd;
mod workspace_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
