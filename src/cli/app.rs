//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{element_cmd, rel_cmd, remote_cmd, view_cmd, workspace_cmd};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "c4")]
#[command(author, version, about = "C4 architecture models as code, synced with a remote workspace")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to C4_FORMAT, then the global config, then text)
    #[arg(long, short = 'f', global = true, env = "C4_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new c4 project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Workspace name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Start from the sample recruitment platform workspace
        #[arg(long)]
        sample: bool,
    },

    /// Show workspace overview
    Status,

    /// Manage model elements
    #[command(subcommand)]
    Element(element_cmd::ElementCommands),

    /// Manage relationships
    #[command(subcommand)]
    Rel(rel_cmd::RelCommands),

    /// Manage views
    #[command(subcommand)]
    View(view_cmd::ViewCommands),

    /// Write the workspace document
    Export {
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the workspace with a document from disk
    Import {
        file: PathBuf,

        /// Keep the current diagram layout where views match
        #[arg(long)]
        keep_layout: bool,
    },

    /// Check that a workspace document resolves
    Validate {
        /// Document to check (defaults to the project workspace)
        file: Option<PathBuf>,
    },

    /// Diagram layout operations
    #[command(subcommand)]
    Layout(workspace_cmd::LayoutCommands),

    /// Push to and pull from remotes
    #[command(subcommand)]
    Remote(remote_cmd::RemoteCommands),
}

/// Runs a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let format = match cli.format {
        Some(format) => format,
        None => default_format(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("c4 starting");

    match cli.command {
        Commands::Init {
            path,
            name,
            description,
            sample,
        } => workspace_cmd::init(&output, &path, name, description, sample)?,
        Commands::Status => workspace_cmd::status(&output)?,

        Commands::Element(cmd) => element_cmd::run(cmd, &output)?,
        Commands::Rel(cmd) => rel_cmd::run(cmd, &output)?,
        Commands::View(cmd) => view_cmd::run(cmd, &output)?,

        Commands::Export { output: target } => workspace_cmd::export(&output, target.as_deref())?,
        Commands::Import { file, keep_layout } => {
            workspace_cmd::import(&output, &file, keep_layout)?
        }
        Commands::Validate { file } => workspace_cmd::validate(&output, file.as_deref())?,
        Commands::Layout(cmd) => workspace_cmd::layout(cmd, &output)?,

        Commands::Remote(cmd) => remote_cmd::run(cmd, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

fn default_format() -> OutputFormat {
    match Config::load() {
        Ok(config) => config.global.default_format.into(),
        Err(e) => {
            log::warn!(error:% = format!("{:#}", e); "ignoring unreadable configuration");
            OutputFormat::Text
        }
    }
}
