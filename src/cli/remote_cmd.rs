//! Remote sync commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use super::output::Output;
use crate::remote::{self, PluginLoader, SyncClient, SyncStateStore, WorkspaceRemote};
use crate::storage::{Project, RemoteConfig};

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// Configure a remote
    ///
    /// Examples:
    ///   c4 remote add shared --dir /mnt/architecture --workspace-id 7
    ///   c4 remote add cloud --plugin structurizr --workspace-id 70818
    Add {
        /// Remote name
        name: String,

        /// Directory holding workspace-<id>.json files
        #[arg(long, conflicts_with = "plugin", required_unless_present = "plugin")]
        dir: Option<PathBuf>,

        /// Plugin name (runs c4-remote-<name>)
        #[arg(long)]
        plugin: Option<String>,

        /// Workspace id on the remote side
        #[arg(long, default_value = "1")]
        workspace_id: i64,
    },

    /// List configured remotes
    List,

    /// Push the workspace to a remote
    Push {
        name: String,

        /// Push even if the remote already has this content
        #[arg(long)]
        force: bool,

        /// Do not copy layout from the remote copy first
        #[arg(long)]
        no_merge: bool,
    },

    /// Replace the local workspace with the remote copy
    Pull {
        name: String,
    },

    /// Show what was last exchanged with each remote
    Status,

    /// Check that a remote is reachable
    Test {
        name: String,
    },

    /// List installed c4-remote-* plugins
    Plugins,
}

pub fn run(cmd: RemoteCommands, output: &Output) -> Result<()> {
    match cmd {
        RemoteCommands::Add {
            name,
            dir,
            plugin,
            workspace_id,
        } => {
            let config = match (dir, plugin) {
                (Some(dir), _) => RemoteConfig::directory(dir, workspace_id),
                (None, Some(plugin)) => RemoteConfig::plugin(plugin, workspace_id),
                (None, None) => anyhow::bail!("Either --dir or --plugin is required"),
            };
            add_remote(output, &name, config)
        }
        RemoteCommands::List => list_remotes(output),
        RemoteCommands::Push {
            name,
            force,
            no_merge,
        } => push(output, &name, force, !no_merge),
        RemoteCommands::Pull { name } => pull(output, &name),
        RemoteCommands::Status => status(output),
        RemoteCommands::Test { name } => test_remote(output, &name),
        RemoteCommands::Plugins => list_plugins(output),
    }
}

fn add_remote(output: &Output, name: &str, config: RemoteConfig) -> Result<()> {
    let mut project = Project::open_current()?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Remote '{}': {}", name, e))?;

    let target = config.target();
    let replaced = project
        .config_mut()
        .project
        .remotes
        .insert(name.to_string(), config)
        .is_some();
    project.config().save_project()?;

    if replaced {
        output.verbose_ctx("remote", &format!("Replaced existing remote '{}'", name));
    }
    output.success(&format!("Added remote '{}' -> {}", name, target));
    Ok(())
}

fn list_remotes(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let remotes = &project.config().project.remotes;

    if output.is_json() {
        let items: Vec<_> = remotes
            .iter()
            .map(|(name, remote)| {
                json!({
                    "name": name,
                    "type": remote.kind.as_str(),
                    "target": remote.target(),
                    "workspaceId": remote.workspace_id,
                })
            })
            .collect();
        output.data(&items);
    } else if remotes.is_empty() {
        println!("No remotes configured. Add one with 'c4 remote add'.");
    } else {
        output.table_header(&format!("{:<16} {:<10} {:>12}  TARGET", "NAME", "TYPE", "WORKSPACE"), 70);
        for (name, remote) in remotes {
            println!(
                "{:<16} {:<10} {:>12}  {}",
                name,
                remote.kind.as_str(),
                remote.workspace_id,
                remote.target()
            );
        }
    }

    Ok(())
}

fn open(project: &Project, name: &str) -> Result<(Box<dyn WorkspaceRemote>, i64)> {
    let config = project.config().project.remote(name)?;
    let remote = remote::open_remote(name, config, project.root(), &project.plugins_dir())?;
    Ok((remote, config.workspace_id))
}

fn push(output: &Output, name: &str, force: bool, merge: bool) -> Result<()> {
    let project = Project::open_current()?;
    let mut workspace = project.load_workspace()?;
    let (remote, workspace_id) = open(&project, name)?;

    let merge = merge && project.config().project.merge_from_remote;
    output.verbose_ctx(
        "remote",
        &format!("Pushing workspace {} to '{}' (merge: {})", workspace_id, name, merge),
    );

    let client = SyncClient::new(
        remote.as_ref(),
        SyncStateStore::new(&project.sync_dir(), name),
        workspace_id,
    )
    .merge_from_remote(merge);
    let outcome = client.push(&mut workspace, force)?;

    // Keep the id and merged layout locally
    project.store().write(&workspace)?;

    if output.is_json() {
        output.data(&json!({
            "remote": name,
            "workspaceId": workspace_id,
            "pushed": outcome.pushed,
            "mergedViews": outcome.merged_views,
            "fingerprint": outcome.fingerprint,
        }));
    } else if outcome.pushed {
        output.success(&format!(
            "Pushed workspace {} to '{}' (layout merged for {} view(s))",
            workspace_id, name, outcome.merged_views
        ));
    } else {
        output.success(&format!("'{}' is up to date", name));
    }

    Ok(())
}

fn pull(output: &Output, name: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (remote, workspace_id) = open(&project, name)?;

    let client = SyncClient::new(
        remote.as_ref(),
        SyncStateStore::new(&project.sync_dir(), name),
        workspace_id,
    );
    let workspace = client.pull()?;
    project.store().write(&workspace)?;

    if output.is_json() {
        output.data(&json!({
            "remote": name,
            "workspaceId": workspace_id,
            "name": workspace.name,
            "elements": workspace.model.element_count(),
            "views": workspace.views.len(),
        }));
    } else {
        output.success(&format!(
            "Pulled '{}' from '{}' ({} elements, {} views)",
            workspace.name,
            name,
            workspace.model.element_count(),
            workspace.views.len()
        ));
    }

    Ok(())
}

fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let remotes = &project.config().project.remotes;

    let mut items = Vec::new();
    for (name, remote) in remotes {
        let state = SyncStateStore::new(&project.sync_dir(), name).load()?;
        items.push((name, remote, state));
    }

    if output.is_json() {
        let values: Vec<_> = items
            .iter()
            .map(|(name, remote, state)| {
                json!({
                    "name": name,
                    "workspaceId": remote.workspace_id,
                    "fingerprint": state.fingerprint,
                    "lastPushedAt": state.last_pushed_at,
                    "lastPulledAt": state.last_pulled_at,
                })
            })
            .collect();
        output.data(&values);
        return Ok(());
    }

    if items.is_empty() {
        println!("No remotes configured.");
        return Ok(());
    }

    let never = || "never".to_string();
    for (name, remote, state) in items {
        println!("{} (workspace {})", name, remote.workspace_id);
        println!(
            "  Last push: {}",
            state
                .last_pushed_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(never)
        );
        println!(
            "  Last pull: {}",
            state
                .last_pulled_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(never)
        );
        if let Some(fingerprint) = &state.fingerprint {
            println!("  Fingerprint: {}", &fingerprint[..fingerprint.len().min(12)]);
        }
    }

    Ok(())
}

fn test_remote(output: &Output, name: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (remote, _) = open(&project, name)?;

    let reachable = remote.test()?;
    if output.is_json() {
        output.data(&json!({ "remote": name, "reachable": reachable }));
    } else if reachable {
        output.success(&format!("Remote '{}' is reachable", name));
    } else {
        anyhow::bail!("Remote '{}' is not reachable", name);
    }

    Ok(())
}

fn list_plugins(output: &Output) -> Result<()> {
    let project = Project::open_current()?;

    let mut loader = PluginLoader::new();
    loader.add_plugin_dir(project.plugins_dir());
    loader.discover()?;

    let names: Vec<String> = loader.list().iter().map(|p| p.name.clone()).collect();
    let mut rows = Vec::new();
    for name in names {
        let path = loader
            .get(&name)
            .map(|p| p.path.display().to_string())
            .unwrap_or_default();
        let manifest = match loader.get_manifest(&name) {
            Ok(manifest) => manifest,
            Err(e) => {
                output.warn(&format!("{}: {:#}", name, e));
                None
            }
        };
        rows.push((name, path, manifest));
    }

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(name, path, manifest)| {
                json!({
                    "name": name,
                    "path": path,
                    "manifest": manifest,
                })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No remote plugins found on PATH or in .c4/plugins/.");
    } else {
        for (name, path, manifest) in rows {
            match manifest {
                Some(m) => println!(
                    "{} {} - {} [{}]",
                    name,
                    m.version,
                    m.description,
                    m.operations.join(", ")
                ),
                None => println!("{} ({})", name, path),
            }
        }
    }

    Ok(())
}
