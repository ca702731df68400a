//! Project and workspace document commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;

use super::output::Output;
use crate::domain::{ElementKind, Workspace};
use crate::exchange;
use crate::sample;
use crate::storage::Project;

#[derive(Subcommand)]
pub enum LayoutCommands {
    /// Copy diagram layout from another workspace document
    Copy {
        /// Workspace JSON to take coordinates from
        file: PathBuf,
    },
}

/// Creates `.c4/` and, unless one exists, a workspace document
pub fn init(
    output: &Output,
    path: &Path,
    name: Option<String>,
    description: Option<String>,
    use_sample: bool,
) -> Result<()> {
    output.verbose_ctx("init", &format!("Initializing project at: {}", path.display()));
    let project = Project::init(path)?;
    let store = project.store();

    if store.exists() {
        if use_sample {
            anyhow::bail!(
                "A workspace already exists at {}; remove it to start from the sample",
                store.path().display()
            );
        }
        output.verbose_ctx("init", "Keeping existing workspace");
    } else {
        let mut workspace = if use_sample {
            sample::recruitment_workspace()?
        } else {
            let name = name.unwrap_or_else(|| default_name(project.root()));
            Workspace::new(name, description.unwrap_or_default())
        };
        project.save_workspace(&mut workspace)?;
        output.verbose_ctx("init", &format!("Wrote {}", store.path().display()));
    }

    output.success(&format!(
        "Initialized c4 project at {}",
        project.root().display()
    ));
    Ok(())
}

fn default_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Workspace".to_string())
}

/// Shows counts for the current workspace
pub fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;
    let model = &workspace.model;

    let count = |keep: fn(&ElementKind) -> bool| model.elements().filter(|e| keep(&e.kind)).count();
    let people = count(ElementKind::is_person);
    let systems = count(ElementKind::is_software_system);
    let containers = count(ElementKind::is_container);
    let components = count(ElementKind::is_component);
    let nodes = count(ElementKind::is_deployment_node);
    let instances = count(ElementKind::is_container_instance);
    let remotes: Vec<&String> = project.config().project.remotes.keys().collect();

    if output.is_json() {
        output.data(&json!({
            "name": workspace.name,
            "id": workspace.id,
            "lastModified": workspace.last_modified,
            "elements": {
                "people": people,
                "softwareSystems": systems,
                "containers": containers,
                "components": components,
                "deploymentNodes": nodes,
                "containerInstances": instances,
            },
            "relationships": model.relationship_count(),
            "views": workspace.views.len(),
            "remotes": remotes,
        }));
        return Ok(());
    }

    println!("Workspace: {}", workspace.name);
    if !workspace.description.is_empty() {
        println!("  {}", workspace.description);
    }
    if let Some(modified) = workspace.last_modified {
        println!("  Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!();
    println!("Model:");
    println!("  People:              {}", people);
    println!("  Software systems:    {}", systems);
    println!("  Containers:          {}", containers);
    println!("  Components:          {}", components);
    println!("  Deployment nodes:    {}", nodes);
    println!("  Container instances: {}", instances);
    println!("  Relationships:       {}", model.relationship_count());
    println!();
    println!("Views: {}", workspace.views.len());
    if !remotes.is_empty() {
        let names: Vec<&str> = remotes.iter().map(|s| s.as_str()).collect();
        println!("Remotes: {}", names.join(", "));
    }

    Ok(())
}

/// Writes the workspace document to a file or stdout
pub fn export(output: &Output, target: Option<&Path>) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;
    let json = exchange::to_json(&workspace, project.config().project.pretty)?;

    match target {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("Exported workspace to {}", path.display()));
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn read_workspace_file(path: &Path) -> Result<Workspace> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    exchange::from_json(&content).with_context(|| format!("Failed to load {}", path.display()))
}

/// Replaces the project workspace with a document from disk
pub fn import(output: &Output, path: &Path, keep_layout: bool) -> Result<()> {
    let project = Project::open_current()?;
    let mut workspace = read_workspace_file(path)?;

    if keep_layout && project.store().exists() {
        let current = project.load_workspace()?;
        let matched = workspace.copy_layout_information_from(&current);
        output.verbose_ctx("import", &format!("Kept layout of {} view(s)", matched));
    }

    project.save_workspace(&mut workspace)?;

    if output.is_json() {
        output.data(&json!({
            "imported": path.display().to_string(),
            "elements": workspace.model.element_count(),
            "relationships": workspace.model.relationship_count(),
            "views": workspace.views.len(),
        }));
    } else {
        output.success(&format!(
            "Imported {} ({} elements, {} relationships, {} views)",
            workspace.name,
            workspace.model.element_count(),
            workspace.model.relationship_count(),
            workspace.views.len()
        ));
    }

    Ok(())
}

/// Checks that a document hydrates: all references resolve
pub fn validate(output: &Output, path: Option<&Path>) -> Result<()> {
    let (source, workspace) = match path {
        Some(path) => (path.display().to_string(), read_workspace_file(path)?),
        None => {
            let project = Project::open_current()?;
            let store = project.store();
            (store.path().display().to_string(), project.load_workspace()?)
        }
    };

    if output.is_json() {
        output.data(&json!({
            "valid": true,
            "source": source,
            "elements": workspace.model.element_count(),
            "relationships": workspace.model.relationship_count(),
            "views": workspace.views.len(),
        }));
    } else {
        output.success(&format!("{} is valid", source));
    }

    Ok(())
}

pub fn layout(cmd: LayoutCommands, output: &Output) -> Result<()> {
    match cmd {
        LayoutCommands::Copy { file } => {
            let project = Project::open_current()?;
            let mut workspace = project.load_workspace()?;
            let source = read_workspace_file(&file)?;

            let matched = workspace.copy_layout_information_from(&source);
            project.save_workspace(&mut workspace)?;

            if output.is_json() {
                output.data(&json!({ "views": matched }));
            } else {
                output.success(&format!(
                    "Copied layout for {} view(s) from {}",
                    matched,
                    file.display()
                ));
            }
            Ok(())
        }
    }
}
