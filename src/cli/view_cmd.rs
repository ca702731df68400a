//! View CLI commands

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde_json::json;

use super::output::Output;
use crate::domain::{ItemId, Model, Workspace};
use crate::storage::Project;
use crate::view::{FilterMode, PaperSize, View, ViewKind};

/// View types accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewTypeArg {
    SystemLandscape,
    SystemContext,
    Container,
    Component,
    Dynamic,
    Deployment,
    Filtered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Include,
    Exclude,
}

impl From<ModeArg> for FilterMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Include => FilterMode::Include,
            ModeArg::Exclude => FilterMode::Exclude,
        }
    }
}

#[derive(Subcommand)]
pub enum ViewCommands {
    /// Create a view
    ///
    /// Examples:
    ///   c4 view create system-landscape --key Landscape
    ///   c4 view create system-context --key Context --anchor bank
    ///   c4 view create deployment --key Live --anchor bank --environment Live
    ///   c4 view create filtered --key Internal --base Landscape --mode exclude --tag External
    Create {
        /// View type
        kind: ViewTypeArg,

        /// Unique view key
        #[arg(long, short)]
        key: String,

        #[arg(long, short, default_value = "")]
        description: String,

        /// Software system or container the view is scoped to
        #[arg(long, short)]
        anchor: Option<String>,

        /// Deployment environment (deployment views)
        #[arg(long, short)]
        environment: Option<String>,

        /// Key of the view to filter (filtered views)
        #[arg(long)]
        base: Option<String>,

        /// Filter mode (filtered views)
        #[arg(long, value_enum, default_value_t)]
        mode: ModeArg,

        /// Tag to filter on (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Paper size, e.g. A4_Landscape
        #[arg(long)]
        paper_size: Option<PaperSize>,
    },

    /// List views
    List,

    /// Show the contents of a view
    Show {
        key: String,
    },

    /// Add elements or relationships to a view
    Add {
        key: String,

        /// Element or relationship IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Remove an element or relationship from a view
    Remove {
        key: String,

        id: String,
    },

    /// Add every element the view type allows
    AddAll {
        key: String,
    },

    /// Add an element and everything directly connected to it
    Neighbours {
        key: String,

        id: String,
    },

    /// Add all containers of the view's software system
    Containers {
        key: String,
    },

    /// Add all components of the view's container
    Components {
        key: String,
    },

    /// Add the next step of a dynamic view
    Interaction {
        key: String,

        source: String,

        destination: String,

        /// Step description (defaults to the relationship's)
        #[arg(default_value = "")]
        description: String,
    },
}

pub fn run(cmd: ViewCommands, output: &Output) -> Result<()> {
    match cmd {
        ViewCommands::Create {
            kind,
            key,
            description,
            anchor,
            environment,
            base,
            mode,
            tags,
            paper_size,
        } => {
            let request = CreateRequest {
                kind,
                key,
                description,
                anchor,
                environment,
                base,
                mode: mode.into(),
                tags,
                paper_size,
            };
            create_view(output, request)
        }
        ViewCommands::List => list_views(output),
        ViewCommands::Show { key } => show_view(output, &key),
        ViewCommands::Add { key, ids } => update_view(output, &key, |view, model| {
            for id in &ids {
                view.add(model, &id.parse::<ItemId>()?)?;
            }
            Ok(())
        }),
        ViewCommands::Remove { key, id } => update_view(output, &key, |view, model| {
            let id: ItemId = id.parse()?;
            if !view.remove(model, &id) {
                anyhow::bail!("{} is not in view '{}'", id, view.key);
            }
            Ok(())
        }),
        ViewCommands::AddAll { key } => {
            update_view(output, &key, |view, model| Ok(view.add_all_elements(model)?))
        }
        ViewCommands::Neighbours { key, id } => update_view(output, &key, |view, model| {
            Ok(view.add_nearest_neighbours(model, &id.parse::<ItemId>()?)?)
        }),
        ViewCommands::Containers { key } => {
            update_view(output, &key, |view, model| Ok(view.add_all_containers(model)?))
        }
        ViewCommands::Components { key } => {
            update_view(output, &key, |view, model| Ok(view.add_all_components(model)?))
        }
        ViewCommands::Interaction {
            key,
            source,
            destination,
            description,
        } => update_view(output, &key, |view, model| {
            let source: ItemId = source.parse()?;
            let destination: ItemId = destination.parse()?;
            let relationship = view.add_interaction(model, &source, &destination, &description)?;
            output.verbose_ctx("view", &format!("Bound relationship {}", relationship));
            Ok(())
        }),
    }
}

struct CreateRequest {
    kind: ViewTypeArg,
    key: String,
    description: String,
    anchor: Option<String>,
    environment: Option<String>,
    base: Option<String>,
    mode: FilterMode,
    tags: Vec<String>,
    paper_size: Option<PaperSize>,
}

fn create_view(output: &Output, request: CreateRequest) -> Result<()> {
    let project = Project::open_current()?;
    let mut workspace = project.load_workspace()?;
    let Workspace { model, views, .. } = &mut workspace;

    let anchor: Option<ItemId> = request.anchor.as_deref().map(str::parse).transpose()?;
    let require_anchor = || {
        anchor
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--anchor is required for {:?} views", request.kind))
    };
    let key = request.key.as_str();
    let description = request.description.as_str();

    let view = match request.kind {
        ViewTypeArg::SystemLandscape => views.create_system_landscape_view(key, description)?,
        ViewTypeArg::SystemContext => {
            views.create_system_context_view(model, &require_anchor()?, key, description)?
        }
        ViewTypeArg::Container => {
            views.create_container_view(model, &require_anchor()?, key, description)?
        }
        ViewTypeArg::Component => {
            views.create_component_view(model, &require_anchor()?, key, description)?
        }
        ViewTypeArg::Dynamic => {
            views.create_dynamic_view(model, anchor.as_ref(), key, description)?
        }
        ViewTypeArg::Deployment => views.create_deployment_view(
            model,
            anchor.as_ref(),
            request.environment.as_deref().unwrap_or_default(),
            key,
            description,
        )?,
        ViewTypeArg::Filtered => {
            let base = request
                .base
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--base is required for filtered views"))?;
            views.create_filtered_view(base, key, description, request.mode, request.tags.clone())?
        }
    };
    if request.paper_size.is_some() {
        view.paper_size = request.paper_size;
    }
    let (view_key, view_type) = (view.key.clone(), view.view_type());

    project.save_workspace(&mut workspace)?;

    if output.is_json() {
        output.data(&json!({ "key": view_key, "type": view_type.label() }));
    } else {
        output.success(&format!("Created {} view: {}", view_type, view_key));
    }

    Ok(())
}

/// Loads the workspace, applies `change` to one view and saves
fn update_view<F>(output: &Output, key: &str, change: F) -> Result<()>
where
    F: FnOnce(&mut View, &Model) -> Result<()>,
{
    let project = Project::open_current()?;
    let mut workspace = project.load_workspace()?;

    let view = workspace.views.view_mut(key)?;
    let before = (view.elements().len(), view.relationships().len());
    change(&mut *view, &workspace.model)?;
    let after = (view.elements().len(), view.relationships().len());

    project.save_workspace(&mut workspace)?;

    if output.is_json() {
        output.data(&json!({
            "key": key,
            "elements": after.0,
            "relationships": after.1,
            "added_elements": after.0.saturating_sub(before.0),
            "added_relationships": after.1.saturating_sub(before.1),
        }));
    } else {
        output.success(&format!(
            "View '{}': {} element(s), {} relationship(s)",
            key, after.0, after.1
        ));
    }

    Ok(())
}

fn list_views(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;
    let views = &workspace.views;

    if output.is_json() {
        let items: Vec<_> = views.iter().map(view_summary_json).collect();
        output.data(&items);
    } else if views.is_empty() {
        println!("No views found.");
    } else {
        output.table_header(
            &format!("{:<28} {:<18} {:>8} {:>6}  DESCRIPTION", "KEY", "TYPE", "ELEMENTS", "RELS"),
            90,
        );

        for view in views {
            println!(
                "{:<28} {:<18} {:>8} {:>6}  {}",
                view.key,
                view.view_type().label(),
                view.elements().len(),
                view.relationships().len(),
                view.description
            );
        }
    }

    Ok(())
}

fn show_view(output: &Output, key: &str) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;
    let model = &workspace.model;
    let view = workspace.views.view(key)?;

    if output.is_json() {
        let mut value = view_summary_json(view);
        value["elements"] = json!(view
            .elements()
            .iter()
            .map(|e| json!({"id": e.id, "x": e.x, "y": e.y}))
            .collect::<Vec<_>>());
        value["relationships"] = json!(view
            .relationships()
            .iter()
            .map(|r| json!({"id": r.id, "order": r.order, "description": r.description}))
            .collect::<Vec<_>>());
        output.data(&value);
        return Ok(());
    }

    println!("View: {}", view.key);
    println!("Type: {}", view.view_type());
    if !view.description.is_empty() {
        println!("Description: {}", view.description);
    }
    if let Some(anchor) = view.kind.anchor() {
        println!("Scope: {} ({})", element_name(model, anchor), anchor);
    }
    match &view.kind {
        ViewKind::Deployment { environment, .. } => println!("Environment: {}", environment),
        ViewKind::Filtered {
            base_view_key,
            mode,
            tags,
        } => {
            println!("Base view: {}", base_view_key);
            println!("Filter: {:?} {}", mode, tags.join(", "));
        }
        _ => {}
    }
    if let Some(paper_size) = view.paper_size {
        println!("Paper size: {}", paper_size);
    }

    if !view.elements().is_empty() {
        println!();
        println!("Elements:");
        for element in view.elements() {
            let position = match (element.x, element.y) {
                (Some(x), Some(y)) => format!(" @ {},{}", x, y),
                _ => String::new(),
            };
            println!("  {} {}{}", element.id, element_name(model, &element.id), position);
        }
    }

    if !view.relationships().is_empty() {
        println!();
        println!("Relationships:");
        for relationship_view in view.relationships() {
            let Some(relationship) = model.find_relationship(&relationship_view.id) else {
                continue;
            };
            let description = relationship_view
                .description
                .as_deref()
                .unwrap_or(&relationship.description);
            let order = relationship_view
                .order
                .as_deref()
                .map(|o| format!("{}. ", o))
                .unwrap_or_default();
            println!(
                "  {}{} -> {}: {}",
                order,
                element_name(model, &relationship.source_id),
                element_name(model, &relationship.destination_id),
                description
            );
        }
    }

    Ok(())
}

fn element_name<'a>(model: &'a Model, id: &ItemId) -> &'a str {
    model.find_element(id).map(|e| e.name.as_str()).unwrap_or("?")
}

fn view_summary_json(view: &View) -> serde_json::Value {
    json!({
        "key": view.key,
        "type": view.view_type().label(),
        "description": view.description,
        "anchor": view.kind.anchor(),
        "paperSize": view.paper_size,
        "elements": view.elements().len(),
        "relationships": view.relationships().len(),
    })
}
