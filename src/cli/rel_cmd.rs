//! Relationship CLI commands

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use super::output::Output;
use crate::domain::{InteractionStyle, ItemId, Relationship, RelationshipSpec};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum RelCommands {
    /// Add a relationship
    ///
    /// Examples:
    ///   c4 rel add customer bank "Views account balances using"
    ///   c4 rel add api db "Reads from" --technology JDBC
    Add {
        /// Source element ID
        source: String,

        /// Destination element ID
        destination: String,

        /// What the source does with the destination
        #[arg(default_value = "")]
        description: String,

        #[arg(long, short)]
        technology: Option<String>,

        /// Asynchronous interaction (default: synchronous)
        #[arg(long = "async")]
        asynchronous: bool,

        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Extra tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List relationships
    List {
        /// Only relationships involving this element
        #[arg(long)]
        element: Option<String>,
    },
}

pub fn run(cmd: RelCommands, output: &Output) -> Result<()> {
    match cmd {
        RelCommands::Add {
            source,
            destination,
            description,
            technology,
            asynchronous,
            id,
            tags,
        } => {
            let source: ItemId = source.parse()?;
            let destination: ItemId = destination.parse()?;
            let mut spec = RelationshipSpec::new(&source, &destination, description);
            spec.id = id;
            spec.technology = technology;
            spec.tags = tags;
            if asynchronous {
                spec = spec.interaction_style(InteractionStyle::Asynchronous);
            }
            add_relationship(output, spec)
        }
        RelCommands::List { element } => list_relationships(output, element.as_deref()),
    }
}

fn add_relationship(output: &Output, spec: RelationshipSpec) -> Result<()> {
    let project = Project::open_current()?;
    let mut workspace = project.load_workspace()?;

    let id = workspace.model.add_relationship(spec)?;
    project.save_workspace(&mut workspace)?;

    let relationship = workspace.model.relationship(&id)?;
    if output.is_json() {
        output.data(&relationship_json(relationship));
    } else {
        output.success(&format!(
            "Created relationship {}: {} -> {}",
            relationship.id, relationship.source_id, relationship.destination_id
        ));
    }

    Ok(())
}

fn list_relationships(output: &Output, element: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;
    let model = &workspace.model;

    let element: Option<ItemId> = element.map(str::parse).transpose()?;
    if let Some(id) = &element {
        model.element(id)?;
    }

    let relationships: Vec<&Relationship> = model
        .relationships()
        .filter(|r| element.as_ref().map_or(true, |id| r.involves(id)))
        .collect();

    if output.is_json() {
        let items: Vec<_> = relationships.iter().map(|r| relationship_json(r)).collect();
        output.data(&items);
    } else if relationships.is_empty() {
        println!("No relationships found.");
    } else {
        output.table_header(&format!("{:<8} {:<40} DESCRIPTION", "ID", "SOURCE -> DESTINATION"), 80);

        for relationship in relationships {
            let endpoints = format!("{} -> {}", relationship.source_id, relationship.destination_id);
            let description = match &relationship.technology {
                Some(technology) => format!("{} [{}]", relationship.description, technology),
                None => relationship.description.clone(),
            };
            println!("{:<8} {:<40} {}", relationship.id, endpoints, description);
        }
    }

    Ok(())
}

fn relationship_json(relationship: &Relationship) -> serde_json::Value {
    json!({
        "id": relationship.id,
        "source": relationship.source_id,
        "destination": relationship.destination_id,
        "description": relationship.description,
        "technology": relationship.technology,
        "interactionStyle": relationship.interaction_style,
        "tags": relationship.tags,
    })
}
