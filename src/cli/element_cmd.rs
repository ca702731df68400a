//! Element CLI commands

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde_json::json;

use super::output::Output;
use crate::domain::{Element, ElementKind, ElementSpec, ItemId, Location, Model, Relationship};
use crate::storage::Project;

/// Element kinds accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Person,
    SoftwareSystem,
    Container,
    Component,
    DeploymentNode,
    ContainerInstance,
}

impl KindArg {
    fn matches(&self, kind: &ElementKind) -> bool {
        match self {
            KindArg::Person => kind.is_person(),
            KindArg::SoftwareSystem => kind.is_software_system(),
            KindArg::Container => kind.is_container(),
            KindArg::Component => kind.is_component(),
            KindArg::DeploymentNode => kind.is_deployment_node(),
            KindArg::ContainerInstance => kind.is_container_instance(),
        }
    }
}

#[derive(Subcommand)]
pub enum ElementCommands {
    /// Add an element
    ///
    /// Examples:
    ///   c4 element add person Customer --external
    ///   c4 element add container "API" --parent bank --technology Rust
    ///   c4 element add deployment-node "Web Server" --environment Live
    ///   c4 element add container-instance api --parent 12
    Add {
        /// Element kind
        kind: KindArg,

        /// Element name (for container instances: the container id)
        name: String,

        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long, short)]
        technology: Option<String>,

        /// Owning system, container or deployment node
        #[arg(long, short)]
        parent: Option<String>,

        /// Mark a person or software system as outside the enterprise
        #[arg(long)]
        external: bool,

        /// Deployment environment (top-level deployment nodes)
        #[arg(long, short)]
        environment: Option<String>,

        /// Number of instances (deployment nodes)
        #[arg(long)]
        instances: Option<u32>,

        /// Extra tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List elements
    List {
        /// Only elements of this kind
        #[arg(long)]
        kind: Option<KindArg>,
    },

    /// Show element details and relationships
    Show {
        /// Element ID
        id: String,
    },
}

pub fn run(cmd: ElementCommands, output: &Output) -> Result<()> {
    match cmd {
        ElementCommands::Add {
            kind,
            name,
            id,
            description,
            technology,
            parent,
            external,
            environment,
            instances,
            tags,
        } => {
            let mut spec = ElementSpec::new(name);
            spec.id = id;
            spec.description = description.unwrap_or_default();
            spec.technology = technology;
            spec.tags = tags;
            spec.instances = instances;
            if external {
                spec.location = Location::External;
            }
            add_element(output, kind, spec, parent.as_deref(), environment.as_deref())
        }
        ElementCommands::List { kind } => list_elements(output, kind),
        ElementCommands::Show { id } => show_element(output, &id),
    }
}

fn add_element(
    output: &Output,
    kind: KindArg,
    spec: ElementSpec,
    parent: Option<&str>,
    environment: Option<&str>,
) -> Result<()> {
    let project = Project::open_current()?;
    let mut workspace = project.load_workspace()?;
    let model = &mut workspace.model;

    let parent: Option<ItemId> = parent.map(str::parse).transpose()?;
    let require_parent = || {
        parent
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--parent is required for {:?} elements", kind))
    };

    let id = match kind {
        KindArg::Person => model.add_person(spec)?,
        KindArg::SoftwareSystem => model.add_software_system(spec)?,
        KindArg::Container => model.add_container(&require_parent()?, spec)?,
        KindArg::Component => model.add_component(&require_parent()?, spec)?,
        KindArg::DeploymentNode => match &parent {
            Some(parent) => model.add_child_deployment_node(parent, spec)?,
            None => model.add_deployment_node(environment.unwrap_or("Default"), spec)?,
        },
        KindArg::ContainerInstance => {
            let container: ItemId = spec.name.parse()?;
            model.add_container_instance(&require_parent()?, &container)?
        }
    };
    output.verbose_ctx("element", &format!("Assigned id {}", id));

    project.save_workspace(&mut workspace)?;
    let element = workspace.model.element(&id)?;

    if output.is_json() {
        output.data(&element_json(element));
    } else {
        output.success(&format!(
            "Created {}: {} - {}",
            element.kind.label(),
            element.id,
            element.name
        ));
    }

    Ok(())
}

fn list_elements(output: &Output, kind: Option<KindArg>) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;

    let elements: Vec<&Element> = workspace
        .model
        .elements()
        .filter(|e| kind.map_or(true, |k| k.matches(&e.kind)))
        .collect();

    if output.is_json() {
        let items: Vec<_> = elements.iter().map(|e| element_json(e)).collect();
        output.data(&items);
    } else if elements.is_empty() {
        println!("No elements found.");
    } else {
        output.table_header(&format!("{:<24} {:<20} {:<16} NAME", "ID", "KIND", "PARENT"), 80);

        for element in elements {
            println!(
                "{:<24} {:<20} {:<16} {}",
                element.id,
                element.kind.label(),
                element.parent.as_ref().map(ItemId::as_str).unwrap_or("-"),
                element.display_name()
            );
        }
    }

    Ok(())
}

fn show_element(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let workspace = project.load_workspace()?;
    let model = &workspace.model;

    let id: ItemId = id_str.parse()?;
    let element = model.element(&id)?;

    if output.is_json() {
        let mut value = element_json(element);
        value["outgoing"] = json!(model
            .relationships_from(&id)
            .iter()
            .map(|r| json!({"id": r.id, "destination": r.destination_id, "description": r.description}))
            .collect::<Vec<_>>());
        value["incoming"] = json!(model
            .relationships_to(&id)
            .iter()
            .map(|r| json!({"id": r.id, "source": r.source_id, "description": r.description}))
            .collect::<Vec<_>>());
        output.data(&value);
        return Ok(());
    }

    println!("Element: {}", element.id);
    println!("Kind: {}", element.kind.label());
    println!("Name: {}", element.name);
    if !element.description.is_empty() {
        println!("Description: {}", element.description);
    }
    if let Some(technology) = &element.technology {
        println!("Technology: {}", technology);
    }
    if let Some(parent) = &element.parent {
        println!("Parent: {}", parent);
    }
    if let Some(environment) = element.kind.environment() {
        println!("Environment: {}", environment);
    }
    println!("Tags: {}", element.tags);

    let children: Vec<&Element> = model.children_of(&id).collect();
    if !children.is_empty() {
        println!();
        println!("Contains:");
        for child in children {
            println!("  {} {}", child.id, child.display_name());
        }
    }

    print_relationships(model, "Uses:", model.relationships_from(&id), |r| &r.destination_id);
    print_relationships(model, "Used by:", model.relationships_to(&id), |r| &r.source_id);

    Ok(())
}

fn print_relationships<'a>(
    model: &Model,
    heading: &str,
    relationships: Vec<&'a Relationship>,
    other_end: impl Fn(&'a Relationship) -> &'a ItemId,
) {
    if relationships.is_empty() {
        return;
    }
    println!();
    println!("{}", heading);
    for relationship in relationships {
        let other = other_end(relationship);
        let name = model
            .find_element(other)
            .map(|e| e.name.as_str())
            .unwrap_or("?");
        println!("  [{}] {} ({}) {}", relationship.id, name, other, relationship.description);
    }
}

/// JSON summary of an element
pub(super) fn element_json(element: &Element) -> serde_json::Value {
    let mut value = json!({
        "id": element.id,
        "kind": element.kind.label(),
        "name": element.name,
        "description": element.description,
        "tags": element.tags,
    });
    if let Some(technology) = &element.technology {
        value["technology"] = json!(technology);
    }
    if let Some(parent) = &element.parent {
        value["parent"] = json!(parent);
    }
    if let Some(environment) = element.kind.environment() {
        value["environment"] = json!(environment);
    }
    value
}
