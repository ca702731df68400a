//! Document -> workspace
//!
//! Hydration runs in phases: elements, then relationships, then views, then
//! filtered views. References are resolved only once everything they can
//! point at has been registered. The workspace is built from scratch and
//! returned only if every phase succeeds.

use thiserror::Error;

use crate::domain::{
    Element, ElementKind, ItemId, Location, Model, ModelError, Relationship, Tag, Tags, Workspace,
};
use crate::view::{ElementView, RelationshipView, View, ViewError, ViewKind, ViewSet, ViewType};

use super::document::{
    ElementDocument, FilteredViewDocument, RelationshipDocument, ViewDocument, WorkspaceDocument,
};

#[derive(Debug, Error, PartialEq)]
pub enum HydrateError {
    #[error("Invalid model: {0}")]
    Model(ModelError),

    #[error("Invalid view: {0}")]
    View(ViewError),

    #[error("{referenced_by} references unknown element {id}")]
    ElementNotFound { id: ItemId, referenced_by: String },

    #[error("{referenced_by} references unknown relationship {id}")]
    RelationshipNotFound { id: ItemId, referenced_by: String },

    #[error("Filtered view '{key}' references unknown base view '{base}'")]
    BaseViewNotFound { key: String, base: String },

    #[error("View '{key}' is missing its {field}")]
    MissingAnchor { key: String, field: &'static str },
}

impl HydrateError {
    /// Returns true when some id or key in the document did not resolve
    pub fn is_not_found(&self) -> bool {
        match self {
            HydrateError::ElementNotFound { .. }
            | HydrateError::RelationshipNotFound { .. }
            | HydrateError::BaseViewNotFound { .. } => true,
            HydrateError::Model(err) => err.is_not_found(),
            HydrateError::View(err) => err.is_not_found(),
            HydrateError::MissingAnchor { .. } => false,
        }
    }
}

/// Attaches the referring item to unresolved ids
fn resolve(err: ModelError, referenced_by: impl FnOnce() -> String) -> HydrateError {
    match err {
        ModelError::ElementNotFound(id) => HydrateError::ElementNotFound {
            id,
            referenced_by: referenced_by(),
        },
        ModelError::RelationshipNotFound(id) => HydrateError::RelationshipNotFound {
            id,
            referenced_by: referenced_by(),
        },
        other => HydrateError::Model(other),
    }
}

/// Rebuilds a workspace from its document
pub fn hydrate(doc: WorkspaceDocument) -> Result<Workspace, HydrateError> {
    let mut model = Model::new();
    model.enterprise = doc.model.enterprise.map(|e| e.name);

    // Phase 1: elements. Relationships are collected with their owner.
    let mut pending: Vec<(ItemId, RelationshipDocument)> = Vec::new();
    for person in doc.model.people {
        hydrate_element(&mut model, &mut pending, person, ElementKind::Person, None)?;
    }
    for system in doc.model.software_systems {
        hydrate_element(
            &mut model,
            &mut pending,
            system,
            ElementKind::SoftwareSystem,
            None,
        )?;
    }
    for node in doc.model.deployment_nodes {
        hydrate_deployment_node(&mut model, &mut pending, node, None)?;
    }
    log::debug!("hydrated {} element(s)", model.element_count());

    // Phase 2: relationships
    for (owner, rel) in pending {
        hydrate_relationship(&mut model, owner, rel)?;
    }
    log::debug!("hydrated {} relationship(s)", model.relationship_count());

    // Phase 3: views anchored in the model
    let mut views = ViewSet::new();
    let typed = [
        (ViewType::SystemLandscape, doc.views.system_landscape_views),
        (ViewType::SystemContext, doc.views.system_context_views),
        (ViewType::Container, doc.views.container_views),
        (ViewType::Component, doc.views.component_views),
        (ViewType::Dynamic, doc.views.dynamic_views),
        (ViewType::Deployment, doc.views.deployment_views),
    ];
    for (view_type, docs) in typed {
        for view_doc in docs {
            let view = hydrate_view(&model, view_type, view_doc)?;
            views.insert(view).map_err(HydrateError::View)?;
        }
    }

    // Phase 4: filtered views, which only point at other views
    for filtered in doc.views.filtered_views {
        let view = hydrate_filtered_view(&views, filtered)?;
        views.insert(view).map_err(HydrateError::View)?;
    }
    views.configuration = doc.views.configuration;

    Ok(Workspace {
        id: doc.id,
        name: doc.name,
        description: doc.description,
        last_modified: doc.last_modified_date,
        model,
        views,
    })
}

fn base_element(doc: &mut ElementDocument, kind: ElementKind, parent: Option<ItemId>) -> Element {
    let mut tags = Tags::new();
    tags.add(Tag::Element);
    tags.add(kind.tag());
    for tag in &Tags::parse(&doc.tags) {
        tags.add(tag.clone());
    }

    Element {
        id: doc.id.clone(),
        kind,
        name: std::mem::take(&mut doc.name).trim().to_string(),
        description: std::mem::take(&mut doc.description),
        technology: doc.technology.take().filter(|t| !t.is_empty()),
        location: doc.location.unwrap_or(Location::Unspecified),
        tags,
        properties: std::mem::take(&mut doc.properties),
        url: doc.url.take(),
        parent,
    }
}

fn register(
    model: &mut Model,
    pending: &mut Vec<(ItemId, RelationshipDocument)>,
    doc: &mut ElementDocument,
    element: Element,
) -> Result<(), HydrateError> {
    let id = element.id.clone();
    model
        .insert_element(element)
        .map_err(|err| resolve(err, || format!("element {}", id)))?;
    for rel in doc.relationships.drain(..) {
        pending.push((id.clone(), rel));
    }
    Ok(())
}

/// Fails when a record nests children its kind cannot own
fn reject_foreign_children(doc: &ElementDocument, kind: &ElementKind) -> Result<(), HydrateError> {
    let nested = [
        ("containers", doc.containers.is_empty(), matches!(kind, ElementKind::SoftwareSystem)),
        ("components", doc.components.is_empty(), matches!(kind, ElementKind::Container)),
        ("children", doc.children.is_empty(), kind.is_deployment_node()),
        (
            "containerInstances",
            doc.container_instances.is_empty(),
            kind.is_deployment_node(),
        ),
    ];
    match nested.into_iter().find(|(_, empty, allowed)| !empty && !allowed) {
        Some((field, ..)) => Err(HydrateError::Model(ModelError::Validation(format!(
            "{} {} cannot have {}",
            kind.label(),
            doc.id,
            field
        )))),
        None => Ok(()),
    }
}

/// Registers a person, software system, container or component and its children
fn hydrate_element(
    model: &mut Model,
    pending: &mut Vec<(ItemId, RelationshipDocument)>,
    mut doc: ElementDocument,
    kind: ElementKind,
    parent: Option<ItemId>,
) -> Result<(), HydrateError> {
    reject_foreign_children(&doc, &kind)?;
    let child_kind = match kind {
        ElementKind::SoftwareSystem => Some(ElementKind::Container),
        ElementKind::Container => Some(ElementKind::Component),
        _ => None,
    };
    let children = match kind {
        ElementKind::SoftwareSystem => std::mem::take(&mut doc.containers),
        ElementKind::Container => std::mem::take(&mut doc.components),
        _ => Vec::new(),
    };

    let element = base_element(&mut doc, kind, parent);
    let id = element.id.clone();
    register(model, pending, &mut doc, element)?;

    if let Some(child_kind) = child_kind {
        for child in children {
            hydrate_element(model, pending, child, child_kind.clone(), Some(id.clone()))?;
        }
    }
    Ok(())
}

fn hydrate_deployment_node(
    model: &mut Model,
    pending: &mut Vec<(ItemId, RelationshipDocument)>,
    mut doc: ElementDocument,
    parent: Option<(ItemId, String)>,
) -> Result<(), HydrateError> {
    let environment = match (&parent, doc.environment.take()) {
        (_, Some(env)) if !env.trim().is_empty() => env,
        (Some((_, inherited)), _) => inherited.clone(),
        (None, _) => "Default".to_string(),
    };
    let kind = ElementKind::DeploymentNode {
        environment: environment.clone(),
        instances: doc.instances.unwrap_or(1).max(1),
    };
    reject_foreign_children(&doc, &kind)?;
    let children = std::mem::take(&mut doc.children);
    let instances = std::mem::take(&mut doc.container_instances);

    let element = base_element(&mut doc, kind, parent.map(|(id, _)| id));
    let id = element.id.clone();
    register(model, pending, &mut doc, element)?;

    for child in children {
        hydrate_deployment_node(model, pending, child, Some((id.clone(), environment.clone())))?;
    }
    for instance in instances {
        hydrate_container_instance(model, pending, instance, &id, &environment)?;
    }
    Ok(())
}

fn hydrate_container_instance(
    model: &mut Model,
    pending: &mut Vec<(ItemId, RelationshipDocument)>,
    mut doc: ElementDocument,
    node: &ItemId,
    environment: &str,
) -> Result<(), HydrateError> {
    let container_id = doc.container_id.take().ok_or_else(|| {
        HydrateError::Model(ModelError::Validation(format!(
            "Container instance {} has no containerId",
            doc.id
        )))
    })?;
    let container = model
        .element(&container_id)
        .map_err(|err| resolve(err, || format!("container instance {}", doc.id)))?;
    if doc.name.trim().is_empty() {
        doc.name = container.name.clone();
    }

    let kind = ElementKind::ContainerInstance {
        container_id,
        instance_id: doc.instance_id.unwrap_or(1),
        environment: doc
            .environment
            .take()
            .unwrap_or_else(|| environment.to_string()),
    };
    reject_foreign_children(&doc, &kind)?;
    let element = base_element(&mut doc, kind, Some(node.clone()));
    register(model, pending, &mut doc, element)
}

fn hydrate_relationship(
    model: &mut Model,
    owner: ItemId,
    doc: RelationshipDocument,
) -> Result<(), HydrateError> {
    let interaction_style = doc.interaction_style.unwrap_or_default();
    let mut tags = Tags::new();
    tags.add(Tag::Relationship);
    tags.add(interaction_style.tag());
    for tag in &Tags::parse(&doc.tags) {
        tags.add(tag.clone());
    }

    let relationship = Relationship {
        id: doc.id.clone(),
        source_id: doc.source_id.unwrap_or(owner),
        destination_id: doc.destination_id,
        description: doc.description,
        technology: doc.technology.filter(|t| !t.is_empty()),
        interaction_style,
        tags,
        properties: doc.properties,
        url: doc.url,
        linked_relationship_id: doc.linked_relationship_id,
    };

    let id = doc.id;
    model
        .insert_relationship(relationship)
        .map_err(|err| resolve(err, || format!("relationship {}", id)))
}

/// Resolves a view's anchor, checking the element's kind
fn anchor(
    model: &Model,
    key: &str,
    id: Option<ItemId>,
    field: &'static str,
    expected: &'static str,
    accepts: fn(&ElementKind) -> bool,
) -> Result<ItemId, HydrateError> {
    let id = id.ok_or_else(|| HydrateError::MissingAnchor {
        key: key.to_string(),
        field,
    })?;
    check_anchor(model, key, &id, expected, accepts)?;
    Ok(id)
}

fn check_anchor(
    model: &Model,
    key: &str,
    id: &ItemId,
    expected: &'static str,
    accepts: fn(&ElementKind) -> bool,
) -> Result<(), HydrateError> {
    let element = model
        .element(id)
        .map_err(|err| resolve(err, || format!("view '{}'", key)))?;
    if !accepts(&element.kind) {
        return Err(HydrateError::View(ViewError::InvalidAnchor {
            id: id.clone(),
            expected,
            actual: element.kind.label(),
        }));
    }
    Ok(())
}

fn hydrate_view(
    model: &Model,
    view_type: ViewType,
    doc: ViewDocument,
) -> Result<View, HydrateError> {
    let key = doc.key.trim().to_string();
    let kind = match view_type {
        ViewType::SystemLandscape => ViewKind::SystemLandscape {
            enterprise_boundary_visible: doc.enterprise_boundary_visible,
        },
        ViewType::SystemContext => ViewKind::SystemContext {
            software_system_id: anchor(
                model,
                &key,
                doc.software_system_id,
                "softwareSystemId",
                "software system",
                ElementKind::is_software_system,
            )?,
            enterprise_boundary_visible: doc.enterprise_boundary_visible,
        },
        ViewType::Container => ViewKind::Container {
            software_system_id: anchor(
                model,
                &key,
                doc.software_system_id,
                "softwareSystemId",
                "software system",
                ElementKind::is_software_system,
            )?,
            external_software_system_boundaries_visible: doc
                .external_software_system_boundaries_visible,
        },
        ViewType::Component => ViewKind::Component {
            container_id: anchor(
                model,
                &key,
                doc.container_id,
                "containerId",
                "container",
                ElementKind::is_container,
            )?,
            external_container_boundaries_visible: doc.external_container_boundaries_visible,
        },
        ViewType::Dynamic => {
            if let Some(id) = &doc.element_id {
                check_anchor(model, &key, id, "software system or container", |k| {
                    k.is_software_system() || k.is_container()
                })?;
            }
            ViewKind::Dynamic {
                element_id: doc.element_id,
            }
        }
        ViewType::Deployment => {
            if let Some(id) = &doc.software_system_id {
                check_anchor(
                    model,
                    &key,
                    id,
                    "software system",
                    ElementKind::is_software_system,
                )?;
            }
            ViewKind::Deployment {
                software_system_id: doc.software_system_id,
                environment: doc.environment.unwrap_or_else(|| "Default".to_string()),
            }
        }
        ViewType::Filtered => {
            return Err(HydrateError::View(ViewError::Unsupported {
                operation: "hydrate",
                view_type,
            }))
        }
    };

    let mut view = View::new(key, doc.description, kind);
    view.title = doc.title;
    view.paper_size = doc.paper_size;

    for element in doc.elements {
        if !model.contains_element(&element.id) {
            return Err(HydrateError::ElementNotFound {
                id: element.id,
                referenced_by: format!("view '{}'", view.key),
            });
        }
        view.push_element_view(ElementView {
            id: element.id,
            x: element.x,
            y: element.y,
        });
    }

    for relationship in doc.relationships {
        if !model.contains_relationship(&relationship.id) {
            return Err(HydrateError::RelationshipNotFound {
                id: relationship.id,
                referenced_by: format!("view '{}'", view.key),
            });
        }
        view.push_relationship_view(RelationshipView {
            id: relationship.id,
            description: relationship.description,
            order: relationship.order,
            vertices: relationship.vertices,
            position: relationship.position,
        });
    }

    Ok(view)
}

fn hydrate_filtered_view(
    views: &ViewSet,
    doc: FilteredViewDocument,
) -> Result<View, HydrateError> {
    let base = views
        .get_view(&doc.base_view_key)
        .ok_or_else(|| HydrateError::BaseViewNotFound {
            key: doc.key.clone(),
            base: doc.base_view_key.clone(),
        })?;

    let kind = ViewKind::Filtered {
        base_view_key: base.key.clone(),
        mode: doc.mode,
        tags: doc.tags,
    };
    let mut view = View::new(doc.key.trim().to_string(), doc.description, kind);
    view.title = doc.title;
    Ok(view)
}
