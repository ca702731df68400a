//! Workspace -> document

use crate::domain::{Element, ElementKind, Model, Relationship, Workspace};
use crate::view::{View, ViewKind, ViewType};

use super::document::{
    ElementDocument, ElementViewDocument, EnterpriseDocument, FilteredViewDocument,
    ModelDocument, RelationshipDocument, RelationshipViewDocument, ViewDocument, ViewsDocument,
    WorkspaceDocument,
};

/// Flattens a workspace into an id-referencing document
pub fn serialize(workspace: &Workspace) -> WorkspaceDocument {
    WorkspaceDocument {
        id: workspace.id,
        name: workspace.name.clone(),
        description: workspace.description.clone(),
        last_modified_date: workspace.last_modified,
        model: serialize_model(&workspace.model),
        views: serialize_views(workspace),
    }
}

fn serialize_model(model: &Model) -> ModelDocument {
    ModelDocument {
        enterprise: model
            .enterprise
            .as_ref()
            .map(|name| EnterpriseDocument { name: name.clone() }),
        people: model.people().map(|e| element_document(model, e)).collect(),
        software_systems: model
            .software_systems()
            .map(|e| element_document(model, e))
            .collect(),
        deployment_nodes: model
            .deployment_nodes(None)
            .map(|e| element_document(model, e))
            .collect(),
    }
}

/// Builds the record for `element` and, recursively, everything it contains
fn element_document(model: &Model, element: &Element) -> ElementDocument {
    let mut doc = ElementDocument::new(element.id.clone(), element.name.clone());
    doc.description = element.description.clone();
    doc.tags = element.tags.to_string();
    doc.url = element.url.clone();
    doc.properties = element.properties.clone();
    doc.technology = element.technology.clone();
    doc.relationships = model
        .relationships_from(&element.id)
        .into_iter()
        .map(relationship_document)
        .collect();

    let children = |keep: fn(&ElementKind) -> bool| -> Vec<ElementDocument> {
        model
            .children_of(&element.id)
            .filter(|child| keep(&child.kind))
            .map(|child| element_document(model, child))
            .collect()
    };

    match &element.kind {
        ElementKind::Person => {
            doc.location = Some(element.location);
        }
        ElementKind::SoftwareSystem => {
            doc.location = Some(element.location);
            doc.containers = children(ElementKind::is_container);
        }
        ElementKind::Container => {
            doc.components = children(ElementKind::is_component);
        }
        ElementKind::Component => {}
        ElementKind::DeploymentNode {
            environment,
            instances,
        } => {
            doc.environment = Some(environment.clone());
            doc.instances = Some(*instances);
            doc.children = children(ElementKind::is_deployment_node);
            doc.container_instances = children(ElementKind::is_container_instance);
        }
        ElementKind::ContainerInstance {
            container_id,
            instance_id,
            environment,
        } => {
            doc.container_id = Some(container_id.clone());
            doc.instance_id = Some(*instance_id);
            doc.environment = Some(environment.clone());
        }
    }
    doc
}

fn relationship_document(relationship: &Relationship) -> RelationshipDocument {
    RelationshipDocument {
        id: relationship.id.clone(),
        description: relationship.description.clone(),
        tags: relationship.tags.to_string(),
        source_id: Some(relationship.source_id.clone()),
        destination_id: relationship.destination_id.clone(),
        technology: relationship.technology.clone(),
        interaction_style: Some(relationship.interaction_style),
        linked_relationship_id: relationship.linked_relationship_id.clone(),
        url: relationship.url.clone(),
        properties: relationship.properties.clone(),
    }
}

fn serialize_views(workspace: &Workspace) -> ViewsDocument {
    let views = &workspace.views;
    let of = |view_type: ViewType| -> Vec<ViewDocument> {
        views.of_type(view_type).map(view_document).collect()
    };

    ViewsDocument {
        system_landscape_views: of(ViewType::SystemLandscape),
        system_context_views: of(ViewType::SystemContext),
        container_views: of(ViewType::Container),
        component_views: of(ViewType::Component),
        dynamic_views: of(ViewType::Dynamic),
        deployment_views: of(ViewType::Deployment),
        filtered_views: views
            .of_type(ViewType::Filtered)
            .filter_map(filtered_view_document)
            .collect(),
        configuration: views.configuration.clone(),
    }
}

fn view_document(view: &View) -> ViewDocument {
    let mut doc = ViewDocument {
        key: view.key.clone(),
        description: view.description.clone(),
        title: view.title.clone(),
        paper_size: view.paper_size,
        elements: view
            .elements()
            .iter()
            .map(|e| ElementViewDocument {
                id: e.id.clone(),
                x: e.x,
                y: e.y,
            })
            .collect(),
        relationships: view
            .relationships()
            .iter()
            .map(|r| RelationshipViewDocument {
                id: r.id.clone(),
                description: r.description.clone(),
                order: r.order.clone(),
                vertices: r.vertices.clone(),
                position: r.position,
            })
            .collect(),
        ..ViewDocument::default()
    };

    match &view.kind {
        ViewKind::SystemLandscape {
            enterprise_boundary_visible,
        } => {
            doc.enterprise_boundary_visible = *enterprise_boundary_visible;
        }
        ViewKind::SystemContext {
            software_system_id,
            enterprise_boundary_visible,
        } => {
            doc.software_system_id = Some(software_system_id.clone());
            doc.enterprise_boundary_visible = *enterprise_boundary_visible;
        }
        ViewKind::Container {
            software_system_id,
            external_software_system_boundaries_visible,
        } => {
            doc.software_system_id = Some(software_system_id.clone());
            doc.external_software_system_boundaries_visible =
                *external_software_system_boundaries_visible;
        }
        ViewKind::Component {
            container_id,
            external_container_boundaries_visible,
        } => {
            doc.container_id = Some(container_id.clone());
            doc.external_container_boundaries_visible = *external_container_boundaries_visible;
        }
        ViewKind::Dynamic { element_id } => {
            doc.element_id = element_id.clone();
        }
        ViewKind::Deployment {
            software_system_id,
            environment,
        } => {
            doc.software_system_id = software_system_id.clone();
            doc.environment = Some(environment.clone());
        }
        ViewKind::Filtered { .. } => {}
    }
    doc
}

fn filtered_view_document(view: &View) -> Option<FilteredViewDocument> {
    match &view.kind {
        ViewKind::Filtered {
            base_view_key,
            mode,
            tags,
        } => Some(FilteredViewDocument {
            key: view.key.clone(),
            description: view.description.clone(),
            title: view.title.clone(),
            base_view_key: base_view_key.clone(),
            mode: *mode,
            tags: tags.clone(),
        }),
        _ => None,
    }
}
