//! The architecture model
//!
//! [`Model`] is an arena of elements and relationships keyed by [`ItemId`].
//! Elements are created through factory methods on their owner (`add_container`
//! takes the owning software system) and are never reparented or removed.
//! Relationships are append-only.

use std::collections::HashMap;
use thiserror::Error;

use super::element::{Element, ElementKind, ElementSpec};
use super::graph::{GraphError, RelationshipGraph};
use super::id::{IdError, IdRegistry, ItemId};
use super::relationship::{InteractionStyle, Relationship, RelationshipSpec};

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(ItemId),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(ItemId),

    #[error("Element {id} cannot own a {child}: expected a {expected}")]
    InvalidParent {
        id: ItemId,
        child: &'static str,
        expected: &'static str,
    },
}

impl From<GraphError> for ModelError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::ElementNotFound(id) => ModelError::ElementNotFound(id),
        }
    }
}

impl ModelError {
    /// Returns true for unresolved element or relationship ids
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ModelError::ElementNotFound(_) | ModelError::RelationshipNotFound(_)
        )
    }
}

/// Elements and relationships of one workspace
#[derive(Debug, Default, Clone)]
pub struct Model {
    /// Name of the enterprise owning the internal elements
    pub enterprise: Option<String>,

    registry: IdRegistry,

    /// Elements in creation order
    elements: Vec<Element>,
    element_index: HashMap<ItemId, usize>,

    /// Relationships in creation order
    relationships: Vec<Relationship>,
    relationship_index: HashMap<ItemId, usize>,

    graph: RelationshipGraph,
}

impl Model {
    /// Creates an empty model
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Element creation
    // =========================================================================

    /// Adds a person
    pub fn add_person(&mut self, spec: ElementSpec) -> Result<ItemId, ModelError> {
        self.create_element(ElementKind::Person, spec, None)
    }

    /// Adds a software system
    pub fn add_software_system(&mut self, spec: ElementSpec) -> Result<ItemId, ModelError> {
        self.create_element(ElementKind::SoftwareSystem, spec, None)
    }

    /// Adds a container owned by `software_system`
    pub fn add_container(
        &mut self,
        software_system: &ItemId,
        spec: ElementSpec,
    ) -> Result<ItemId, ModelError> {
        self.require_parent(software_system, "container", "software system", |k| {
            k.is_software_system()
        })?;
        self.create_element(ElementKind::Container, spec, Some(software_system.clone()))
    }

    /// Adds a component owned by `container`
    pub fn add_component(
        &mut self,
        container: &ItemId,
        spec: ElementSpec,
    ) -> Result<ItemId, ModelError> {
        self.require_parent(container, "component", "container", |k| k.is_container())?;
        self.create_element(ElementKind::Component, spec, Some(container.clone()))
    }

    /// Adds a top-level deployment node in `environment`
    pub fn add_deployment_node(
        &mut self,
        environment: &str,
        spec: ElementSpec,
    ) -> Result<ItemId, ModelError> {
        let environment = environment.trim();
        if environment.is_empty() {
            return Err(ModelError::Validation(
                "A deployment environment must be specified".to_string(),
            ));
        }
        let kind = ElementKind::DeploymentNode {
            environment: environment.to_string(),
            instances: spec.instances.unwrap_or(1).max(1),
        };
        self.create_element(kind, spec, None)
    }

    /// Adds a deployment node nested in `parent`, inheriting its environment
    pub fn add_child_deployment_node(
        &mut self,
        parent: &ItemId,
        spec: ElementSpec,
    ) -> Result<ItemId, ModelError> {
        self.require_parent(parent, "deployment node", "deployment node", |k| {
            k.is_deployment_node()
        })?;
        let environment = self.environment_of(parent)?;
        let kind = ElementKind::DeploymentNode {
            environment,
            instances: spec.instances.unwrap_or(1).max(1),
        };
        self.create_element(kind, spec, Some(parent.clone()))
    }

    /// Deploys `container` on `deployment_node`
    ///
    /// The instance number counts instances of the same container already
    /// deployed in the node's environment.
    pub fn add_container_instance(
        &mut self,
        deployment_node: &ItemId,
        container: &ItemId,
    ) -> Result<ItemId, ModelError> {
        self.require_parent(
            deployment_node,
            "container instance",
            "deployment node",
            |k| k.is_deployment_node(),
        )?;
        let deployed = self.element(container)?;
        if !deployed.kind.is_container() {
            return Err(ModelError::Validation(format!(
                "Only containers can be deployed, {} is a {}",
                container,
                deployed.kind.label()
            )));
        }
        let name = deployed.name.clone();
        let environment = self.environment_of(deployment_node)?;

        let instance_id = self
            .elements
            .iter()
            .filter(|e| match &e.kind {
                ElementKind::ContainerInstance {
                    container_id,
                    environment: env,
                    ..
                } => container_id == container && env == &environment,
                _ => false,
            })
            .count() as u32
            + 1;

        let kind = ElementKind::ContainerInstance {
            container_id: container.clone(),
            instance_id,
            environment,
        };
        self.create_element(kind, ElementSpec::new(name), Some(deployment_node.clone()))
    }

    fn environment_of(&self, id: &ItemId) -> Result<String, ModelError> {
        let element = self.element(id)?;
        element
            .kind
            .environment()
            .map(str::to_string)
            .ok_or_else(|| ModelError::Validation(format!("{} has no deployment environment", id)))
    }

    fn require_parent(
        &self,
        parent: &ItemId,
        child: &'static str,
        expected: &'static str,
        accepts: impl Fn(&ElementKind) -> bool,
    ) -> Result<(), ModelError> {
        let element = self.element(parent)?;
        if !accepts(&element.kind) {
            return Err(ModelError::InvalidParent {
                id: parent.clone(),
                child,
                expected,
            });
        }
        Ok(())
    }

    fn create_element(
        &mut self,
        kind: ElementKind,
        spec: ElementSpec,
        parent: Option<ItemId>,
    ) -> Result<ItemId, ModelError> {
        if spec.name.trim().is_empty() {
            return Err(ModelError::Validation(format!(
                "A {} must have a name",
                kind.label()
            )));
        }

        let id = self.registry.assign(spec.id.as_deref())?;
        let element = Element::from_spec(id.clone(), kind, spec, parent);
        self.push_element(element);
        Ok(id)
    }

    fn push_element(&mut self, element: Element) {
        log::trace!("registering {} {}", element.kind.label(), element.id);
        self.graph.add_element(element.id.clone());
        self.element_index
            .insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
    }

    /// Registers an already-built element, keeping its id verbatim
    ///
    /// The parent, if any, must already be present.
    pub(crate) fn insert_element(&mut self, element: Element) -> Result<(), ModelError> {
        if element.name.trim().is_empty() {
            return Err(ModelError::Validation(format!(
                "Element {} must have a name",
                element.id
            )));
        }
        if let Some(parent) = &element.parent {
            self.element(parent)?;
        }
        self.registry.assign(Some(element.id.as_str()))?;
        self.push_element(element);
        Ok(())
    }

    // =========================================================================
    // Relationship creation
    // =========================================================================

    /// `source` uses `destination`
    pub fn uses(
        &mut self,
        source: &ItemId,
        destination: &ItemId,
        description: impl Into<String>,
    ) -> Result<ItemId, ModelError> {
        self.add_relationship(RelationshipSpec::new(source, destination, description))
    }

    /// `source` delivers something to `destination` (asynchronous)
    pub fn delivers(
        &mut self,
        source: &ItemId,
        destination: &ItemId,
        description: impl Into<String>,
    ) -> Result<ItemId, ModelError> {
        self.add_relationship(
            RelationshipSpec::new(source, destination, description)
                .interaction_style(InteractionStyle::Asynchronous),
        )
    }

    /// Adds a relationship with every field specified
    pub fn add_relationship(&mut self, spec: RelationshipSpec) -> Result<ItemId, ModelError> {
        self.element(&spec.source)?;
        self.element(&spec.destination)?;

        let id = self.registry.assign(spec.id.as_deref())?;
        let relationship = Relationship::from_spec(id.clone(), spec);
        self.push_relationship(relationship)?;
        Ok(id)
    }

    fn push_relationship(&mut self, relationship: Relationship) -> Result<(), ModelError> {
        self.graph.add_relationship(
            relationship.id.clone(),
            &relationship.source_id,
            &relationship.destination_id,
        )?;
        self.relationship_index
            .insert(relationship.id.clone(), self.relationships.len());
        self.relationships.push(relationship);
        Ok(())
    }

    /// Registers an already-built relationship, resolving both endpoints
    pub(crate) fn insert_relationship(
        &mut self,
        relationship: Relationship,
    ) -> Result<(), ModelError> {
        self.element(&relationship.source_id)?;
        self.element(&relationship.destination_id)?;
        self.registry.assign(Some(relationship.id.as_str()))?;
        self.push_relationship(relationship)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the element with the given id
    pub fn element(&self, id: &ItemId) -> Result<&Element, ModelError> {
        self.find_element(id)
            .ok_or_else(|| ModelError::ElementNotFound(id.clone()))
    }

    /// Returns a mutable reference to the element with the given id
    pub fn element_mut(&mut self, id: &ItemId) -> Result<&mut Element, ModelError> {
        match self.element_index.get(id) {
            Some(&idx) => Ok(&mut self.elements[idx]),
            None => Err(ModelError::ElementNotFound(id.clone())),
        }
    }

    /// Returns the element with the given id, if present
    pub fn find_element(&self, id: &ItemId) -> Option<&Element> {
        self.element_index.get(id).map(|&idx| &self.elements[idx])
    }

    /// Returns the relationship with the given id
    pub fn relationship(&self, id: &ItemId) -> Result<&Relationship, ModelError> {
        self.find_relationship(id)
            .ok_or_else(|| ModelError::RelationshipNotFound(id.clone()))
    }

    /// Returns a mutable reference to the relationship with the given id
    pub fn relationship_mut(&mut self, id: &ItemId) -> Result<&mut Relationship, ModelError> {
        match self.relationship_index.get(id) {
            Some(&idx) => Ok(&mut self.relationships[idx]),
            None => Err(ModelError::RelationshipNotFound(id.clone())),
        }
    }

    /// Returns the relationship with the given id, if present
    pub fn find_relationship(&self, id: &ItemId) -> Option<&Relationship> {
        self.relationship_index
            .get(id)
            .map(|&idx| &self.relationships[idx])
    }

    /// Returns the first element with the given name
    pub fn find_element_by_name(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn contains_element(&self, id: &ItemId) -> bool {
        self.element_index.contains_key(id)
    }

    pub fn contains_relationship(&self, id: &ItemId) -> bool {
        self.relationship_index.contains_key(id)
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// All elements in creation order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// All relationships in creation order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn people(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.kind.is_person())
    }

    pub fn software_systems(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.kind.is_software_system())
    }

    /// Elements directly owned by `parent`
    pub fn children_of<'a>(&'a self, parent: &'a ItemId) -> impl Iterator<Item = &'a Element> {
        self.elements
            .iter()
            .filter(move |e| e.parent.as_ref() == Some(parent))
    }

    pub fn containers_of<'a>(
        &'a self,
        software_system: &'a ItemId,
    ) -> impl Iterator<Item = &'a Element> {
        self.children_of(software_system)
            .filter(|e| e.kind.is_container())
    }

    pub fn components_of<'a>(&'a self, container: &'a ItemId) -> impl Iterator<Item = &'a Element> {
        self.children_of(container).filter(|e| e.kind.is_component())
    }

    /// Top-level deployment nodes, optionally restricted to one environment
    pub fn deployment_nodes<'a>(
        &'a self,
        environment: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |e| {
            e.parent.is_none()
                && e.kind.is_deployment_node()
                && environment.map_or(true, |env| e.kind.environment() == Some(env))
        })
    }

    /// `id` followed by every element nested below it, depth first
    pub fn descendants(&self, id: &ItemId) -> Vec<ItemId> {
        let mut result = vec![id.clone()];
        let mut cursor = 0;
        while cursor < result.len() {
            let current = result[cursor].clone();
            for child in self.children_of(&current) {
                result.push(child.id.clone());
            }
            cursor += 1;
        }
        result
    }

    // =========================================================================
    // Relationship queries
    // =========================================================================

    /// Elements directly connected to `id` in either direction
    pub fn neighbours(&self, id: &ItemId) -> Vec<ItemId> {
        self.graph.neighbours(id)
    }

    /// Relationships leaving `id`, in creation order
    pub fn relationships_from(&self, id: &ItemId) -> Vec<&Relationship> {
        self.graph
            .outgoing(id)
            .iter()
            .filter_map(|rel| self.find_relationship(rel))
            .collect()
    }

    /// Relationships arriving at `id`, in creation order
    pub fn relationships_to(&self, id: &ItemId) -> Vec<&Relationship> {
        self.graph
            .incoming(id)
            .iter()
            .filter_map(|rel| self.find_relationship(rel))
            .collect()
    }

    /// Relationships from `source` to `destination`
    pub fn relationships_from_to(
        &self,
        source: &ItemId,
        destination: &ItemId,
    ) -> Vec<&Relationship> {
        self.relationships_from(source)
            .into_iter()
            .filter(|r| &r.destination_id == destination)
            .collect()
    }

    /// Relationships between `a` and `b`, either direction
    pub fn relationships_between(&self, a: &ItemId, b: &ItemId) -> Vec<&Relationship> {
        self.relationships_from(a)
            .into_iter()
            .chain(self.relationships_from(b))
            .filter(|r| r.connects(a, b))
            .collect()
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }
}
