//! A single diagram definition
//!
//! A [`View`] references elements and relationships of a [`Model`] by id and
//! carries optional layout (coordinates, vertices). Population methods take
//! the model explicitly so views never hold references into it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::paper_size::PaperSize;
use super::ViewError;
use crate::domain::{ElementKind, ItemId, Model, ModelError};

/// The diagram type of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    SystemLandscape,
    SystemContext,
    Container,
    Component,
    Dynamic,
    Deployment,
    Filtered,
}

impl ViewType {
    pub fn label(&self) -> &'static str {
        match self {
            ViewType::SystemLandscape => "system-landscape",
            ViewType::SystemContext => "system-context",
            ViewType::Container => "container",
            ViewType::Component => "component",
            ViewType::Dynamic => "dynamic",
            ViewType::Deployment => "deployment",
            ViewType::Filtered => "filtered",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a filtered view keeps or drops the tagged items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

/// Type-specific data of a view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
    SystemLandscape {
        enterprise_boundary_visible: bool,
    },
    SystemContext {
        software_system_id: ItemId,
        enterprise_boundary_visible: bool,
    },
    Container {
        software_system_id: ItemId,
        external_software_system_boundaries_visible: bool,
    },
    Component {
        container_id: ItemId,
        external_container_boundaries_visible: bool,
    },
    Dynamic {
        /// Software system or container the interactions happen in
        element_id: Option<ItemId>,
    },
    Deployment {
        software_system_id: Option<ItemId>,
        environment: String,
    },
    /// Tag filter over another view; holds no element references
    Filtered {
        base_view_key: String,
        mode: FilterMode,
        tags: Vec<String>,
    },
}

impl ViewKind {
    pub fn view_type(&self) -> ViewType {
        match self {
            ViewKind::SystemLandscape { .. } => ViewType::SystemLandscape,
            ViewKind::SystemContext { .. } => ViewType::SystemContext,
            ViewKind::Container { .. } => ViewType::Container,
            ViewKind::Component { .. } => ViewType::Component,
            ViewKind::Dynamic { .. } => ViewType::Dynamic,
            ViewKind::Deployment { .. } => ViewType::Deployment,
            ViewKind::Filtered { .. } => ViewType::Filtered,
        }
    }

    /// Returns the element the view is scoped to, if any
    pub fn anchor(&self) -> Option<&ItemId> {
        match self {
            ViewKind::SystemContext { software_system_id, .. }
            | ViewKind::Container { software_system_id, .. } => Some(software_system_id),
            ViewKind::Component { container_id, .. } => Some(container_id),
            ViewKind::Dynamic { element_id } => element_id.as_ref(),
            ViewKind::Deployment { software_system_id, .. } => software_system_id.as_ref(),
            ViewKind::SystemLandscape { .. } | ViewKind::Filtered { .. } => None,
        }
    }
}

/// A bend point on a relationship line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

/// An element placed on a view
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
    pub id: ItemId,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl ElementView {
    pub fn new(id: ItemId) -> Self {
        Self { id, x: None, y: None }
    }
}

/// A relationship placed on a view
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipView {
    pub id: ItemId,

    /// Overrides the relationship's own description (dynamic views)
    pub description: Option<String>,

    /// Position in the interaction sequence (dynamic views)
    pub order: Option<String>,

    pub vertices: Vec<Vertex>,

    /// Label position along the line, as a percentage
    pub position: Option<u8>,
}

impl RelationshipView {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            description: None,
            order: None,
            vertices: Vec::new(),
            position: None,
        }
    }
}

/// A keyed diagram definition
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub key: String,
    pub description: String,
    pub title: Option<String>,
    pub paper_size: Option<PaperSize>,
    pub kind: ViewKind,
    elements: Vec<ElementView>,
    relationships: Vec<RelationshipView>,
}

impl View {
    pub(crate) fn new(key: String, description: String, kind: ViewKind) -> Self {
        Self {
            key,
            description,
            title: None,
            paper_size: None,
            kind,
            elements: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn view_type(&self) -> ViewType {
        self.kind.view_type()
    }

    /// Element views in the order they were added
    pub fn elements(&self) -> &[ElementView] {
        &self.elements
    }

    /// Relationship views in the order they were added
    pub fn relationships(&self) -> &[RelationshipView] {
        &self.relationships
    }

    pub fn contains_element(&self, id: &ItemId) -> bool {
        self.elements.iter().any(|e| &e.id == id)
    }

    pub fn contains_relationship(&self, id: &ItemId) -> bool {
        self.relationships.iter().any(|r| &r.id == id)
    }

    pub fn element_view(&self, id: &ItemId) -> Option<&ElementView> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn element_view_mut(&mut self, id: &ItemId) -> Option<&mut ElementView> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    /// First view of the relationship (dynamic views may hold several)
    pub fn relationship_view_mut(&mut self, id: &ItemId) -> Option<&mut RelationshipView> {
        self.relationships.iter_mut().find(|r| &r.id == id)
    }

    pub(crate) fn push_element_view(&mut self, view: ElementView) {
        self.elements.push(view);
    }

    pub(crate) fn push_relationship_view(&mut self, view: RelationshipView) {
        self.relationships.push(view);
    }

    fn unsupported(&self, operation: &'static str) -> ViewError {
        ViewError::Unsupported {
            operation,
            view_type: self.view_type(),
        }
    }

    // =========================================================================
    // Population
    // =========================================================================

    /// Adds an element or a relationship by id
    ///
    /// Adding an element also adds every relationship between it and the
    /// elements already present (except on dynamic views). Adding a
    /// relationship also adds its endpoints. On deployment views, adding a
    /// deployment node adds everything nested in it.
    pub fn add(&mut self, model: &Model, id: &ItemId) -> Result<(), ViewError> {
        if matches!(self.kind, ViewKind::Filtered { .. }) {
            return Err(self.unsupported("add"));
        }

        if let Some(element) = model.find_element(id) {
            let is_node = element.kind.is_deployment_node();
            match self.kind {
                ViewKind::Deployment { .. } if is_node => {
                    return self.add_deployment_node(model, id);
                }
                ViewKind::Dynamic { .. } => self.add_element(model, id, false),
                _ => self.add_element(model, id, true),
            }
            return Ok(());
        }

        if let Some(relationship) = model.find_relationship(id) {
            let order = match self.kind {
                ViewKind::Dynamic { .. } => Some(self.next_order()?),
                _ => None,
            };
            self.add_element(model, &relationship.source_id, false);
            self.add_element(model, &relationship.destination_id, false);
            if let Some(order) = order {
                let mut view = RelationshipView::new(relationship.id.clone());
                view.order = Some(order.to_string());
                self.relationships.push(view);
            } else if !self.contains_relationship(id) {
                self.relationships.push(RelationshipView::new(id.clone()));
            }
            return Ok(());
        }

        Err(ModelError::ElementNotFound(id.clone()).into())
    }

    /// Adds the element, and optionally its relationships to elements already on the view
    fn add_element(&mut self, model: &Model, id: &ItemId, with_relationships: bool) {
        if !self.contains_element(id) {
            self.elements.push(ElementView::new(id.clone()));
        }
        if !with_relationships {
            return;
        }

        for relationship in model.relationships().filter(|r| r.involves(id)) {
            let other = if &relationship.source_id == id {
                &relationship.destination_id
            } else {
                &relationship.source_id
            };
            if self.contains_element(other) && !self.contains_relationship(&relationship.id) {
                self.relationships
                    .push(RelationshipView::new(relationship.id.clone()));
            }
        }
    }

    fn add_elements<'a>(&mut self, model: &Model, ids: impl IntoIterator<Item = &'a ItemId>) {
        for id in ids {
            self.add_element(model, id, true);
        }
    }

    /// Adds every element in scope for this view type
    pub fn add_all_elements(&mut self, model: &Model) -> Result<(), ViewError> {
        match &self.kind {
            ViewKind::SystemLandscape { .. } | ViewKind::SystemContext { .. } => {
                self.add_all_people(model)?;
                self.add_all_software_systems(model)
            }
            ViewKind::Container { .. } => {
                self.add_all_people(model)?;
                self.add_all_software_systems(model)?;
                self.add_all_containers(model)
            }
            ViewKind::Component { .. } => {
                self.add_all_people(model)?;
                self.add_all_software_systems(model)?;
                self.add_all_containers(model)?;
                self.add_all_components(model)
            }
            ViewKind::Deployment { environment, .. } => {
                let nodes: Vec<ItemId> = model
                    .deployment_nodes(Some(environment))
                    .map(|e| e.id.clone())
                    .collect();
                for node in &nodes {
                    self.add_deployment_node(model, node)?;
                }
                Ok(())
            }
            ViewKind::Dynamic { .. } | ViewKind::Filtered { .. } => {
                Err(self.unsupported("add_all_elements"))
            }
        }
    }

    /// Adds every person in the model
    pub fn add_all_people(&mut self, model: &Model) -> Result<(), ViewError> {
        self.require_static("add_all_people")?;
        self.add_elements(model, model.people().map(|e| &e.id));
        Ok(())
    }

    /// Adds every software system, except the one a container or component view is scoped to
    pub fn add_all_software_systems(&mut self, model: &Model) -> Result<(), ViewError> {
        self.require_static("add_all_software_systems")?;
        let scope = self.scoped_software_system(model)?;
        self.add_elements(
            model,
            model
                .software_systems()
                .map(|e| &e.id)
                .filter(|id| Some(*id) != scope.as_ref()),
        );
        Ok(())
    }

    /// Adds the anchor element plus every element one relationship away
    pub fn add_nearest_neighbours(&mut self, model: &Model, id: &ItemId) -> Result<(), ViewError> {
        if matches!(
            self.kind,
            ViewKind::Dynamic { .. } | ViewKind::Filtered { .. }
        ) {
            return Err(self.unsupported("add_nearest_neighbours"));
        }
        model.element(id)?;

        self.add_element(model, id, true);
        let neighbours = model.neighbours(id);
        self.add_elements(model, &neighbours);
        Ok(())
    }

    /// Adds containers: those of the scoped system (container views) or the
    /// siblings of the scoped container (component views)
    pub fn add_all_containers(&mut self, model: &Model) -> Result<(), ViewError> {
        let (system, skip) = match &self.kind {
            ViewKind::Container {
                software_system_id, ..
            } => (software_system_id.clone(), None),
            ViewKind::Component { container_id, .. } => {
                let parent = model.element(container_id)?.parent.clone();
                match parent {
                    Some(system) => (system, Some(container_id.clone())),
                    None => return Ok(()),
                }
            }
            _ => return Err(self.unsupported("add_all_containers")),
        };

        self.add_elements(
            model,
            model
                .containers_of(&system)
                .map(|e| &e.id)
                .filter(|id| Some(*id) != skip.as_ref()),
        );
        Ok(())
    }

    /// Adds every component of the scoped container (component views only)
    pub fn add_all_components(&mut self, model: &Model) -> Result<(), ViewError> {
        let container = match &self.kind {
            ViewKind::Component { container_id, .. } => container_id.clone(),
            _ => return Err(self.unsupported("add_all_components")),
        };
        self.add_elements(model, model.components_of(&container).map(|e| &e.id));
        Ok(())
    }

    /// Appends an interaction step to a dynamic view
    ///
    /// Binds an existing relationship between `source` and `destination`
    /// (preferring that direction) and numbers it after the previous step.
    /// Returns the bound relationship id.
    pub fn add_interaction(
        &mut self,
        model: &Model,
        source: &ItemId,
        destination: &ItemId,
        description: &str,
    ) -> Result<ItemId, ViewError> {
        if !matches!(self.kind, ViewKind::Dynamic { .. }) {
            return Err(self.unsupported("add_interaction"));
        }
        model.element(source)?;
        model.element(destination)?;

        let relationship = model
            .relationships_from_to(source, destination)
            .into_iter()
            .next()
            .or_else(|| {
                model
                    .relationships_from_to(destination, source)
                    .into_iter()
                    .next()
            })
            .ok_or_else(|| ViewError::NoRelationship(source.clone(), destination.clone()))?;
        let order = self.next_order()?;

        self.add_element(model, source, false);
        self.add_element(model, destination, false);

        let mut view = RelationshipView::new(relationship.id.clone());
        view.order = Some(order.to_string());
        if !description.trim().is_empty() {
            view.description = Some(description.to_string());
        }
        self.relationships.push(view);
        Ok(relationship.id.clone())
    }

    fn next_order(&self) -> Result<u64, ViewError> {
        let last = self
            .relationships
            .iter()
            .filter_map(|r| r.order.as_deref()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        last.checked_add(1).ok_or_else(|| {
            ModelError::Validation(format!(
                "View '{}' has no interaction order after {}",
                self.key, last
            ))
            .into()
        })
    }

    /// Adds a deployment node with everything nested in it (deployment views only)
    ///
    /// When the view is scoped to a software system, container instances of
    /// other systems are left out.
    pub fn add_deployment_node(&mut self, model: &Model, id: &ItemId) -> Result<(), ViewError> {
        let (system, environment) = match &self.kind {
            ViewKind::Deployment {
                software_system_id,
                environment,
            } => (software_system_id.clone(), environment.clone()),
            _ => return Err(self.unsupported("add_deployment_node")),
        };

        let node = model.element(id)?;
        if !node.kind.is_deployment_node() {
            return Err(ViewError::InvalidAnchor {
                id: id.clone(),
                expected: "deployment node",
                actual: node.kind.label(),
            });
        }
        if node.kind.environment() != Some(environment.as_str()) {
            return Err(ModelError::Validation(format!(
                "Deployment node {} is not in environment '{}'",
                id, environment
            ))
            .into());
        }

        for nested in model.descendants(id) {
            let element = model.element(&nested)?;
            if let (Some(system), ElementKind::ContainerInstance { container_id, .. }) =
                (&system, &element.kind)
            {
                let container_parent = model.element(container_id)?.parent.as_ref();
                if container_parent != Some(system) {
                    continue;
                }
            }
            self.add_element(model, &nested, true);
        }
        Ok(())
    }

    fn require_static(&self, operation: &'static str) -> Result<(), ViewError> {
        match self.kind {
            ViewKind::SystemLandscape { .. }
            | ViewKind::SystemContext { .. }
            | ViewKind::Container { .. }
            | ViewKind::Component { .. } => Ok(()),
            _ => Err(self.unsupported(operation)),
        }
    }

    /// The software system a container or component view is drawn inside
    fn scoped_software_system(&self, model: &Model) -> Result<Option<ItemId>, ViewError> {
        Ok(match &self.kind {
            ViewKind::Container {
                software_system_id, ..
            } => Some(software_system_id.clone()),
            ViewKind::Component { container_id, .. } => model.element(container_id)?.parent.clone(),
            _ => None,
        })
    }

    /// Removes an element (with its relationships) or a relationship
    ///
    /// Returns true if anything was removed.
    pub fn remove(&mut self, model: &Model, id: &ItemId) -> bool {
        let before = (self.elements.len(), self.relationships.len());

        if self.contains_element(id) {
            self.elements.retain(|e| &e.id != id);
            self.relationships.retain(|r| {
                model
                    .find_relationship(&r.id)
                    .map_or(true, |rel| !rel.involves(id))
            });
        } else {
            self.relationships.retain(|r| &r.id != id);
        }

        before != (self.elements.len(), self.relationships.len())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Copies coordinates, vertices and label positions from `source`
    ///
    /// Membership is left untouched; only items present in both views receive
    /// layout. The paper size is copied when this view has none.
    pub fn copy_layout_information_from(&mut self, source: &View) {
        if self.paper_size.is_none() {
            self.paper_size = source.paper_size;
        }

        for element in &mut self.elements {
            if let Some(from) = source.element_view(&element.id) {
                element.x = from.x;
                element.y = from.y;
            }
        }

        for relationship in &mut self.relationships {
            let from = source
                .relationships
                .iter()
                .find(|r| r.id == relationship.id && r.order == relationship.order);
            if let Some(from) = from {
                relationship.vertices = from.vertices.clone();
                relationship.position = from.position;
            }
        }
    }

    /// Returns true if any element carries coordinates
    pub fn has_layout(&self) -> bool {
        self.elements.iter().any(|e| e.x.is_some() || e.y.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ElementSpec, RelationshipSpec};

    fn id(s: &str) -> ItemId {
        s.parse().unwrap()
    }

    /// user -> web -> api -> db, plus mailer (outside) and a third party system
    fn model() -> Model {
        let mut model = Model::new();
        model.add_person(ElementSpec::new("User").id("user")).unwrap();
        model
            .add_software_system(ElementSpec::new("Shop").id("shop"))
            .unwrap();
        model
            .add_software_system(ElementSpec::new("Mailer").id("mailer"))
            .unwrap();
        model
            .add_container(&id("shop"), ElementSpec::new("Web").id("web"))
            .unwrap();
        model
            .add_container(&id("shop"), ElementSpec::new("API").id("api"))
            .unwrap();
        model
            .add_container(&id("shop"), ElementSpec::new("Database").id("db"))
            .unwrap();
        model
            .add_component(&id("api"), ElementSpec::new("Orders").id("orders"))
            .unwrap();
        model
            .add_component(&id("api"), ElementSpec::new("Payments").id("payments"))
            .unwrap();

        model
            .add_relationship(RelationshipSpec::new(&id("user"), &id("shop"), "Buys from").id("r-user-shop"))
            .unwrap();
        model
            .add_relationship(RelationshipSpec::new(&id("shop"), &id("mailer"), "Sends mail via").id("r-shop-mailer"))
            .unwrap();
        model
            .add_relationship(RelationshipSpec::new(&id("web"), &id("api"), "Calls").id("r-web-api"))
            .unwrap();
        model
            .add_relationship(RelationshipSpec::new(&id("api"), &id("db"), "Reads from").id("r-api-db"))
            .unwrap();
        model
            .add_relationship(RelationshipSpec::new(&id("orders"), &id("db"), "Stores orders").id("r-orders-db"))
            .unwrap();
        model
    }

    fn view(kind: ViewKind) -> View {
        View::new("key".to_string(), String::new(), kind)
    }

    fn element_ids(view: &View) -> Vec<&str> {
        view.elements().iter().map(|e| e.id.as_str()).collect()
    }

    fn relationship_ids(view: &View) -> Vec<&str> {
        view.relationships().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn add_element_pulls_in_relationships_to_present_elements() {
        let model = model();
        let mut v = view(ViewKind::SystemLandscape {
            enterprise_boundary_visible: true,
        });

        v.add(&model, &id("user")).unwrap();
        assert!(v.relationships().is_empty());

        v.add(&model, &id("shop")).unwrap();
        assert_eq!(relationship_ids(&v), vec!["r-user-shop"]);
    }

    #[test]
    fn add_is_idempotent() {
        let model = model();
        let mut v = view(ViewKind::SystemLandscape {
            enterprise_boundary_visible: false,
        });
        v.add(&model, &id("user")).unwrap();
        v.add(&model, &id("shop")).unwrap();
        v.add(&model, &id("shop")).unwrap();

        assert_eq!(element_ids(&v), vec!["user", "shop"]);
        assert_eq!(v.relationships().len(), 1);
    }

    #[test]
    fn add_relationship_adds_endpoints() {
        let model = model();
        let mut v = view(ViewKind::Container {
            software_system_id: id("shop"),
            external_software_system_boundaries_visible: false,
        });
        v.add(&model, &id("r-web-api")).unwrap();

        assert_eq!(element_ids(&v), vec!["web", "api"]);
        assert_eq!(relationship_ids(&v), vec!["r-web-api"]);
    }

    #[test]
    fn add_unknown_id_fails() {
        let model = model();
        let mut v = view(ViewKind::SystemLandscape {
            enterprise_boundary_visible: false,
        });
        let err = v.add(&model, &id("ghost")).unwrap_err();

        assert_eq!(err, ViewError::Model(ModelError::ElementNotFound(id("ghost"))));
    }

    #[test]
    fn nearest_neighbours_is_exactly_one_hop() {
        let model = model();
        let mut v = view(ViewKind::SystemContext {
            software_system_id: id("shop"),
            enterprise_boundary_visible: true,
        });
        v.add_nearest_neighbours(&model, &id("shop")).unwrap();

        let mut ids = element_ids(&v);
        ids.sort();
        assert_eq!(ids, vec!["mailer", "shop", "user"]);
        assert_eq!(v.relationships().len(), 2);
    }

    #[test]
    fn landscape_add_all_elements_takes_people_and_systems() {
        let model = model();
        let mut v = view(ViewKind::SystemLandscape {
            enterprise_boundary_visible: true,
        });
        v.add_all_elements(&model).unwrap();

        assert_eq!(element_ids(&v), vec!["user", "shop", "mailer"]);
        assert_eq!(relationship_ids(&v), vec!["r-user-shop", "r-shop-mailer"]);
    }

    #[test]
    fn container_view_skips_its_own_system() {
        let model = model();
        let mut v = view(ViewKind::Container {
            software_system_id: id("shop"),
            external_software_system_boundaries_visible: true,
        });
        v.add_all_elements(&model).unwrap();

        assert_eq!(element_ids(&v), vec!["user", "mailer", "web", "api", "db"]);
        assert!(!v.contains_element(&id("shop")));
    }

    #[test]
    fn component_view_adds_siblings_and_components() {
        let model = model();
        let mut v = view(ViewKind::Component {
            container_id: id("api"),
            external_container_boundaries_visible: false,
        });
        v.add_all_containers(&model).unwrap();
        v.add_all_components(&model).unwrap();

        assert_eq!(element_ids(&v), vec!["web", "db", "orders", "payments"]);
        assert_eq!(relationship_ids(&v), vec!["r-orders-db"]);
    }

    #[test]
    fn add_all_components_rejected_outside_component_views() {
        let model = model();
        let mut v = view(ViewKind::Container {
            software_system_id: id("shop"),
            external_software_system_boundaries_visible: false,
        });
        let err = v.add_all_components(&model).unwrap_err();

        assert!(matches!(
            err,
            ViewError::Unsupported {
                view_type: ViewType::Container,
                ..
            }
        ));
    }

    #[test]
    fn filtered_views_cannot_be_populated() {
        let model = model();
        let mut v = view(ViewKind::Filtered {
            base_view_key: "landscape".to_string(),
            mode: FilterMode::Include,
            tags: vec![],
        });

        assert!(v.add(&model, &id("user")).is_err());
        assert!(v.add_all_elements(&model).is_err());
        assert!(v.add_nearest_neighbours(&model, &id("user")).is_err());
    }

    #[test]
    fn dynamic_interactions_are_numbered() {
        let model = model();
        let mut v = view(ViewKind::Dynamic {
            element_id: Some(id("shop")),
        });

        let first = v
            .add_interaction(&model, &id("web"), &id("api"), "Submits order to")
            .unwrap();
        let second = v.add_interaction(&model, &id("db"), &id("api"), "").unwrap();

        assert_eq!(first, id("r-web-api"));
        assert_eq!(second, id("r-api-db"));
        let orders: Vec<_> = v
            .relationships()
            .iter()
            .map(|r| r.order.clone().unwrap())
            .collect();
        assert_eq!(orders, vec!["1", "2"]);
        assert_eq!(
            v.relationships()[0].description.as_deref(),
            Some("Submits order to")
        );
        assert!(v.relationships()[1].description.is_none());
    }

    #[test]
    fn dynamic_order_continues_past_u32() {
        let model = model();
        let mut v = view(ViewKind::Dynamic { element_id: None });
        let mut step = RelationshipView::new(id("r-web-api"));
        step.order = Some(u32::MAX.to_string());
        v.relationships.push(step);

        v.add_interaction(&model, &id("api"), &id("db"), "").unwrap();

        assert_eq!(v.relationships()[1].order.as_deref(), Some("4294967296"));
    }

    #[test]
    fn exhausted_dynamic_order_is_an_error() {
        let model = model();
        let mut v = view(ViewKind::Dynamic { element_id: None });
        let mut step = RelationshipView::new(id("r-web-api"));
        step.order = Some(u64::MAX.to_string());
        v.relationships.push(step);

        let err = v
            .add_interaction(&model, &id("api"), &id("db"), "")
            .unwrap_err();
        assert!(matches!(err, ViewError::Model(ModelError::Validation(_))));
        assert_eq!(v.relationships().len(), 1);
        assert!(v.elements().is_empty());

        assert!(v.add(&model, &id("r-api-db")).is_err());
        assert_eq!(v.relationships().len(), 1);
    }

    #[test]
    fn dynamic_interaction_requires_relationship() {
        let model = model();
        let mut v = view(ViewKind::Dynamic { element_id: None });
        let err = v
            .add_interaction(&model, &id("web"), &id("db"), "Reads")
            .unwrap_err();

        assert_eq!(err, ViewError::NoRelationship(id("web"), id("db")));
        assert!(v.elements().is_empty());
    }

    #[test]
    fn deployment_node_brings_nested_elements() {
        let mut model = model();
        let server = model
            .add_deployment_node("Live", ElementSpec::new("Server").id("server"))
            .unwrap();
        let tomcat = model
            .add_child_deployment_node(&server, ElementSpec::new("Tomcat").id("tomcat"))
            .unwrap();
        let instance = model.add_container_instance(&tomcat, &id("api")).unwrap();
        model
            .add_deployment_node("Development", ElementSpec::new("Laptop").id("laptop"))
            .unwrap();

        let mut v = view(ViewKind::Deployment {
            software_system_id: Some(id("shop")),
            environment: "Live".to_string(),
        });
        v.add_all_elements(&model).unwrap();

        assert_eq!(
            element_ids(&v),
            vec!["server", "tomcat", instance.as_str()]
        );

        let err = v.add_deployment_node(&model, &id("laptop")).unwrap_err();
        assert!(matches!(err, ViewError::Model(ModelError::Validation(_))));
    }

    #[test]
    fn remove_element_drops_its_relationships() {
        let model = model();
        let mut v = view(ViewKind::SystemLandscape {
            enterprise_boundary_visible: false,
        });
        v.add_all_elements(&model).unwrap();

        assert!(v.remove(&model, &id("shop")));
        assert_eq!(element_ids(&v), vec!["user", "mailer"]);
        assert!(v.relationships().is_empty());
        assert!(!v.remove(&model, &id("shop")));
    }

    #[test]
    fn copy_layout_matches_items_not_membership() {
        let model = model();
        let landscape = ViewKind::SystemLandscape {
            enterprise_boundary_visible: false,
        };

        let mut source = view(landscape.clone());
        source.add_all_elements(&model).unwrap();
        source.paper_size = Some(PaperSize::A4Landscape);
        if let Some(user) = source.element_view_mut(&id("user")) {
            user.x = Some(100);
            user.y = Some(200);
        }
        if let Some(rel) = source.relationship_view_mut(&id("r-user-shop")) {
            rel.vertices.push(Vertex { x: 5, y: 6 });
            rel.position = Some(70);
        }

        let mut target = view(landscape);
        target.add(&model, &id("user")).unwrap();
        target.add(&model, &id("shop")).unwrap();
        target.copy_layout_information_from(&source);

        let user = target.element_view(&id("user")).unwrap();
        assert_eq!((user.x, user.y), (Some(100), Some(200)));
        assert_eq!(target.relationships()[0].vertices, vec![Vertex { x: 5, y: 6 }]);
        assert_eq!(target.relationships()[0].position, Some(70));
        assert_eq!(target.paper_size, Some(PaperSize::A4Landscape));
        assert_eq!(element_ids(&target), vec!["user", "shop"]);
    }
}
