//! Architecture elements
//!
//! People, software systems, containers, components, deployment nodes and
//! container instances share one [`Element`] struct. The variant-specific
//! data lives in [`ElementKind`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ItemId;
use super::tags::{Tag, Tags};

/// Whether an element is inside or outside the enterprise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Location {
    Internal,
    External,
    #[default]
    Unspecified,
}

/// The C4 type of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
    DeploymentNode {
        environment: String,
        instances: u32,
    },
    ContainerInstance {
        container_id: ItemId,
        instance_id: u32,
        environment: String,
    },
}

impl ElementKind {
    /// Returns the tag every element of this kind carries
    pub fn tag(&self) -> Tag {
        match self {
            ElementKind::Person => Tag::Person,
            ElementKind::SoftwareSystem => Tag::SoftwareSystem,
            ElementKind::Container => Tag::Container,
            ElementKind::Component => Tag::Component,
            ElementKind::DeploymentNode { .. } => Tag::DeploymentNode,
            ElementKind::ContainerInstance { .. } => Tag::ContainerInstance,
        }
    }

    /// Returns a short display label
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Person => "person",
            ElementKind::SoftwareSystem => "software-system",
            ElementKind::Container => "container",
            ElementKind::Component => "component",
            ElementKind::DeploymentNode { .. } => "deployment-node",
            ElementKind::ContainerInstance { .. } => "container-instance",
        }
    }

    /// Returns the deployment environment for deployment elements
    pub fn environment(&self) -> Option<&str> {
        match self {
            ElementKind::DeploymentNode { environment, .. }
            | ElementKind::ContainerInstance { environment, .. } => Some(environment),
            _ => None,
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self, ElementKind::Person)
    }

    pub fn is_software_system(&self) -> bool {
        matches!(self, ElementKind::SoftwareSystem)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ElementKind::Container)
    }

    pub fn is_component(&self) -> bool {
        matches!(self, ElementKind::Component)
    }

    pub fn is_deployment_node(&self) -> bool {
        matches!(self, ElementKind::DeploymentNode { .. })
    }

    pub fn is_container_instance(&self) -> bool {
        matches!(self, ElementKind::ContainerInstance { .. })
    }
}

/// An element of the architecture model
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ItemId,
    pub kind: ElementKind,
    pub name: String,
    pub description: String,
    pub technology: Option<String>,
    pub location: Location,
    pub tags: Tags,
    pub properties: BTreeMap<String, String>,
    pub url: Option<String>,

    /// Owning element (software system, container or deployment node)
    pub parent: Option<ItemId>,
}

impl Element {
    /// Builds an element from a spec; the id must already be registered
    pub(crate) fn from_spec(
        id: ItemId,
        kind: ElementKind,
        spec: ElementSpec,
        parent: Option<ItemId>,
    ) -> Self {
        let mut tags = Tags::new();
        tags.add(Tag::Element);
        tags.add(kind.tag());
        for tag in spec.tags {
            tags.add(tag);
        }

        Self {
            id,
            kind,
            name: spec.name.trim().to_string(),
            description: spec.description,
            technology: spec.technology.filter(|t| !t.is_empty()),
            location: spec.location,
            tags,
            properties: spec.properties,
            url: spec.url,
            parent,
        }
    }

    /// Returns the name with the technology appended, if any
    pub fn display_name(&self) -> String {
        match &self.technology {
            Some(technology) => format!("{} [{}]", self.name, technology),
            None => self.name.clone(),
        }
    }
}

/// Fields for creating a new element
///
/// ```
/// use c4_cli::domain::{ElementSpec, Location};
///
/// let spec = ElementSpec::new("Mainframe Business System")
///     .id("mainframe")
///     .description("Stores all of the core banking information")
///     .location(Location::Internal)
///     .tag("Existing System");
/// assert_eq!(spec.name, "Mainframe Business System");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub technology: Option<String>,
    pub location: Location,
    pub tags: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub url: Option<String>,

    /// Number of instances, deployment nodes only
    pub instances: Option<u32>,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn instances(mut self, instances: u32) -> Self {
        self.instances = Some(instances);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_spec_adds_default_tags() {
        let id: ItemId = "db".parse().unwrap();
        let spec = ElementSpec::new("Database").tag("Database");
        let element = Element::from_spec(id, ElementKind::Container, spec, None);

        assert_eq!(element.tags.to_string(), "Element,Container,Database");
    }

    #[test]
    fn from_spec_drops_empty_technology() {
        let id: ItemId = "x".parse().unwrap();
        let spec = ElementSpec::new("Web").technology("");
        let element = Element::from_spec(id, ElementKind::Container, spec, None);

        assert!(element.technology.is_none());
    }

    #[test]
    fn display_name_includes_technology() {
        let id: ItemId = "api".parse().unwrap();
        let spec = ElementSpec::new("API Application").technology("NestJs");
        let element = Element::from_spec(id, ElementKind::Container, spec, None);

        assert_eq!(element.display_name(), "API Application [NestJs]");
    }

    #[test]
    fn kind_environment() {
        let node = ElementKind::DeploymentNode {
            environment: "Live".to_string(),
            instances: 4,
        };
        assert_eq!(node.environment(), Some("Live"));
        assert_eq!(ElementKind::Person.environment(), None);
    }

    #[test]
    fn location_serializes_as_pascal_case() {
        assert_eq!(
            serde_json::to_string(&Location::External).unwrap(),
            "\"External\""
        );
    }
}
