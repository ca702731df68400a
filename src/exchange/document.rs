//! Wire types of the exchange document
//!
//! The document is flat: elements nest only by containment, every other
//! reference is an id. Field names follow the JSON workspace format used by
//! the remote diagramming service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{InteractionStyle, ItemId, Location};
use crate::view::{Configuration, FilterMode, PaperSize, Vertex};

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub model: ModelDocument,
    #[serde(default)]
    pub views: ViewsDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseDocument {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise: Option<EnterpriseDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<ElementDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub software_systems: Vec<ElementDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_nodes: Vec<ElementDocument>,
}

/// Any element record; which optional fields are set depends on the kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDocument {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipDocument>,

    // people and software systems
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    // containers, components and deployment nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ElementDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ElementDocument>,

    // deployment nodes and container instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_instances: Vec<ElementDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<u32>,
}

impl ElementDocument {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            tags: String::new(),
            url: None,
            properties: BTreeMap::new(),
            relationships: Vec::new(),
            location: None,
            technology: None,
            containers: Vec::new(),
            components: Vec::new(),
            environment: None,
            instances: None,
            children: Vec::new(),
            container_instances: Vec::new(),
            container_id: None,
            instance_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDocument {
    pub id: ItemId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    /// Defaults to the element the record is nested under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<ItemId>,
    pub destination_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_style: Option<InteractionStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_relationship_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_landscape_views: Vec<ViewDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_context_views: Vec<ViewDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_views: Vec<ViewDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_views: Vec<ViewDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_views: Vec<ViewDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployment_views: Vec<ViewDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filtered_views: Vec<FilteredViewDocument>,
    #[serde(default)]
    pub configuration: Configuration,
}

/// Record for every view type except filtered views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDocument {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_system_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enterprise_boundary_visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub external_software_system_boundaries_visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub external_container_boundaries_visible: bool,
    #[serde(default)]
    pub elements: Vec<ElementViewDocument>,
    #[serde(default)]
    pub relationships: Vec<RelationshipViewDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementViewDocument {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipViewDocument {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Vertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredViewDocument {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub base_view_key: String,
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub tags: Vec<String>,
}
