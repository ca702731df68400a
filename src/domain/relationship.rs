//! Relationships between elements

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ItemId;
use super::tags::{Tag, Tags};

/// How the source talks to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InteractionStyle {
    #[default]
    Synchronous,
    Asynchronous,
}

impl InteractionStyle {
    pub fn tag(&self) -> Tag {
        match self {
            InteractionStyle::Synchronous => Tag::Synchronous,
            InteractionStyle::Asynchronous => Tag::Asynchronous,
        }
    }
}

/// A directed edge from `source_id` to `destination_id`
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: ItemId,
    pub source_id: ItemId,
    pub destination_id: ItemId,
    pub description: String,
    pub technology: Option<String>,
    pub interaction_style: InteractionStyle,
    pub tags: Tags,
    pub properties: BTreeMap<String, String>,
    pub url: Option<String>,

    /// Another relationship this one is derived from; never validated
    pub linked_relationship_id: Option<ItemId>,
}

impl Relationship {
    pub(crate) fn from_spec(id: ItemId, spec: RelationshipSpec) -> Self {
        let mut tags = Tags::new();
        tags.add(Tag::Relationship);
        tags.add(spec.interaction_style.tag());
        for tag in spec.tags {
            tags.add(tag);
        }

        Self {
            id,
            source_id: spec.source,
            destination_id: spec.destination,
            description: spec.description,
            technology: spec.technology.filter(|t| !t.is_empty()),
            interaction_style: spec.interaction_style,
            tags,
            properties: spec.properties,
            url: spec.url,
            linked_relationship_id: spec.linked_relationship_id,
        }
    }

    /// Returns true if the relationship connects `a` and `b` in either direction
    pub fn connects(&self, a: &ItemId, b: &ItemId) -> bool {
        (&self.source_id == a && &self.destination_id == b)
            || (&self.source_id == b && &self.destination_id == a)
    }

    /// Returns true if `id` is either endpoint
    pub fn involves(&self, id: &ItemId) -> bool {
        &self.source_id == id || &self.destination_id == id
    }
}

/// Fields for creating a new relationship
#[derive(Debug, Clone)]
pub struct RelationshipSpec {
    pub id: Option<String>,
    pub source: ItemId,
    pub destination: ItemId,
    pub description: String,
    pub technology: Option<String>,
    pub interaction_style: InteractionStyle,
    pub tags: Vec<String>,
    pub properties: BTreeMap<String, String>,
    pub url: Option<String>,
    pub linked_relationship_id: Option<ItemId>,
}

impl RelationshipSpec {
    pub fn new(source: &ItemId, destination: &ItemId, description: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.clone(),
            destination: destination.clone(),
            description: description.into(),
            technology: None,
            interaction_style: InteractionStyle::Synchronous,
            tags: Vec::new(),
            properties: BTreeMap::new(),
            url: None,
            linked_relationship_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub fn interaction_style(mut self, style: InteractionStyle) -> Self {
        self.interaction_style = style;
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

    pub fn linked_to(mut self, relationship: &ItemId) -> Self {
        self.linked_relationship_id = Some(relationship.clone());
        self
    }
}
