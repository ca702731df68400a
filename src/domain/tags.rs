//! Tags attached to elements and relationships
//!
//! Well-known tags drive default styling, so they are modeled as enum
//! variants. Anything else a caller supplies is kept as [`Tag::Custom`].
//!
//! On the wire a tag set is a single comma-separated string:
//! `"Element,Software System,Existing System"`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Element,
    Relationship,
    Person,
    SoftwareSystem,
    Container,
    Component,
    DeploymentNode,
    ContainerInstance,
    Synchronous,
    Asynchronous,
    Custom(String),
}

impl Tag {
    /// Returns the tag's wire name
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Element => "Element",
            Tag::Relationship => "Relationship",
            Tag::Person => "Person",
            Tag::SoftwareSystem => "Software System",
            Tag::Container => "Container",
            Tag::Component => "Component",
            Tag::DeploymentNode => "Deployment Node",
            Tag::ContainerInstance => "Container Instance",
            Tag::Synchronous => "Synchronous",
            Tag::Asynchronous => "Asynchronous",
            Tag::Custom(name) => name,
        }
    }

    /// Returns true for tags the library assigns itself
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Tag::Custom(_))
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Element" => Tag::Element,
            "Relationship" => Tag::Relationship,
            "Person" => Tag::Person,
            "Software System" => Tag::SoftwareSystem,
            "Container" => Tag::Container,
            "Component" => Tag::Component,
            "Deployment Node" => Tag::DeploymentNode,
            "Container Instance" => Tag::ContainerInstance,
            "Synchronous" => Tag::Synchronous,
            "Asynchronous" => Tag::Asynchronous,
            other => Tag::Custom(other.to_string()),
        }
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::from(value.as_str())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Tag::from(value))
    }
}

/// Ordered set of tags, insertion order preserved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Creates an empty tag set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a tag, returning false if it was already present
    ///
    /// A custom name containing commas is added as one tag per part, since
    /// the wire form cannot carry a comma inside a tag.
    pub fn add(&mut self, tag: impl Into<Tag>) -> bool {
        match tag.into() {
            Tag::Custom(name) if name.contains(',') => name
                .split(',')
                .fold(false, |added, part| self.insert(Tag::from(part)) || added),
            tag => self.insert(tag),
        }
    }

    fn insert(&mut self, tag: Tag) -> bool {
        if tag.as_str().is_empty() || self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Removes a tag, returning true if it was present
    pub fn remove(&mut self, tag: &Tag) -> bool {
        let len_before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != len_before
    }

    /// Returns true if the tag is present
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Returns true if a tag with this wire name is present
    pub fn contains_name(&self, name: &str) -> bool {
        self.contains(&Tag::from(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the comma-separated wire form
    pub fn parse(value: &str) -> Self {
        let mut tags = Self::new();
        for name in value.split(',') {
            tags.add(name);
        }
        tags
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Tag::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl<T: Into<Tag>> FromIterator<T> for Tags {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.add(tag);
        }
        tags
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Tags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Tags::parse(&value))
    }
}
