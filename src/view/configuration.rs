//! Diagram styling and view-set configuration
//!
//! These types serialize directly into the `views.configuration` section of
//! the exchange document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shape used to draw an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Box,
    RoundedBox,
    Circle,
    Ellipse,
    Hexagon,
    Cylinder,
    Pipe,
    Person,
    Robot,
    Folder,
    WebBrowser,
    MobileDevicePortrait,
    MobileDeviceLandscape,
    Component,
}

/// How relationship lines are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Routing {
    Direct,
    Orthogonal,
    Curved,
}

/// Style applied to every element carrying `tag`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<bool>,
}

impl ElementStyle {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn background(mut self, colour: impl Into<String>) -> Self {
        self.background = Some(colour.into());
        self
    }

    pub fn color(mut self, colour: impl Into<String>) -> Self {
        self.color = Some(colour.into());
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Opacity percentage, clamped to 0..=100
    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = Some(opacity.min(100));
        self
    }
}

/// Style applied to every relationship carrying `tag`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStyle {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Routing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Label position along the line, as a percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
}

impl RelationshipStyle {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn dashed(mut self, dashed: bool) -> Self {
        self.dashed = Some(dashed);
        self
    }

    pub fn position(mut self, position: u8) -> Self {
        self.position = Some(position.min(100));
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = Some(opacity.min(100));
        self
    }
}

/// Element and relationship styles, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    #[serde(default)]
    pub elements: Vec<ElementStyle>,
    #[serde(default)]
    pub relationships: Vec<RelationshipStyle>,
}

impl Styles {
    pub fn add_element_style(&mut self, style: ElementStyle) {
        self.elements.push(style);
    }

    pub fn add_relationship_style(&mut self, style: RelationshipStyle) {
        self.relationships.push(style);
    }

    /// Returns the styles whose tag is among `tags`, in declaration order
    pub fn element_styles_for<'a>(
        &'a self,
        tags: &'a crate::domain::Tags,
    ) -> impl Iterator<Item = &'a ElementStyle> {
        self.elements
            .iter()
            .filter(move |style| tags.contains_name(&style.tag))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }
}

/// View-set wide settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub styles: Styles,

    /// Key of the view shown first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_view: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_view: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tags;

    #[test]
    fn element_style_serializes_camel_case_without_unset_fields() {
        let style = ElementStyle::new("Person")
            .background("#08427b")
            .shape(Shape::Person)
            .font_size(22);
        let json = serde_json::to_value(&style).unwrap();

        assert_eq!(json["tag"], "Person");
        assert_eq!(json["fontSize"], 22);
        assert_eq!(json["shape"], "Person");
        assert!(json.get("color").is_none());
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(ElementStyle::new("Failover").opacity(250).opacity, Some(100));
        assert_eq!(RelationshipStyle::new("Failover").position(70).position, Some(70));
    }

    #[test]
    fn styles_match_by_tag_name() {
        let mut styles = Styles::default();
        styles.add_element_style(ElementStyle::new("Database").shape(Shape::Cylinder));
        styles.add_element_style(ElementStyle::new("Person"));

        let tags = Tags::parse("Element,Container,Database");
        let matched: Vec<_> = styles.element_styles_for(&tags).collect();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].shape, Some(Shape::Cylinder));
    }

    #[test]
    fn empty_configuration_omits_optional_keys() {
        let json = serde_json::to_value(Configuration::default()).unwrap();
        assert!(json.get("defaultView").is_none());
        assert!(json.get("properties").is_none());
        assert!(json["styles"]["elements"].as_array().unwrap().is_empty());
    }
}
