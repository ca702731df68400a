//! Views over the model and the catalog that holds them

mod configuration;
mod paper_size;
#[allow(clippy::module_inception)]
mod view;
mod view_set;

use thiserror::Error;

use crate::domain::{ItemId, ModelError};

pub use configuration::{Configuration, ElementStyle, RelationshipStyle, Routing, Shape, Styles};
pub use paper_size::PaperSize;
pub use view::{
    ElementView, FilterMode, RelationshipView, Vertex, View, ViewKind, ViewType,
};
pub use view_set::ViewSet;

#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("A key must be specified.")]
    EmptyKey,

    #[error("View already exists in workspace with key '{0}'.")]
    KeyConflict(String),

    #[error("View not found: {0}")]
    ViewNotFound(String),

    #[error("{id} is a {actual}, expected a {expected}")]
    InvalidAnchor {
        id: ItemId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{operation} is not supported on {view_type} views")]
    Unsupported {
        operation: &'static str,
        view_type: ViewType,
    },

    #[error("No relationship between {0} and {1}")]
    NoRelationship(ItemId, ItemId),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ViewError {
    /// Returns true when an id or key did not resolve
    pub fn is_not_found(&self) -> bool {
        match self {
            ViewError::ViewNotFound(_) => true,
            ViewError::Model(err) => err.is_not_found(),
            _ => false,
        }
    }
}
