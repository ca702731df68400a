//! Architecture model: elements, relationships and the workspace aggregate
//!
//! Contains the core modeling logic without any I/O concerns.

mod element;
mod graph;
mod id;
mod model;
mod relationship;
mod tags;
mod workspace;

pub use element::{Element, ElementKind, ElementSpec, Location};
pub use graph::{GraphError, RelationshipGraph};
pub use id::{IdError, IdRegistry, ItemId};
pub use model::{Model, ModelError};
pub use relationship::{InteractionStyle, Relationship, RelationshipSpec};
pub use tags::{Tag, Tags};
pub use workspace::Workspace;
