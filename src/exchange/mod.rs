//! Exchange format: the flat JSON workspace document
//!
//! [`serialize`] flattens a [`Workspace`] into a [`WorkspaceDocument`] and
//! [`hydrate`] rebuilds one from it. The JSON helpers wrap both with
//! serde_json.

mod document;
mod hydrate;
mod serialize;

use thiserror::Error;

use crate::domain::Workspace;

pub use document::{
    ElementDocument, ElementViewDocument, EnterpriseDocument, FilteredViewDocument,
    ModelDocument, RelationshipDocument, RelationshipViewDocument, ViewDocument, ViewsDocument,
    WorkspaceDocument,
};
pub use hydrate::{hydrate, HydrateError};
pub use serialize::serialize;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Invalid workspace JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Hydrate(#[from] HydrateError),
}

/// Serializes a workspace to JSON
pub fn to_json(workspace: &Workspace, pretty: bool) -> Result<String, ExchangeError> {
    let doc = serialize(workspace);
    let json = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(json)
}

/// Parses JSON into a document without resolving references
pub fn parse_document(json: &str) -> Result<WorkspaceDocument, ExchangeError> {
    Ok(serde_json::from_str(json)?)
}

/// Parses and hydrates a workspace from JSON
pub fn from_json(json: &str) -> Result<Workspace, ExchangeError> {
    Ok(hydrate(parse_document(json)?)?)
}
