//! Identifiers for model items
//!
//! Every element and relationship in a workspace carries an [`ItemId`].
//! Ids are either chosen by the caller (e.g. `postulante`, `apiApplication`)
//! or generated from a workspace-scoped counter (`1`, `2`, ...).
//!
//! The [`IdRegistry`] belongs to a single workspace, so two workspaces built
//! in the same process never share a sequence.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Identifier must not be empty")]
    Empty,

    #[error("Identifier already in use: '{0}'")]
    Duplicate(String),
}

/// Id of an element or relationship, unique within its workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for ItemId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hands out ids for one workspace
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    /// Last generated sequence value
    counter: u64,

    /// Every id registered so far
    taken: HashSet<ItemId>,
}

impl IdRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an id for a new item
    ///
    /// A non-blank `requested` id is used verbatim unless it is already taken.
    /// Otherwise the next free counter value is generated.
    pub fn assign(&mut self, requested: Option<&str>) -> Result<ItemId, IdError> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(requested) => {
                let id: ItemId = requested.parse()?;
                if self.taken.contains(&id) {
                    return Err(IdError::Duplicate(id.0));
                }
                self.taken.insert(id.clone());
                Ok(id)
            }
            None => Ok(self.generate()),
        }
    }

    /// Generates the next counter value not already in use
    fn generate(&mut self) -> ItemId {
        loop {
            self.counter += 1;
            let id = ItemId(self.counter.to_string());
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Returns true if the id has been registered
    pub fn contains(&self, id: &ItemId) -> bool {
        self.taken.contains(id)
    }

    /// Returns the number of registered ids
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Returns true if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_trims_whitespace() {
        let id: ItemId = "  apiApplication ".parse().unwrap();
        assert_eq!(id.as_str(), "apiApplication");
    }

    #[test]
    fn item_id_rejects_blank() {
        assert_eq!("".parse::<ItemId>(), Err(IdError::Empty));
        assert_eq!("   ".parse::<ItemId>(), Err(IdError::Empty));
    }

    #[test]
    fn registry_generates_sequential_ids() {
        let mut registry = IdRegistry::new();

        assert_eq!(registry.assign(None).unwrap().as_str(), "1");
        assert_eq!(registry.assign(None).unwrap().as_str(), "2");
        assert_eq!(registry.assign(Some("")).unwrap().as_str(), "3");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn registry_keeps_explicit_ids() {
        let mut registry = IdRegistry::new();
        let id = registry.assign(Some("postulante")).unwrap();

        assert_eq!(id.as_str(), "postulante");
        assert!(registry.contains(&id));
    }

    #[test]
    fn registry_rejects_duplicate_explicit_id() {
        let mut registry = IdRegistry::new();
        registry.assign(Some("mainframe")).unwrap();

        let result = registry.assign(Some("mainframe"));
        assert_eq!(result, Err(IdError::Duplicate("mainframe".to_string())));
    }

    #[test]
    fn generated_ids_skip_taken_values() {
        let mut registry = IdRegistry::new();
        registry.assign(Some("1")).unwrap();
        registry.assign(Some("2")).unwrap();

        assert_eq!(registry.assign(None).unwrap().as_str(), "3");
    }

    #[test]
    fn explicit_id_colliding_with_generated_is_rejected() {
        let mut registry = IdRegistry::new();
        registry.assign(None).unwrap();

        assert!(matches!(
            registry.assign(Some("1")),
            Err(IdError::Duplicate(_))
        ));
    }

    #[test]
    fn registries_are_independent() {
        let mut first = IdRegistry::new();
        let mut second = IdRegistry::new();

        first.assign(None).unwrap();
        first.assign(None).unwrap();

        assert_eq!(second.assign(None).unwrap().as_str(), "1");
    }

    #[test]
    fn serde_roundtrip_item_id() {
        let id: ItemId = "signinController".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"signinController\"");

        let parsed: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_rejects_empty_item_id() {
        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
    }
}
