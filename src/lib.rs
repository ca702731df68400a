//! c4 - C4 architecture models as code
//!
//! Build a workspace of people, software systems, containers, components and
//! deployment nodes, declare views over it, and exchange it as a flat JSON
//! document with a remote diagramming service.
//!
//! ```
//! use c4_cli::domain::{ElementSpec, Workspace};
//! use c4_cli::exchange;
//!
//! let mut workspace = Workspace::new("Bank", "Internet banking");
//! let customer = workspace.model.add_person(ElementSpec::new("Customer")).unwrap();
//! let bank = workspace.model.add_software_system(ElementSpec::new("Bank")).unwrap();
//! workspace.model.uses(&customer, &bank, "Uses").unwrap();
//!
//! let json = exchange::to_json(&workspace, false).unwrap();
//! let restored = exchange::from_json(&json).unwrap();
//! assert_eq!(restored.model.relationship_count(), 1);
//! ```

pub mod domain;
pub mod view;
pub mod exchange;
pub mod storage;
pub mod remote;
pub mod sample;
pub mod cli;

pub use domain::{Element, ElementKind, ItemId, Model, Relationship, Workspace};
pub use view::{View, ViewSet};
