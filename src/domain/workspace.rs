//! The workspace aggregate

use chrono::{DateTime, Utc};

use super::model::Model;
use crate::view::ViewSet;

/// A named model plus the views drawn from it
///
/// Fields are public so the model and the views can be borrowed separately:
///
/// ```
/// use c4_cli::domain::{ElementSpec, Workspace};
///
/// let mut workspace = Workspace::new("Big Bank", "Internet banking");
/// let system = workspace
///     .model
///     .add_software_system(ElementSpec::new("Internet Banking System"))
///     .unwrap();
/// let view = workspace
///     .views
///     .create_system_context_view(&workspace.model, &system, "context", "")
///     .unwrap();
/// view.add_nearest_neighbours(&workspace.model, &system).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    /// Id assigned by the remote service, if known
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub model: Model,
    pub views: ViewSet,
}

impl Workspace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Stamps the last-modified time with the current instant
    pub fn touch(&mut self) {
        self.last_modified = Some(Utc::now());
    }

    /// Copies diagram layout from another version of this workspace
    ///
    /// Returns the number of views that received layout.
    pub fn copy_layout_information_from(&mut self, other: &Workspace) -> usize {
        self.views.copy_layout_information_from(&other.views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ElementSpec;

    #[test]
    fn new_workspace_is_empty() {
        let workspace = Workspace::new("Hiring", "Recruitment platform");

        assert_eq!(workspace.name, "Hiring");
        assert!(workspace.id.is_none());
        assert!(workspace.model.is_empty());
        assert!(workspace.views.is_empty());
    }

    #[test]
    fn workspaces_have_independent_id_sequences() {
        let mut first = Workspace::new("a", "");
        let mut second = Workspace::new("b", "");

        let a = first.model.add_person(ElementSpec::new("User")).unwrap();
        let b = second.model.add_person(ElementSpec::new("User")).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.as_str(), "1");
    }

    #[test]
    fn touch_sets_last_modified() {
        let mut workspace = Workspace::new("w", "");
        workspace.touch();
        assert!(workspace.last_modified.is_some());
    }
}
