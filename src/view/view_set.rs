//! The catalog of views in a workspace

use super::configuration::Configuration;
use super::view::{FilterMode, View, ViewKind, ViewType};
use super::ViewError;
use crate::domain::{ElementKind, ItemId, Model};

/// Views keyed by a unique key, in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSet {
    views: Vec<View>,
    pub configuration: Configuration,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects blank keys and keys already in use
    fn ensure_key_is_specific_and_unique(&self, key: &str) -> Result<String, ViewError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ViewError::EmptyKey);
        }
        if self.get_view(key).is_some() {
            return Err(ViewError::KeyConflict(key.to_string()));
        }
        Ok(key.to_string())
    }

    fn push(&mut self, view: View) -> &mut View {
        log::debug!("created {} view '{}'", view.view_type(), view.key);
        let index = self.views.len();
        self.views.push(view);
        &mut self.views[index]
    }

    fn create(
        &mut self,
        key: &str,
        description: &str,
        kind: ViewKind,
    ) -> Result<&mut View, ViewError> {
        let key = self.ensure_key_is_specific_and_unique(key)?;
        Ok(self.push(View::new(key, description.to_string(), kind)))
    }

    /// Registers a fully built view, checking only its key
    pub(crate) fn insert(&mut self, view: View) -> Result<(), ViewError> {
        self.ensure_key_is_specific_and_unique(&view.key)?;
        self.push(view);
        Ok(())
    }

    // =========================================================================
    // Creation
    // =========================================================================

    pub fn create_system_landscape_view(
        &mut self,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ViewError> {
        self.create(
            key,
            description,
            ViewKind::SystemLandscape {
                enterprise_boundary_visible: true,
            },
        )
    }

    pub fn create_system_context_view(
        &mut self,
        model: &Model,
        software_system: &ItemId,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ViewError> {
        require_kind(model, software_system, "software system", |k| {
            k.is_software_system()
        })?;
        self.create(
            key,
            description,
            ViewKind::SystemContext {
                software_system_id: software_system.clone(),
                enterprise_boundary_visible: true,
            },
        )
    }

    pub fn create_container_view(
        &mut self,
        model: &Model,
        software_system: &ItemId,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ViewError> {
        require_kind(model, software_system, "software system", |k| {
            k.is_software_system()
        })?;
        self.create(
            key,
            description,
            ViewKind::Container {
                software_system_id: software_system.clone(),
                external_software_system_boundaries_visible: false,
            },
        )
    }

    pub fn create_component_view(
        &mut self,
        model: &Model,
        container: &ItemId,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ViewError> {
        require_kind(model, container, "container", |k| k.is_container())?;
        self.create(
            key,
            description,
            ViewKind::Component {
                container_id: container.clone(),
                external_container_boundaries_visible: false,
            },
        )
    }

    /// Creates a dynamic view, optionally scoped to a software system or container
    pub fn create_dynamic_view(
        &mut self,
        model: &Model,
        element: Option<&ItemId>,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ViewError> {
        if let Some(element) = element {
            require_kind(model, element, "software system or container", |k| {
                k.is_software_system() || k.is_container()
            })?;
        }
        self.create(
            key,
            description,
            ViewKind::Dynamic {
                element_id: element.cloned(),
            },
        )
    }

    /// Creates a deployment view; a blank environment means `Default`
    pub fn create_deployment_view(
        &mut self,
        model: &Model,
        software_system: Option<&ItemId>,
        environment: &str,
        key: &str,
        description: &str,
    ) -> Result<&mut View, ViewError> {
        if let Some(system) = software_system {
            require_kind(model, system, "software system", |k| k.is_software_system())?;
        }
        let environment = match environment.trim() {
            "" => "Default",
            env => env,
        };
        self.create(
            key,
            description,
            ViewKind::Deployment {
                software_system_id: software_system.cloned(),
                environment: environment.to_string(),
            },
        )
    }

    /// Creates a tag filter over an existing, non-filtered view
    pub fn create_filtered_view(
        &mut self,
        base_view_key: &str,
        key: &str,
        description: &str,
        mode: FilterMode,
        tags: Vec<String>,
    ) -> Result<&mut View, ViewError> {
        let base = self.view(base_view_key)?;
        if base.view_type() == ViewType::Filtered {
            return Err(ViewError::Unsupported {
                operation: "filter",
                view_type: ViewType::Filtered,
            });
        }
        let base_view_key = base.key.clone();
        self.create(
            key,
            description,
            ViewKind::Filtered {
                base_view_key,
                mode,
                tags,
            },
        )
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the view with the given key, if any
    pub fn get_view(&self, key: &str) -> Option<&View> {
        self.views.iter().find(|v| v.key == key)
    }

    pub fn get_view_mut(&mut self, key: &str) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.key == key)
    }

    /// Returns the view with the given key or `ViewNotFound`
    pub fn view(&self, key: &str) -> Result<&View, ViewError> {
        self.get_view(key)
            .ok_or_else(|| ViewError::ViewNotFound(key.to_string()))
    }

    pub fn view_mut(&mut self, key: &str) -> Result<&mut View, ViewError> {
        self.get_view_mut(key)
            .ok_or_else(|| ViewError::ViewNotFound(key.to_string()))
    }

    /// All views in creation order
    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    /// Views of one type in creation order
    pub fn of_type(&self, view_type: ViewType) -> impl Iterator<Item = &View> {
        self.views
            .iter()
            .filter(move |v| v.view_type() == view_type)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Copies layout from views in `source` that share key and type with ours
    ///
    /// Returns the number of views that matched.
    pub fn copy_layout_information_from(&mut self, source: &ViewSet) -> usize {
        let mut matched = 0;
        for view in &mut self.views {
            let counterpart = source
                .get_view(&view.key)
                .filter(|other| other.view_type() == view.view_type());
            if let Some(other) = counterpart {
                view.copy_layout_information_from(other);
                matched += 1;
            }
        }
        log::debug!("copied layout for {} view(s)", matched);
        matched
    }
}

impl<'a> IntoIterator for &'a ViewSet {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

fn require_kind(
    model: &Model,
    id: &ItemId,
    expected: &'static str,
    accepts: impl Fn(&ElementKind) -> bool,
) -> Result<(), ViewError> {
    let element = model.element(id)?;
    if !accepts(&element.kind) {
        return Err(ViewError::InvalidAnchor {
            id: id.clone(),
            expected,
            actual: element.kind.label(),
        });
    }
    Ok(())
}
