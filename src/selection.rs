//! Selection and hover state shared by the map and the list panel.
//!
//! Both views select through [`SelectionSync::select`], which keeps the
//! map surface's selection and camera in step with the state held here.
//! Features are referenced by id only; the store stays the owner.

use crate::model::{Feature, FeatureId};
use crate::store::FeatureStore;
use crate::style::Highlight;
use crate::surface::MapSurface;

#[derive(Debug, Clone, Default)]
pub struct SelectionSync {
    selected: Option<FeatureId>,
    editing: bool,
    hovered: Option<FeatureId>,
}

impl SelectionSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&FeatureId> {
        self.selected.as_ref()
    }

    pub fn selected_feature<'a>(&self, store: &'a FeatureStore) -> Option<&'a Feature> {
        self.selected.as_ref().and_then(|id| store.get(id))
    }

    pub fn hovered(&self) -> Option<&FeatureId> {
        self.hovered.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Select a feature (or nothing).
    ///
    /// A selected feature is framed by the camera once per call. Unknown ids
    /// are treated as "nothing". Moving the selection to another feature, or
    /// clearing it, switches editing off.
    pub fn select(&mut self, id: Option<FeatureId>, store: &FeatureStore, surface: &mut MapSurface) {
        let feature = match id {
            Some(ref id) => {
                let found = store.get(id);
                if found.is_none() {
                    log::warn!("Ignoring selection of unknown feature {}", id);
                }
                found
            }
            None => None,
        };

        match feature {
            Some(feature) => {
                if self.selected.as_ref() != Some(&feature.id) {
                    self.editing = false;
                }
                log::debug!("🎯 Selected feature {} '{}'", feature.id, feature.name);
                self.selected = Some(feature.id.clone());
                match feature.geometry.extent() {
                    Some(extent) => surface.frame(extent),
                    None => log::warn!("Feature {} has no extent to frame", feature.id),
                }
            }
            None => {
                if self.selected.is_some() {
                    log::debug!("🎯 Selection cleared");
                }
                self.selected = None;
                self.editing = false;
            }
        }

        surface.sync_selection(self.selected.clone());
    }

    pub fn clear(&mut self, surface: &mut MapSurface) {
        if self.selected.is_some() {
            log::debug!("🎯 Selection cleared");
        }
        self.selected = None;
        self.editing = false;
        surface.sync_selection(None);
    }

    /// Drop the selection if its feature no longer exists in the store.
    ///
    /// Returns `true` when the selection was cleared.
    pub fn prune(&mut self, store: &FeatureStore, surface: &mut MapSurface) -> bool {
        match &self.selected {
            Some(id) if !store.contains(id) => {
                self.clear(surface);
                true
            }
            _ => false,
        }
    }

    /// Set the hover key. Has no effect on the selection.
    ///
    /// Returns `true` if the key changed.
    pub fn hover(&mut self, id: Option<FeatureId>) -> bool {
        if self.hovered == id {
            return false;
        }
        self.hovered = id;
        true
    }

    /// Editing can only be switched on while something is selected.
    pub fn begin_edit(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.editing = true;
        true
    }

    pub fn end_edit(&mut self) {
        self.editing = false;
    }

    pub fn highlight(&self, id: &FeatureId) -> Highlight {
        Highlight::of(id, self.selected.as_ref(), self.hovered.as_ref())
    }
}
