//! In-memory feature store.
//!
//! The store is the single source of truth that both the map surface and the
//! list panel render from. It is only mutated after the persistence API has
//! confirmed a change.

use crate::model::{Feature, FeatureId, VisibilityFilter};

/// Ordered collection of confirmed features.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents, e.g. after the initial load.
    pub fn load(&mut self, features: Vec<Feature>) {
        log::debug!("Store loaded with {} features", features.len());
        self.features = features;
    }

    /// Append a feature. An existing entry with the same id is replaced in place.
    pub fn add(&mut self, feature: Feature) {
        if let Some(existing) = self.features.iter_mut().find(|f| f.id == feature.id) {
            log::warn!("Feature {} added twice, replacing existing entry", feature.id);
            *existing = feature;
        } else {
            self.features.push(feature);
        }
    }

    /// Replace the feature with `id`, keeping its position.
    ///
    /// Returns `false` when no such feature exists.
    pub fn replace(&mut self, id: &FeatureId, feature: Feature) -> bool {
        match self.features.iter_mut().find(|f| &f.id == id) {
            Some(slot) => {
                *slot = feature;
                true
            }
            None => false,
        }
    }

    /// Remove and return the feature with `id`.
    pub fn remove(&mut self, id: &FeatureId) -> Option<Feature> {
        let index = self.features.iter().position(|f| &f.id == id)?;
        Some(self.features.remove(index))
    }

    pub fn get(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.get(id).is_some()
    }

    /// Features passing `filter`, in insertion order.
    pub fn visible(&self, filter: &VisibilityFilter) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| filter.is_visible(f.geometry_type()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
