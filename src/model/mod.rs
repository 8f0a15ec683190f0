//! Data models for the geoscribe application.

mod feature;
mod visibility;

pub use feature::{Feature, FeatureId, PendingDraft};
pub use visibility::VisibilityFilter;
