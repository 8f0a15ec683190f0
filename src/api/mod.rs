//! Client side of the feature persistence API.
//!
//! [`FeatureApi`] is the seam between the engine and the network: the
//! browser build talks HTTP through [`HttpFeatureApi`], tests plug in an
//! in-memory implementation.

mod error;
mod http;
mod types;

use std::future::Future;

pub use error::ApiError;
pub use http::HttpFeatureApi;
pub use types::{Envelope, FeatureRecord, NewFeature};

use crate::model::FeatureId;

/// CRUD operations on stored features.
///
/// Futures are not required to be `Send`; everything runs on the UI thread.
pub trait FeatureApi {
    /// `GET /api/features`
    fn list(&self) -> impl Future<Output = Result<Vec<FeatureRecord>, ApiError>>;

    /// `POST /api/features`, returning the stored record with its new id
    fn create(&self, feature: &NewFeature) -> impl Future<Output = Result<FeatureRecord, ApiError>>;

    /// `PUT /api/features/{id}`
    fn update(&self, record: &FeatureRecord) -> impl Future<Output = Result<FeatureRecord, ApiError>>;

    /// `DELETE /api/features/{id}`
    fn delete(&self, id: &FeatureId) -> impl Future<Output = Result<(), ApiError>>;
}
