//! Wire types of the feature persistence API.

use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::model::FeatureId;

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// The payload of a successful envelope; `success: false` becomes a
    /// domain error carrying the envelope's message.
    pub fn into_data(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::domain(self.message))
        }
    }
}

/// A stored feature as exchanged with the API (geographic WKT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub id: FeatureId,
    #[serde(default)]
    pub name: String,
    pub wkt_string: String,
    #[serde(rename = "type", default)]
    pub geometry_type: String,
}

/// Body of a create request; the API assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeature {
    pub name: String,
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub wkt_string: String,
}
