//! Feature types shared by the store, the list panel and the map surface.

use std::fmt;

use geoscribe_geo::{DecodeError, Geometry, GeometryCodec, GeometryType};
use serde::{Deserialize, Serialize};

use crate::api::FeatureRecord;

/// Server-assigned feature identifier.
///
/// The persistence API hands out either numeric or textual ids, so both are
/// accepted and compared as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(i64),
    Text(String),
}

impl FeatureId {
    /// JSON value used when the id is written into an export document.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FeatureId::Number(n) => serde_json::Value::from(*n),
            FeatureId::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{}", n),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        FeatureId::Number(value)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId::Text(value.to_string())
    }
}

/// A named geometry confirmed by the persistence API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Unique identifier, immutable once assigned
    pub id: FeatureId,
    /// Display name (may be empty)
    pub name: String,
    /// Geometry in the rendering reference system
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: FeatureId, name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id,
            name: name.into(),
            geometry,
        }
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry.geometry_type()
    }

    /// Decode a wire record into a feature in the rendering reference system.
    ///
    /// The geometry is taken from the WKT; a declared `type` that disagrees
    /// with it is logged and otherwise ignored.
    pub fn from_record(record: &FeatureRecord, codec: &GeometryCodec) -> Result<Self, DecodeError> {
        let geometry = codec.to_rendering(&record.wkt_string)?;

        match record.geometry_type.parse::<GeometryType>() {
            Ok(declared) if declared != geometry.geometry_type() => {
                log::warn!(
                    "Feature {} declares type {} but its WKT is a {}",
                    record.id,
                    declared,
                    geometry.geometry_type()
                );
            }
            Err(_) => {
                log::warn!(
                    "Feature {} has unknown type '{}'",
                    record.id,
                    record.geometry_type
                );
            }
            Ok(_) => {}
        }

        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            geometry,
        })
    }

    /// Encode this feature as a wire record in the persistence reference system.
    pub fn to_record(&self, codec: &GeometryCodec) -> Result<FeatureRecord, DecodeError> {
        Ok(FeatureRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            wkt_string: codec.to_persistence(&self.geometry)?,
            geometry_type: self.geometry_type().name().to_string(),
        })
    }

    /// Label shown in the list panel: the name, or the id when unnamed.
    pub fn label(&self) -> String {
        if self.name.trim().is_empty() {
            format!("ID: {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// A completed draw gesture waiting for the user to name it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingDraft {
    /// Geometry in the rendering reference system (shown on the map)
    pub geometry: Geometry,
    /// The same geometry as persistence WKT, ready to send
    pub wkt: String,
}

impl PendingDraft {
    pub fn geometry_type(&self) -> GeometryType {
        self.geometry.geometry_type()
    }
}
