//! GeoJSON interchange document used for exports.
//!
//! Independent from the WKT persistence format: the two encodings share
//! only the geographic reference system.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;

/// Top-level `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionTag,
    pub features: Vec<GeoJsonFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            kind: CollectionTag::FeatureCollection,
            features,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    Feature,
}

/// One exported feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: FeatureTag,
    /// Server-assigned id, kept as number or string.
    pub id: serde_json::Value,
    pub geometry: GeoJsonGeometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub name: String,
}

/// Geometry object; coordinates are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

fn position(c: &Coord) -> [f64; 2] {
    [c.x, c.y]
}

impl From<&Geometry> for GeoJsonGeometry {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(p) => GeoJsonGeometry::Point {
                coordinates: position(&p.0),
            },
            Geometry::LineString(ls) => GeoJsonGeometry::LineString {
                coordinates: ls.0.iter().map(position).collect(),
            },
            Geometry::Polygon(poly) => {
                let mut rings = vec![poly.exterior().0.iter().map(position).collect()];
                rings.extend(
                    poly.interiors()
                        .iter()
                        .map(|ring| ring.0.iter().map(position).collect()),
                );
                GeoJsonGeometry::Polygon { coordinates: rings }
            }
        }
    }
}
