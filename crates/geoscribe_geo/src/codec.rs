//! The single crossing point between rendering and persistence
//! coordinates. Nothing else in the workspace reprojects geometries.

use crate::error::{DecodeError, Result};
use crate::geojson::{FeatureCollection, FeatureTag, GeoJsonFeature, GeoJsonGeometry, Properties};
use crate::geometry::Geometry;
use crate::projection::{self, Crs};
use crate::wkt;

/// A feature handed to [`GeometryCodec::export_collection`].
#[derive(Debug, Clone, Copy)]
pub struct ExportEntry<'a> {
    pub id: &'a serde_json::Value,
    pub name: &'a str,
    /// Geometry in rendering coordinates.
    pub geometry: &'a Geometry,
}

/// Converts geometries between the rendering CRS and the persistence text
/// formats.
#[derive(Debug, Clone, Copy)]
pub struct GeometryCodec {
    rendering: Crs,
    persistence: Crs,
}

impl Default for GeometryCodec {
    fn default() -> Self {
        Self {
            rendering: Crs::WebMercator,
            persistence: Crs::Geographic,
        }
    }
}

impl GeometryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendering_crs(&self) -> Crs {
        self.rendering
    }

    pub fn persistence_crs(&self) -> Crs {
        self.persistence
    }

    /// Rendering geometry → geographic WKT.
    pub fn to_persistence(&self, geometry: &Geometry) -> Result<String> {
        let geographic = self.to_geographic(geometry)?;
        Ok(wkt::write(&geographic))
    }

    /// Geographic WKT → rendering geometry.
    pub fn to_rendering(&self, text: &str) -> Result<Geometry> {
        let geographic = wkt::read(text)?;
        Ok(projection::transform(
            &geographic,
            self.persistence,
            self.rendering,
        ))
    }

    /// Rendering coordinate of a longitude/latitude pair.
    pub fn lon_lat_to_rendering(&self, lon: f64, lat: f64) -> Geometry {
        projection::transform(&Geometry::point(lon, lat), Crs::Geographic, self.rendering)
    }

    /// Pretty-printed GeoJSON `FeatureCollection` in geographic coordinates.
    ///
    /// Fails on the first feature that cannot be converted; no partial
    /// document is produced.
    pub fn export_collection<'a>(
        &self,
        entries: impl IntoIterator<Item = ExportEntry<'a>>,
    ) -> Result<String> {
        let features = entries
            .into_iter()
            .map(|entry| {
                let geographic = self.to_geographic(entry.geometry)?;
                Ok(GeoJsonFeature {
                    kind: FeatureTag::Feature,
                    id: entry.id.clone(),
                    geometry: GeoJsonGeometry::from(&geographic),
                    properties: Properties {
                        name: entry.name.to_string(),
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "Exporting {} features as GeoJSON in {}",
            features.len(),
            self.persistence.code()
        );
        Ok(serde_json::to_string_pretty(&FeatureCollection::new(
            features,
        ))?)
    }

    fn to_geographic(&self, geometry: &Geometry) -> Result<Geometry> {
        if let Some(bad) = geometry.first_non_finite() {
            return Err(DecodeError::non_finite(bad));
        }
        Ok(projection::transform(
            geometry,
            self.rendering,
            self.persistence,
        ))
    }
}
