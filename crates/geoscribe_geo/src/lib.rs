//! Geometry layer for geoscribe.
//!
//! Converts between the persistence reference system (geographic
//! longitude/latitude, EPSG:4326) and the rendering reference system
//! (Web Mercator meters, EPSG:3857), reads and writes well-known text,
//! writes GeoJSON export documents and measures sketch geometries.

pub mod codec;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod measure;
pub mod projection;
pub mod wkt;

pub use codec::{ExportEntry, GeometryCodec};
pub use error::{DecodeError, Result};
pub use geometry::{Extent, Geometry, GeometryType};
pub use measure::{Measurement, MeasurementEngine, MeasurementKind};
pub use projection::Crs;

/// Re-exported so callers share the same coordinate type.
pub use geo::Coord;
