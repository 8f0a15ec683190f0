//! Spherical Web Mercator projection.
//!
//! Persistence and interchange use EPSG:4326 (degrees), the map renders in
//! EPSG:3857 (meters). Latitudes are clamped to the Mercator limit on the
//! way in, so geometries beyond ±85.05° do not round-trip exactly.

use std::f64::consts::PI;

use geo::Coord;

use crate::geometry::Geometry;

/// WGS84 semi-major axis used by Web Mercator.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world, in meters.
pub const HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Latitude at which the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Coordinate reference systems the application moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Longitude/latitude degrees (persistence and export).
    Geographic,
    /// Projected meters (rendering).
    WebMercator,
}

impl Crs {
    pub fn code(&self) -> &'static str {
        match self {
            Crs::Geographic => "EPSG:4326",
            Crs::WebMercator => "EPSG:3857",
        }
    }
}

/// Project a longitude/latitude pair to Web Mercator meters.
pub fn from_lon_lat(c: Coord) -> Coord {
    let lat = c.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * c.x.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    Coord {
        x,
        y: y.clamp(-HALF_SIZE, HALF_SIZE),
    }
}

/// Unproject Web Mercator meters to longitude/latitude degrees.
pub fn to_lon_lat(c: Coord) -> Coord {
    let lon = (c.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    Coord { x: lon, y: lat }
}

/// Reproject every coordinate of `geometry` from `from` to `to`.
pub fn transform(geometry: &Geometry, from: Crs, to: Crs) -> Geometry {
    match (from, to) {
        (Crs::Geographic, Crs::WebMercator) => geometry.map_coords(from_lon_lat),
        (Crs::WebMercator, Crs::Geographic) => geometry.map_coords(to_lon_lat),
        _ => geometry.clone(),
    }
}
