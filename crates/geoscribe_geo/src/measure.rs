//! Live length and area readouts for measurement sketches.
//!
//! Sketches arrive in rendering coordinates. Distances and areas are
//! measured on a sphere of mean earth radius after unprojecting, so the
//! readout does not inherit Mercator scale distortion.

use geo::{Coord, HaversineLength, LineString, Polygon};
use serde::Serialize;

use crate::geometry::Geometry;
use crate::projection::{self, Crs};

/// Mean earth radius in meters; same value as geo's crate-private constant.
const MEAN_EARTH_RADIUS: f64 = 6371008.8;

/// Lengths from this many meters upwards are shown in kilometers.
pub const KILOMETER_THRESHOLD: f64 = 100.0;

/// Areas from this many square meters upwards are shown in km².
pub const SQUARE_KILOMETER_THRESHOLD: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeasurementKind {
    Length,
    Area,
}

/// Result of measuring one sketch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub kind: MeasurementKind,
    /// Meters for lengths, square meters for areas.
    pub value: f64,
    /// Human-readable text, e.g. `"1.25km"`.
    pub text: String,
}

/// Round to the two decimals shown, so the unit switch agrees with the text.
fn to_centi(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a length: `"99.99m"` below 100 m, `"0.10km"` from 100 m.
pub fn format_length(meters: f64) -> String {
    let meters = to_centi(meters);
    if meters < KILOMETER_THRESHOLD {
        format!("{:.2}m", meters)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

/// Format an area: `"9999.99m²"` below 10 000 m², `"0.01km²"` from there.
pub fn format_area(square_meters: f64) -> String {
    let square_meters = to_centi(square_meters);
    if square_meters < SQUARE_KILOMETER_THRESHOLD {
        format!("{:.2}m²", square_meters)
    } else {
        format!("{:.2}km²", square_meters / 1_000_000.0)
    }
}

/// Spherical excess of a lon/lat ring in square meters, signed by winding.
fn ring_area(ring: &LineString<f64>) -> f64 {
    let coords: &[Coord] = &ring.0;
    if coords.len() < 3 {
        return 0.0;
    }
    let sum: f64 = coords
        .iter()
        .zip(coords.iter().cycle().skip(1))
        .map(|(a, b)| {
            (b.x - a.x).to_radians() * (2.0 + a.y.to_radians().sin() + b.y.to_radians().sin())
        })
        .sum();
    sum * MEAN_EARTH_RADIUS * MEAN_EARTH_RADIUS / 2.0
}

/// Unsigned area of a lon/lat polygon, holes subtracted.
fn polygon_area(polygon: &Polygon<f64>) -> f64 {
    let holes: f64 = polygon.interiors().iter().map(|r| ring_area(r).abs()).sum();
    (ring_area(polygon.exterior()).abs() - holes).max(0.0)
}

/// Measures line and polygon sketches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementEngine;

impl MeasurementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Measure a rendering-space sketch. Points yield nothing.
    pub fn measure(&self, sketch: &Geometry) -> Option<Measurement> {
        let geographic = projection::transform(sketch, Crs::WebMercator, Crs::Geographic);
        match geographic {
            Geometry::LineString(ls) => {
                let value = ls.haversine_length();
                Some(Measurement {
                    kind: MeasurementKind::Length,
                    value,
                    text: format_length(value),
                })
            }
            Geometry::Polygon(poly) => {
                let value = polygon_area(&poly);
                Some(Measurement {
                    kind: MeasurementKind::Area,
                    value,
                    text: format_area(value),
                })
            }
            Geometry::Point(_) => None,
        }
    }

    /// Formatted readout for a sketch, or `None` for points.
    pub fn format(&self, sketch: &Geometry) -> Option<String> {
        self.measure(sketch).map(|m| m.text)
    }
}
