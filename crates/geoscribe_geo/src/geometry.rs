//! Geometry model shared by the codec, the measurement engine and the map.
//!
//! A [`Geometry`] carries no reference system of its own; callers know
//! whether they hold rendering (meters) or persistence (degrees)
//! coordinates, and only [`crate::codec::GeometryCodec`] crosses between
//! the two.

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, Contains, Coord, CoordsIter, EuclideanDistance, LineString, MapCoords, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Geometry kinds a feature may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl GeometryType {
    /// Name used on the wire and in the export document.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
        }
    }

    /// All geometry types in list display order.
    pub fn all() -> &'static [GeometryType] {
        &[
            GeometryType::Point,
            GeometryType::LineString,
            GeometryType::Polygon,
        ]
    }

    /// Minimum number of distinct vertices a finished geometry needs.
    pub fn min_vertices(&self) -> usize {
        match self {
            GeometryType::Point => 1,
            GeometryType::LineString => 2,
            GeometryType::Polygon => 3,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(GeometryType::Point),
            "LineString" => Ok(GeometryType::LineString),
            "Polygon" => Ok(GeometryType::Polygon),
            other => Err(DecodeError::unknown_geometry_type(other)),
        }
    }
}

/// Axis-aligned extent of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Coord {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// True when the extent collapses to a single location.
    pub fn is_point(&self) -> bool {
        self.width() == 0.0 && self.height() == 0.0
    }
}

impl From<geo::Rect<f64>> for Extent {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

/// A point, line string or polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "geometry")]
pub enum Geometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point(Point::new(x, y))
    }

    pub fn line_string(coords: Vec<Coord>) -> Self {
        Geometry::LineString(LineString::new(coords))
    }

    /// Polygon from an exterior ring; the ring is closed if it is not already.
    pub fn polygon(exterior: Vec<Coord>) -> Self {
        Geometry::Polygon(Polygon::new(LineString::new(exterior), Vec::new()))
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// Apply `f` to every coordinate, keeping the shape.
    pub fn map_coords(&self, f: impl Fn(Coord) -> Coord + Copy) -> Geometry {
        match self {
            Geometry::Point(p) => Geometry::Point(p.map_coords(f)),
            Geometry::LineString(ls) => Geometry::LineString(ls.map_coords(f)),
            Geometry::Polygon(poly) => Geometry::Polygon(poly.map_coords(f)),
        }
    }

    /// Every stored coordinate, ring closing coordinates included.
    pub fn coords(&self) -> Vec<Coord> {
        match self {
            Geometry::Point(p) => vec![p.0],
            Geometry::LineString(ls) => ls.coords_iter().collect(),
            Geometry::Polygon(poly) => poly.coords_iter().collect(),
        }
    }

    /// First non-finite coordinate component, if any.
    pub fn first_non_finite(&self) -> Option<f64> {
        self.coords()
            .into_iter()
            .flat_map(|c| [c.x, c.y])
            .find(|v| !v.is_finite())
    }

    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(p) => Some(p.bounding_rect().into()),
            Geometry::LineString(ls) => ls.bounding_rect().map(Extent::from),
            Geometry::Polygon(poly) => poly.bounding_rect().map(Extent::from),
        }
    }

    /// Vertices a user can move: the exterior ring without its closing
    /// coordinate for polygons.
    pub fn editable_vertices(&self) -> Vec<Coord> {
        match self {
            Geometry::Point(p) => vec![p.0],
            Geometry::LineString(ls) => ls.0.clone(),
            Geometry::Polygon(poly) => {
                let ring = &poly.exterior().0;
                let open_len = if ring.len() > 1 && ring.first() == ring.last() {
                    ring.len() - 1
                } else {
                    ring.len()
                };
                ring[..open_len].to_vec()
            }
        }
    }

    /// Last vertex placed, used to anchor the measurement tooltip.
    pub fn last_vertex(&self) -> Option<Coord> {
        self.editable_vertices().last().copied()
    }

    /// Copy with the editable vertex at `index` moved to `to`.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn with_vertex(&self, index: usize, to: Coord) -> Option<Geometry> {
        match self {
            Geometry::Point(_) => (index == 0).then(|| Geometry::Point(Point::from(to))),
            Geometry::LineString(ls) => {
                let mut coords = ls.0.clone();
                *coords.get_mut(index)? = to;
                Some(Geometry::LineString(LineString::new(coords)))
            }
            Geometry::Polygon(poly) => {
                let mut ring = self.editable_vertices();
                *ring.get_mut(index)? = to;
                Some(Geometry::Polygon(Polygon::new(
                    LineString::new(ring),
                    poly.interiors().to_vec(),
                )))
            }
        }
    }

    /// Planar distance from `coord` to the geometry; zero inside polygons.
    pub fn distance_to(&self, coord: Coord) -> f64 {
        let point = Point::from(coord);
        match self {
            Geometry::Point(p) => point.euclidean_distance(p),
            Geometry::LineString(ls) => point.euclidean_distance(ls),
            Geometry::Polygon(poly) => {
                if poly.contains(&point) {
                    0.0
                } else {
                    point.euclidean_distance(poly.exterior())
                }
            }
        }
    }

    /// Coordinate-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Geometry, tolerance: f64) -> bool {
        if self.geometry_type() != other.geometry_type() {
            return false;
        }
        let a = self.coords();
        let b = other.coords();
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|(p, q)| {
                (p.x - q.x).abs() <= tolerance && (p.y - q.y).abs() <= tolerance
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::polygon(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 0.0, y: 10.0 },
        ])
    }

    #[test]
    fn test_geometry_type_parse() {
        assert_eq!("Polygon".parse::<GeometryType>().unwrap(), GeometryType::Polygon);
        let err = "Circle".parse::<GeometryType>().unwrap_err();
        assert!(err.to_string().contains("Circle"));
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let coords = square().coords();
        assert_eq!(coords.len(), 5);
        assert_eq!(coords.first(), coords.last());
        assert_eq!(square().editable_vertices().len(), 4);
    }

    #[test]
    fn test_extent() {
        let extent = square().extent().unwrap();
        assert_eq!(extent, Extent::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(extent.center(), Coord { x: 5.0, y: 5.0 });
        assert!(Geometry::point(3.0, 4.0).extent().unwrap().is_point());
    }

    #[test]
    fn test_with_vertex_moves_polygon_corner() {
        let moved = square().with_vertex(0, Coord { x: -5.0, y: -5.0 }).unwrap();
        let coords = moved.coords();
        assert_eq!(coords[0], Coord { x: -5.0, y: -5.0 });
        // The closing coordinate follows the first vertex.
        assert_eq!(coords[4], Coord { x: -5.0, y: -5.0 });
        assert!(square().with_vertex(9, Coord { x: 0.0, y: 0.0 }).is_none());
    }

    #[test]
    fn test_distance_to() {
        assert_eq!(square().distance_to(Coord { x: 5.0, y: 5.0 }), 0.0);
        assert!((square().distance_to(Coord { x: 15.0, y: 5.0 }) - 5.0).abs() < 1e-9);
        let line = Geometry::line_string(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 0.0 }]);
        assert!((line.distance_to(Coord { x: 5.0, y: 3.0 }) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_vertex() {
        assert_eq!(square().last_vertex(), Some(Coord { x: 0.0, y: 10.0 }));
        assert_eq!(Geometry::point(1.0, 2.0).last_vertex(), Some(Coord { x: 1.0, y: 2.0 }));
    }
}
