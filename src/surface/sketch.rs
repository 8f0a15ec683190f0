//! In-progress sketch used by the draw and measure tools.

use geoscribe_geo::{Coord, Geometry, GeometryType};

use super::listeners::ListenerKey;

/// Vertices placed so far plus the rubber-band cursor.
#[derive(Debug, Clone)]
pub struct Sketch {
    pub geometry_type: GeometryType,
    pub vertices: Vec<Coord>,
    /// Pointer position following the last vertex
    pub cursor: Option<Coord>,
    /// Per-sketch change listeners, bound only while measuring
    pub change_listeners: Vec<ListenerKey>,
}

impl Sketch {
    pub fn new(geometry_type: GeometryType, first: Coord) -> Self {
        Self {
            geometry_type,
            vertices: vec![first],
            cursor: None,
            change_listeners: Vec::new(),
        }
    }

    /// Add a vertex unless it repeats the previous one within `tolerance`.
    pub fn push(&mut self, coord: Coord, tolerance: f64) -> bool {
        if let Some(last) = self.vertices.last() {
            if distance(*last, coord) <= tolerance {
                return false;
            }
        }
        self.vertices.push(coord);
        self.cursor = None;
        true
    }

    pub fn can_finish(&self) -> bool {
        self.vertices.len() >= self.geometry_type.min_vertices()
    }

    /// True when a click at `coord` closes the polygon ring.
    pub fn closes_ring(&self, coord: Coord, threshold: f64) -> bool {
        self.geometry_type == GeometryType::Polygon
            && self.can_finish()
            && self
                .vertices
                .first()
                .is_some_and(|first| distance(*first, coord) <= threshold)
    }

    /// Geometry as currently shown, cursor included.
    pub fn live_geometry(&self) -> Geometry {
        let mut coords = self.vertices.clone();
        if let Some(cursor) = self.cursor {
            coords.push(cursor);
        }
        build(self.geometry_type, coords)
    }

    /// Geometry made of the placed vertices only, if there are enough.
    pub fn finished_geometry(&self) -> Option<Geometry> {
        self.can_finish()
            .then(|| build(self.geometry_type, self.vertices.clone()))
    }
}

fn build(geometry_type: GeometryType, coords: Vec<Coord>) -> Geometry {
    match geometry_type {
        GeometryType::Point => {
            let c = coords.first().copied().unwrap_or(Coord { x: 0.0, y: 0.0 });
            Geometry::point(c.x, c.y)
        }
        GeometryType::LineString => Geometry::line_string(coords),
        GeometryType::Polygon => Geometry::polygon(coords),
    }
}

pub fn distance(a: Coord, b: Coord) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }

    #[test]
    fn test_duplicate_vertices_are_skipped() {
        let mut sketch = Sketch::new(GeometryType::LineString, c(0.0, 0.0));
        assert!(!sketch.push(c(0.5, 0.0), 1.0));
        assert!(sketch.push(c(10.0, 0.0), 1.0));
        assert_eq!(sketch.vertices.len(), 2);
    }

    #[test]
    fn test_line_needs_two_vertices() {
        let mut sketch = Sketch::new(GeometryType::LineString, c(0.0, 0.0));
        assert!(sketch.finished_geometry().is_none());

        sketch.push(c(10.0, 0.0), 0.0);
        let geometry = sketch.finished_geometry().unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::LineString);
    }

    #[test]
    fn test_polygon_closes_near_first_vertex() {
        let mut sketch = Sketch::new(GeometryType::Polygon, c(0.0, 0.0));
        sketch.push(c(100.0, 0.0), 0.0);
        assert!(!sketch.closes_ring(c(1.0, 1.0), 5.0));

        sketch.push(c(100.0, 100.0), 0.0);
        assert!(sketch.closes_ring(c(1.0, 1.0), 5.0));
        assert!(!sketch.closes_ring(c(50.0, 50.0), 5.0));
    }

    #[test]
    fn test_live_geometry_includes_cursor() {
        let mut sketch = Sketch::new(GeometryType::LineString, c(0.0, 0.0));
        sketch.cursor = Some(c(3.0, 4.0));

        let live = sketch.live_geometry();
        assert_eq!(live.last_vertex(), Some(c(3.0, 4.0)));
        assert!(sketch.finished_geometry().is_none());
    }
}
