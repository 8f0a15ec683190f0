//! Per-geometry-type visibility toggles driven by the legend.

use geoscribe_geo::GeometryType;
use serde::{Deserialize, Serialize};

/// Which geometry types are currently shown on the map and in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFilter {
    pub point: bool,
    pub line_string: bool,
    pub polygon: bool,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            point: true,
            line_string: true,
            polygon: true,
        }
    }
}

impl VisibilityFilter {
    pub fn is_visible(&self, geometry_type: GeometryType) -> bool {
        match geometry_type {
            GeometryType::Point => self.point,
            GeometryType::LineString => self.line_string,
            GeometryType::Polygon => self.polygon,
        }
    }

    pub fn set(&mut self, geometry_type: GeometryType, visible: bool) {
        let slot = match geometry_type {
            GeometryType::Point => &mut self.point,
            GeometryType::LineString => &mut self.line_string,
            GeometryType::Polygon => &mut self.polygon,
        };
        *slot = visible;
    }

    /// Flip one type and return its new visibility.
    pub fn toggle(&mut self, geometry_type: GeometryType) -> bool {
        let visible = !self.is_visible(geometry_type);
        self.set(geometry_type, visible);
        visible
    }
}
