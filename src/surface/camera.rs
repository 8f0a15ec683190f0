//! Camera view math and the requests handed to the host for animation.

use geoscribe_geo::{Coord, Extent};
use serde::Serialize;

use crate::constants::{MAX_ZOOM, MIN_ZOOM, RESOLUTION_AT_ZOOM_0};

/// Map view in rendering coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct View {
    pub center: Coord,
    pub zoom: f64,
}

impl View {
    pub fn new(center: Coord, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Meters per screen pixel at this zoom.
    pub fn resolution(&self) -> f64 {
        resolution_for_zoom(self.zoom)
    }
}

pub fn resolution_for_zoom(zoom: f64) -> f64 {
    RESOLUTION_AT_ZOOM_0 / 2f64.powf(zoom)
}

pub fn zoom_for_resolution(resolution: f64) -> f64 {
    (RESOLUTION_AT_ZOOM_0 / resolution).log2()
}

/// Camera movement queued for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CameraRequest {
    /// Frame an extent with padding, never zooming past `max_zoom`.
    #[serde(rename_all = "camelCase")]
    Fit {
        extent: Extent,
        padding: f64,
        max_zoom: f64,
        duration_ms: u32,
        target: View,
    },
    /// Fly to a view.
    #[serde(rename_all = "camelCase")]
    Animate { target: View, duration_ms: u32 },
}

impl CameraRequest {
    pub fn target(&self) -> View {
        match self {
            CameraRequest::Fit { target, .. } | CameraRequest::Animate { target, .. } => *target,
        }
    }
}

/// View that shows `extent` inside a viewport shrunk by `padding` on every
/// side. Degenerate extents (a single point) zoom straight to `max_zoom`.
pub fn fit_view(extent: &Extent, viewport: (f64, f64), padding: f64, max_zoom: f64) -> View {
    let available_w = (viewport.0 - 2.0 * padding).max(1.0);
    let available_h = (viewport.1 - 2.0 * padding).max(1.0);

    let resolution = (extent.width() / available_w).max(extent.height() / available_h);
    let zoom = if resolution > 0.0 {
        zoom_for_resolution(resolution).min(max_zoom)
    } else {
        max_zoom
    };

    View::new(extent.center(), zoom)
}
