//! Map surface model.
//!
//! Owns the rendered feature layer, the measurement sketch layer, the
//! measurement tooltip, the mounted tool with its gesture listeners, and the
//! camera request queue. The host draws from a [`SurfaceSnapshot`] and feeds
//! pointer and key input back in; nothing here touches a real canvas.
//!
//! The surface is created once per screen and torn down with
//! [`MapSurface::close`] (also run on drop), which unmounts the tool and
//! releases every listener.

mod camera;
mod input;
mod listeners;
mod overlay;
mod sketch;

pub use camera::{CameraRequest, View, fit_view, resolution_for_zoom};
pub use input::{Cursor, Key, PointerEvent, PointerKind, SurfaceEvent};
pub use listeners::{GestureEvent, ListenerKey, ListenerRegistry};
pub use overlay::{MeasureTooltip, TooltipState};
pub use sketch::Sketch;

use geoscribe_geo::{Coord, Extent, Geometry, GeometryCodec, GeometryType, MeasurementEngine};
use serde::Serialize;

use crate::config::{AppConfig, CameraConfig};
use crate::constants::{DEFAULT_VIEWPORT, hit};
use crate::mode::Tool;
use crate::model::{Feature, FeatureId, PendingDraft};
use crate::style::{self, StyleDescriptor};

/// A feature as drawn on the features layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFeature {
    pub id: FeatureId,
    pub name: String,
    pub geometry: Geometry,
    pub style: StyleDescriptor,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSnapshot<'a> {
    pub tool: Option<Tool>,
    pub cursor: Cursor,
    pub view: View,
    pub features: &'a [RenderedFeature],
    pub draft: Option<&'a Geometry>,
    pub draft_style: StyleDescriptor,
    pub sketch_layer: &'a [Geometry],
    pub active_sketch: Option<Geometry>,
    pub sketch_style: StyleDescriptor,
    pub tooltip: &'a MeasureTooltip,
}

#[derive(Debug)]
struct MountedTool {
    tool: Tool,
    keys: Vec<ListenerKey>,
}

#[derive(Debug, Clone)]
struct VertexDrag {
    id: FeatureId,
    index: usize,
    original: Geometry,
    current: Geometry,
}

#[derive(Debug)]
pub struct MapSurface {
    codec: GeometryCodec,
    engine: MeasurementEngine,
    camera: CameraConfig,
    viewport: (f64, f64),
    view: View,
    camera_requests: Vec<CameraRequest>,

    features: Vec<RenderedFeature>,
    draft: Option<Geometry>,
    sketch_layer: Vec<Geometry>,
    tooltip: MeasureTooltip,

    listeners: ListenerRegistry,
    mounted: Option<MountedTool>,
    sketch: Option<Sketch>,
    drag: Option<VertexDrag>,
    selected: Option<FeatureId>,
    closed: bool,
}

impl MapSurface {
    pub fn new(config: &AppConfig) -> Self {
        let codec = GeometryCodec::new();
        let initial = &config.initial_view;
        let center = codec
            .lon_lat_to_rendering(initial.lon, initial.lat)
            .last_vertex()
            .unwrap_or(Coord { x: 0.0, y: 0.0 });

        Self {
            codec,
            engine: MeasurementEngine::new(),
            camera: config.camera,
            viewport: DEFAULT_VIEWPORT,
            view: View::new(center, initial.zoom),
            camera_requests: Vec::new(),
            features: Vec::new(),
            draft: None,
            sketch_layer: Vec::new(),
            tooltip: MeasureTooltip::default(),
            listeners: ListenerRegistry::new(),
            mounted: None,
            sketch: None,
            drag: None,
            selected: None,
            closed: false,
        }
    }

    // =========================================================================
    // Camera
    // =========================================================================

    pub fn view(&self) -> View {
        self.view
    }

    /// Record a view change made by the user (pan/zoom in the host).
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.viewport = (width, height);
        }
    }

    /// Frame an extent with the configured padding and zoom ceiling.
    pub fn frame(&mut self, extent: Extent) {
        let target = fit_view(
            &extent,
            self.viewport,
            self.camera.fit_padding_px,
            self.camera.fit_max_zoom,
        );
        self.push_camera(CameraRequest::Fit {
            extent,
            padding: self.camera.fit_padding_px,
            max_zoom: self.camera.fit_max_zoom,
            duration_ms: self.camera.fit_duration_ms,
            target,
        });
    }

    /// Fly to a geographic location.
    pub fn go_to(&mut self, lon: f64, lat: f64) {
        let Some(center) = self.codec.lon_lat_to_rendering(lon, lat).last_vertex() else {
            return;
        };
        self.push_camera(CameraRequest::Animate {
            target: View::new(center, self.camera.go_to_zoom),
            duration_ms: self.camera.go_to_duration_ms,
        });
    }

    pub fn camera_requests(&self) -> &[CameraRequest] {
        &self.camera_requests
    }

    pub fn take_camera_requests(&mut self) -> Vec<CameraRequest> {
        std::mem::take(&mut self.camera_requests)
    }

    fn push_camera(&mut self, request: CameraRequest) {
        if self.closed {
            return;
        }
        log::debug!("🎥 Camera request: {:?}", request);
        self.view = request.target();
        self.camera_requests.push(request);
    }

    // =========================================================================
    // Layers
    // =========================================================================

    /// Rebuild the features layer from the visible set.
    pub fn render(
        &mut self,
        features: &[&Feature],
        selected: Option<&FeatureId>,
        hovered: Option<&FeatureId>,
    ) {
        self.features = features
            .iter()
            .map(|f| RenderedFeature {
                id: f.id.clone(),
                name: f.name.clone(),
                geometry: f.geometry.clone(),
                style: style::feature_style(f, selected, hovered),
            })
            .collect();

        if let Some(drag) = &self.drag {
            if let Some(rendered) = self.features.iter_mut().find(|f| f.id == drag.id) {
                rendered.geometry = drag.current.clone();
            }
        }
    }

    /// Recompute styles only, leaving geometries as they are drawn.
    pub fn restyle(&mut self, selected: Option<&FeatureId>, hovered: Option<&FeatureId>) {
        for rendered in &mut self.features {
            rendered.style = style::style_for(&rendered.id, &rendered.name, selected, hovered);
        }
    }

    pub fn features(&self) -> &[RenderedFeature] {
        &self.features
    }

    pub fn rendered(&self, id: &FeatureId) -> Option<&RenderedFeature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn show_draft(&mut self, geometry: Geometry) {
        self.draft = Some(geometry);
    }

    pub fn clear_draft(&mut self) {
        self.draft = None;
    }

    pub fn draft(&self) -> Option<&Geometry> {
        self.draft.as_ref()
    }

    pub fn sketch_layer(&self) -> &[Geometry] {
        &self.sketch_layer
    }

    /// The sketch being drawn, cursor included.
    pub fn active_sketch(&self) -> Option<Geometry> {
        self.sketch.as_ref().map(Sketch::live_geometry)
    }

    pub fn tooltip(&self) -> &MeasureTooltip {
        &self.tooltip
    }

    pub fn cursor(&self) -> Cursor {
        match self.mounted_tool() {
            Some(tool) if tool.is_draw() => Cursor::Crosshair,
            _ => Cursor::Default,
        }
    }

    pub fn selected(&self) -> Option<&FeatureId> {
        self.selected.as_ref()
    }

    /// Mirror the application's selection into the select/modify tools.
    pub fn sync_selection(&mut self, id: Option<FeatureId>) {
        if self.drag.as_ref().is_some_and(|d| Some(&d.id) != id.as_ref()) {
            self.drag = None;
        }
        self.selected = id;
    }

    pub fn snapshot(&self) -> SurfaceSnapshot<'_> {
        SurfaceSnapshot {
            tool: self.mounted_tool(),
            cursor: self.cursor(),
            view: self.view,
            features: &self.features,
            draft: self.draft.as_ref(),
            draft_style: style::draft_style(),
            sketch_layer: &self.sketch_layer,
            active_sketch: self.active_sketch(),
            sketch_style: style::sketch_style(),
            tooltip: &self.tooltip,
        }
    }

    // =========================================================================
    // Tool lifecycle
    // =========================================================================

    pub fn mounted_tool(&self) -> Option<Tool> {
        self.mounted.as_ref().map(|m| m.tool)
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Mount `tool`, unmounting whatever was mounted before.
    ///
    /// Mounting the tool that is already mounted does nothing.
    pub fn mount(&mut self, tool: Tool) {
        if self.closed {
            log::warn!("Ignoring mount of {} tool on a closed surface", tool);
            return;
        }
        if self.mounted_tool() == Some(tool) {
            return;
        }
        self.unmount();

        let events: &[GestureEvent] = match tool {
            Tool::Select => &[GestureEvent::Select],
            Tool::Draw(_) => &[GestureEvent::DrawEnd],
            Tool::Modify => &[GestureEvent::ModifyEnd],
            Tool::Measure(_) => &[GestureEvent::DrawStart, GestureEvent::DrawEnd],
        };
        let keys = events.iter().map(|e| self.listeners.bind(*e)).collect();
        self.mounted = Some(MountedTool { tool, keys });
        log::debug!("🖱️ Mounted {} tool", tool);
    }

    /// Unmount the current tool and release every listener it bound.
    pub fn unmount(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        self.release_sketch();
        self.drag = None;
        for key in mounted.keys {
            self.listeners.unbind(key);
        }
        if matches!(mounted.tool, Tool::Measure(_)) {
            self.sketch_layer.clear();
            self.tooltip.hide();
        }
        log::debug!("Unmounted {} tool", mounted.tool);
    }

    /// Abandon the sketch in progress, keeping the tool mounted.
    pub fn cancel_sketch(&mut self) -> bool {
        if !self.release_sketch() {
            return false;
        }
        if matches!(self.mounted_tool(), Some(Tool::Measure(_))) {
            self.tooltip.hide();
        }
        log::debug!("Sketch cancelled");
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tear the surface down. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.unmount();
        let leaked = self.listeners.clear();
        if leaked > 0 {
            log::warn!("Released {} listeners still bound at close", leaked);
        }
        self.tooltip.hide();
        self.draft = None;
        self.sketch_layer.clear();
        self.camera_requests.clear();
        self.closed = true;
        log::debug!("Map surface closed");
    }

    fn release_sketch(&mut self) -> bool {
        let Some(sketch) = self.sketch.take() else {
            return false;
        };
        for key in sketch.change_listeners {
            self.listeners.unbind(key);
        }
        true
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<SurfaceEvent> {
        if self.closed {
            return Vec::new();
        }
        match self.mounted_tool() {
            Some(Tool::Select) => self.select_pointer(event),
            Some(Tool::Modify) => self.modify_pointer(event),
            Some(tool @ (Tool::Draw(_) | Tool::Measure(_))) => self.sketch_pointer(tool, event),
            None => Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: Key) -> Vec<SurfaceEvent> {
        match key {
            Key::Escape if self.cancel_sketch() => vec![SurfaceEvent::SketchCancelled],
            _ => Vec::new(),
        }
    }

    /// Top-most rendered feature within `tolerance` of `coord`.
    pub fn hit_test(&self, coord: Coord, tolerance: f64) -> Option<FeatureId> {
        self.features
            .iter()
            .rev()
            .find(|f| f.geometry.distance_to(coord) <= tolerance)
            .map(|f| f.id.clone())
    }

    fn select_pointer(&mut self, event: PointerEvent) -> Vec<SurfaceEvent> {
        if event.kind != PointerKind::Click {
            return Vec::new();
        }
        let tolerance = hit::FEATURE_TOLERANCE_PX * self.view.resolution();
        let picked = self.hit_test(event.coord, tolerance);
        if picked == self.selected {
            return Vec::new();
        }
        (0..self.listeners.count(GestureEvent::Select))
            .map(|_| SurfaceEvent::SelectionChanged(picked.clone()))
            .collect()
    }

    fn sketch_pointer(&mut self, tool: Tool, event: PointerEvent) -> Vec<SurfaceEvent> {
        let Some(geometry_type) = tool.sketch_type() else {
            return Vec::new();
        };
        let resolution = self.view.resolution();
        let duplicate = hit::DUPLICATE_VERTEX_PX * resolution;

        match event.kind {
            PointerKind::Click => {
                if self.sketch.is_none() {
                    self.start_sketch(geometry_type, event.coord);
                    if geometry_type == GeometryType::Point {
                        return self.finish_sketch(tool);
                    }
                    return Vec::new();
                }
                let Some(sketch) = self.sketch.as_mut() else {
                    return Vec::new();
                };
                if sketch.closes_ring(event.coord, hit::POLYGON_CLOSE_PX * resolution) {
                    return self.finish_sketch(tool);
                }
                if sketch.push(event.coord, duplicate) {
                    self.notify_sketch_change();
                }
                Vec::new()
            }
            PointerKind::DoubleClick => {
                let Some(sketch) = self.sketch.as_mut() else {
                    return Vec::new();
                };
                let changed = sketch.push(event.coord, duplicate);
                if sketch.can_finish() {
                    return self.finish_sketch(tool);
                }
                if changed {
                    self.notify_sketch_change();
                }
                Vec::new()
            }
            PointerKind::Move => {
                if let Some(sketch) = self.sketch.as_mut() {
                    sketch.cursor = Some(event.coord);
                    self.notify_sketch_change();
                }
                Vec::new()
            }
            PointerKind::DragStart | PointerKind::Drag | PointerKind::DragEnd => Vec::new(),
        }
    }

    fn start_sketch(&mut self, geometry_type: GeometryType, at: Coord) {
        let mut sketch = Sketch::new(geometry_type, at);

        // Measure tool drawstart: fresh sketch layer, per-sketch change
        // listener, tooltip prompt at the first vertex.
        for _ in 0..self.listeners.count(GestureEvent::DrawStart) {
            self.sketch_layer.clear();
            sketch
                .change_listeners
                .push(self.listeners.bind(GestureEvent::SketchChange));
            self.tooltip.start(at);
        }

        log::trace!("Sketch started at ({:.1}, {:.1})", at.x, at.y);
        self.sketch = Some(sketch);
    }

    fn notify_sketch_change(&mut self) {
        let Some(sketch) = &self.sketch else {
            return;
        };
        let listeners = self.listeners.count(GestureEvent::SketchChange);
        if listeners == 0 {
            return;
        }
        let geometry = sketch.live_geometry();
        let text = self.engine.format(&geometry).unwrap_or_default();
        let anchor = geometry.last_vertex();
        for _ in 0..listeners {
            self.tooltip.update(text.clone(), anchor);
        }
    }

    fn finish_sketch(&mut self, tool: Tool) -> Vec<SurfaceEvent> {
        let Some(sketch) = self.sketch.take() else {
            return Vec::new();
        };
        for key in &sketch.change_listeners {
            self.listeners.unbind(*key);
        }
        let Some(geometry) = sketch.finished_geometry() else {
            log::debug!("Sketch finished with too few vertices, discarded");
            return Vec::new();
        };

        let mut events = Vec::new();
        for _ in 0..self.listeners.count(GestureEvent::DrawEnd) {
            match tool {
                Tool::Draw(_) => match self.codec.to_persistence(&geometry) {
                    Ok(wkt) => {
                        log::debug!("✏️ Drawn {}: {}", geometry.geometry_type(), wkt);
                        self.draft = Some(geometry.clone());
                        events.push(SurfaceEvent::DrawCompleted(PendingDraft {
                            geometry: geometry.clone(),
                            wkt,
                        }));
                    }
                    Err(e) => log::error!("Drawn geometry could not be encoded: {}", e),
                },
                Tool::Measure(_) => {
                    self.sketch_layer.push(geometry.clone());
                    if let Some(measurement) = self.engine.measure(&geometry) {
                        self.tooltip
                            .pin(measurement.text.clone(), geometry.last_vertex());
                        log::debug!("📏 Measured {}", measurement.text);
                        events.push(SurfaceEvent::MeasurementCompleted(measurement));
                    }
                }
                Tool::Select | Tool::Modify => {}
            }
        }
        events
    }

    fn modify_pointer(&mut self, event: PointerEvent) -> Vec<SurfaceEvent> {
        match event.kind {
            PointerKind::DragStart => {
                self.start_drag(event.coord);
                Vec::new()
            }
            PointerKind::Drag => {
                self.move_drag(event.coord);
                Vec::new()
            }
            PointerKind::DragEnd => {
                self.move_drag(event.coord);
                self.finish_drag()
            }
            PointerKind::Click | PointerKind::DoubleClick | PointerKind::Move => Vec::new(),
        }
    }

    fn start_drag(&mut self, at: Coord) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        let Some(feature) = self.features.iter().find(|f| f.id == id) else {
            return;
        };
        let radius = hit::VERTEX_RADIUS_PX * self.view.resolution();
        let nearest = feature
            .geometry
            .editable_vertices()
            .into_iter()
            .enumerate()
            .map(|(index, vertex)| (index, sketch::distance(vertex, at)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((index, _)) = nearest {
            log::trace!("Dragging vertex {} of feature {}", index, id);
            self.drag = Some(VertexDrag {
                id,
                index,
                original: feature.geometry.clone(),
                current: feature.geometry.clone(),
            });
        }
    }

    fn move_drag(&mut self, to: Coord) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(moved) = drag.original.with_vertex(drag.index, to) else {
            return;
        };
        if let Some(rendered) = self.features.iter_mut().find(|f| f.id == drag.id) {
            rendered.geometry = moved.clone();
        }
        drag.current = moved;
    }

    fn finish_drag(&mut self) -> Vec<SurfaceEvent> {
        let Some(drag) = self.drag.take() else {
            return Vec::new();
        };
        if drag.current == drag.original {
            return Vec::new();
        }

        let mut events = Vec::new();
        for _ in 0..self.listeners.count(GestureEvent::ModifyEnd) {
            match self.codec.to_persistence(&drag.current) {
                Ok(wkt) => events.push(SurfaceEvent::FeatureModified {
                    id: drag.id.clone(),
                    wkt,
                }),
                Err(e) => log::error!("Modified geometry could not be encoded: {}", e),
            }
        }
        events
    }
}

impl Drop for MapSurface {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests;
