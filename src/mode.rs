//! Interaction mode state machine.
//!
//! The controller owns the [`InteractionMode`]; the orthogonal editing flag
//! lives in [`SelectionSync`]. After every transition exactly one [`Tool`]
//! is mounted on the [`MapSurface`], derived from both.

use std::fmt;

use geoscribe_geo::{GeometryType, MeasurementKind};
use serde::Serialize;

use crate::model::FeatureId;
use crate::selection::SelectionSync;
use crate::store::FeatureStore;
use crate::surface::MapSurface;

/// Shape drawn by a draw tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DrawKind {
    Point,
    Line,
    Polygon,
}

impl DrawKind {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            DrawKind::Point => GeometryType::Point,
            DrawKind::Line => GeometryType::LineString,
            DrawKind::Polygon => GeometryType::Polygon,
        }
    }

    pub fn all() -> &'static [DrawKind] {
        &[DrawKind::Point, DrawKind::Line, DrawKind::Polygon]
    }
}

/// Quantity measured by a measure tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeasureKind {
    Length,
    Area,
}

impl MeasureKind {
    /// Sketch shape used to measure this quantity.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            MeasureKind::Length => GeometryType::LineString,
            MeasureKind::Area => GeometryType::Polygon,
        }
    }

    pub fn measurement_kind(&self) -> MeasurementKind {
        match self {
            MeasureKind::Length => MeasurementKind::Length,
            MeasureKind::Area => MeasurementKind::Area,
        }
    }
}

/// Draw and measure modes are one enum, so they can never both be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InteractionMode {
    #[default]
    None,
    Draw(DrawKind),
    Measure(MeasureKind),
}

impl InteractionMode {
    pub fn draw_kind(&self) -> Option<DrawKind> {
        match self {
            InteractionMode::Draw(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn measure_kind(&self) -> Option<MeasureKind> {
        match self {
            InteractionMode::Measure(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, InteractionMode::None)
    }
}

/// The interaction mounted on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tool {
    Select,
    Draw(DrawKind),
    Modify,
    Measure(MeasureKind),
}

impl Tool {
    /// The tool a mode/editing combination calls for.
    pub fn for_state(mode: InteractionMode, editing: bool) -> Self {
        match mode {
            InteractionMode::Draw(kind) => Tool::Draw(kind),
            InteractionMode::Measure(kind) => Tool::Measure(kind),
            InteractionMode::None if editing => Tool::Modify,
            InteractionMode::None => Tool::Select,
        }
    }

    /// Geometry type sketched by this tool, if it sketches.
    pub fn sketch_type(&self) -> Option<GeometryType> {
        match self {
            Tool::Draw(kind) => Some(kind.geometry_type()),
            Tool::Measure(kind) => Some(kind.geometry_type()),
            Tool::Select | Tool::Modify => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Tool::Draw(_))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Select => f.write_str("select"),
            Tool::Draw(kind) => write!(f, "draw-{}", kind.geometry_type()),
            Tool::Modify => f.write_str("modify"),
            Tool::Measure(kind) => write!(f, "measure-{:?}", kind),
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Drives mode transitions and keeps the mounted tool in step with them.
#[derive(Debug, Default)]
pub struct ModeController {
    mode: InteractionMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Tool that should be mounted for the current state.
    pub fn active_tool(&self, selection: &SelectionSync) -> Tool {
        Tool::for_state(self.mode, selection.is_editing())
    }

    /// Enter a draw mode. Clears measure mode, selection and editing.
    pub fn select_draw(
        &mut self,
        kind: DrawKind,
        selection: &mut SelectionSync,
        surface: &mut MapSurface,
    ) {
        selection.clear(surface);
        self.transition(InteractionMode::Draw(kind), selection, surface);
    }

    /// Enter a measure mode, or leave it when it is already active.
    /// Clears draw mode, selection and editing either way.
    pub fn toggle_measure(
        &mut self,
        kind: MeasureKind,
        selection: &mut SelectionSync,
        surface: &mut MapSurface,
    ) {
        let next = if self.mode == InteractionMode::Measure(kind) {
            InteractionMode::None
        } else {
            InteractionMode::Measure(kind)
        };
        selection.clear(surface);
        self.transition(next, selection, surface);
    }

    /// Tear down any draw or measure tool and return to selecting.
    pub fn stop(&mut self, selection: &SelectionSync, surface: &mut MapSurface) {
        self.transition(InteractionMode::None, selection, surface);
    }

    /// Escape: abandon the sketch in progress but keep the tool mounted.
    ///
    /// Returns `true` when a sketch was actually cancelled.
    pub fn cancel_gesture(&self, surface: &mut MapSurface) -> bool {
        if self.mode.is_none() {
            return false;
        }
        surface.cancel_sketch()
    }

    /// Switch editing on for the current selection.
    ///
    /// Refused while drawing or measuring, or when nothing is selected.
    pub fn begin_edit(&mut self, selection: &mut SelectionSync, surface: &mut MapSurface) -> bool {
        if !self.mode.is_none() || !selection.begin_edit() {
            log::debug!("Edit refused: mode {:?}, selection {:?}", self.mode, selection.selected());
            return false;
        }
        self.sync(selection, surface);
        true
    }

    pub fn end_edit(&mut self, selection: &mut SelectionSync, surface: &mut MapSurface) {
        selection.end_edit();
        self.sync(selection, surface);
    }

    /// Select a feature picked from the list panel.
    ///
    /// A draw or measure tool is stopped first so that a selection only ever
    /// exists alongside the select or modify tool.
    pub fn select_feature(
        &mut self,
        id: FeatureId,
        selection: &mut SelectionSync,
        store: &FeatureStore,
        surface: &mut MapSurface,
    ) {
        if !self.mode.is_none() {
            self.mode = InteractionMode::None;
            log::debug!("🔧 Mode -> None (list selection)");
        }
        selection.select(Some(id), store, surface);
        self.sync(selection, surface);
    }

    /// Apply a selection reported by the map's select tool.
    pub fn apply_map_selection(
        &mut self,
        id: Option<FeatureId>,
        selection: &mut SelectionSync,
        store: &FeatureStore,
        surface: &mut MapSurface,
    ) {
        selection.select(id, store, surface);
        self.sync(selection, surface);
    }

    /// Clear the selection (and with it editing).
    pub fn deselect(&mut self, selection: &mut SelectionSync, surface: &mut MapSurface) {
        selection.clear(surface);
        self.sync(selection, surface);
    }

    /// Mount the tool for the current state. Idempotent.
    pub fn sync(&self, selection: &SelectionSync, surface: &mut MapSurface) {
        surface.mount(self.active_tool(selection));
    }

    fn transition(
        &mut self,
        next: InteractionMode,
        selection: &SelectionSync,
        surface: &mut MapSurface,
    ) {
        if next != self.mode {
            log::debug!("🔧 Mode {:?} -> {:?}", self.mode, next);
            self.mode = next;
        }
        self.sync(selection, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_for_state() {
        assert_eq!(Tool::for_state(InteractionMode::None, false), Tool::Select);
        assert_eq!(Tool::for_state(InteractionMode::None, true), Tool::Modify);
        assert_eq!(
            Tool::for_state(InteractionMode::Draw(DrawKind::Line), false),
            Tool::Draw(DrawKind::Line)
        );
        assert_eq!(
            Tool::for_state(InteractionMode::Measure(MeasureKind::Area), false),
            Tool::Measure(MeasureKind::Area)
        );
    }

    #[test]
    fn test_sketch_types() {
        assert_eq!(Tool::Draw(DrawKind::Point).sketch_type(), Some(GeometryType::Point));
        assert_eq!(
            Tool::Measure(MeasureKind::Length).sketch_type(),
            Some(GeometryType::LineString)
        );
        assert_eq!(Tool::Modify.sketch_type(), None);
    }
}
