//! Canvas input and the events the surface reports back.

use geoscribe_geo::{Coord, Measurement};
use serde::{Deserialize, Serialize};

use crate::model::{FeatureId, PendingDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerKind {
    Click,
    DoubleClick,
    Move,
    DragStart,
    Drag,
    DragEnd,
}

/// Pointer input in rendering coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub coord: Coord,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            coord: Coord { x, y },
        }
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Click, x, y)
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self::new(PointerKind::DoubleClick, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// Outcome of a gesture, handed to the application to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The select tool picked a feature or cleared the pick
    SelectionChanged(Option<FeatureId>),
    /// A draw gesture finished and awaits a name
    DrawCompleted(PendingDraft),
    /// The edited feature's geometry was changed by a vertex drag
    FeatureModified { id: FeatureId, wkt: String },
    /// A measurement sketch finished
    MeasurementCompleted(Measurement),
    /// The in-progress sketch was abandoned
    SketchCancelled,
}
