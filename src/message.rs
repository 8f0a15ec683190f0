//! Application message types for geoscribe.
//!
//! Every user action and every completed asynchronous call reaches the
//! application as a [`Message`], in the Elm architecture style. Messages are
//! grouped by the part of the screen (or the collaborator) they come from.

use geoscribe_geo::GeometryType;

use crate::api::ApiError;
use crate::geocode::GeocodeResult;
use crate::mode::{DrawKind, MeasureKind};
use crate::model::FeatureId;
use crate::persist::PersistOutcome;
use crate::surface::{Key, PointerEvent, View};

/// Messages that can be sent to update application state.
#[derive(Debug)]
pub enum Message {
    /// Toolbar buttons
    Tool(ToolMessage),
    /// Input on the map canvas
    Map(MapMessage),
    /// Naming dialog for a freshly drawn shape
    Draft(DraftMessage),
    /// Details panel of the selected feature
    Feature(FeatureMessage),
    /// Feature list panel and legend
    List(ListMessage),
    /// Place search box
    Geocode(GeocodeMessage),
    /// Export button and its download
    Export(ExportMessage),
    /// A persistence call finished
    Persisted(PersistOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMessage {
    /// Draw tool picked
    Draw(DrawKind),
    /// Measure tool picked (a second press switches it off)
    Measure(MeasureKind),
    /// Stop button
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapMessage {
    /// Pointer input in rendering coordinates
    Pointer(PointerEvent),
    /// Keyboard input while the map has focus
    Key(Key),
    /// Canvas size changed, in pixels
    ViewportResized { width: f64, height: f64 },
    /// The host moved the camera (pan, zoom, finished animation)
    ViewChanged(View),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMessage {
    /// Save with the entered name
    Save(String),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureMessage {
    /// Switch the selected feature into editing
    Edit,
    /// Leave editing without saving anything
    FinishEdit,
    /// Save a new name for the selected feature
    Rename(String),
    /// Delete the selected feature (already confirmed by the user)
    Delete,
    /// Close the details panel
    CloseDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMessage {
    Clicked(FeatureId),
    /// Pointer entered (`Some`) or left (`None`) a list row
    Hovered(Option<FeatureId>),
    SearchChanged(String),
    /// Legend entry clicked
    VisibilityToggled(GeometryType),
}

#[derive(Debug)]
pub enum GeocodeMessage {
    /// Search submitted
    Search(String),
    /// Search call finished
    Results(Result<Vec<GeocodeResult>, ApiError>),
    /// Result at this index picked
    Chosen(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMessage {
    Requested,
    /// The host finished (or failed) handing the document to the user
    Finished(Result<(), String>),
}

impl From<ToolMessage> for Message {
    fn from(msg: ToolMessage) -> Self {
        Message::Tool(msg)
    }
}

impl From<MapMessage> for Message {
    fn from(msg: MapMessage) -> Self {
        Message::Map(msg)
    }
}

impl From<DraftMessage> for Message {
    fn from(msg: DraftMessage) -> Self {
        Message::Draft(msg)
    }
}

impl From<FeatureMessage> for Message {
    fn from(msg: FeatureMessage) -> Self {
        Message::Feature(msg)
    }
}

impl From<ListMessage> for Message {
    fn from(msg: ListMessage) -> Self {
        Message::List(msg)
    }
}

impl From<GeocodeMessage> for Message {
    fn from(msg: GeocodeMessage) -> Self {
        Message::Geocode(msg)
    }
}

impl From<ExportMessage> for Message {
    fn from(msg: ExportMessage) -> Self {
        Message::Export(msg)
    }
}

impl From<PersistOutcome> for Message {
    fn from(outcome: PersistOutcome) -> Self {
        Message::Persisted(outcome)
    }
}
