//! Measurement tooltip overlay.

use geoscribe_geo::Coord;
use serde::Serialize;

use crate::constants::tooltip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipState {
    /// Follows the sketch while it is drawn
    #[default]
    Live,
    /// Pinned to a finished measurement
    Static,
}

/// Text overlay anchored at the last vertex of a measurement sketch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureTooltip {
    pub visible: bool,
    pub text: String,
    pub position: Option<Coord>,
    pub offset: (f64, f64),
    pub state: TooltipState,
    /// Number of live updates applied since creation
    #[serde(skip)]
    pub updates: usize,
}

impl Default for MeasureTooltip {
    fn default() -> Self {
        Self {
            visible: false,
            text: String::new(),
            position: None,
            offset: tooltip::LIVE_OFFSET,
            state: TooltipState::Live,
            updates: 0,
        }
    }
}

impl MeasureTooltip {
    pub fn start(&mut self, at: Coord) {
        self.visible = true;
        self.text = tooltip::START_TEXT.to_string();
        self.position = Some(at);
        self.offset = tooltip::LIVE_OFFSET;
        self.state = TooltipState::Live;
    }

    pub fn update(&mut self, text: String, at: Option<Coord>) {
        self.text = text;
        if at.is_some() {
            self.position = at;
        }
        self.updates += 1;
    }

    /// Freeze the tooltip on a finished measurement.
    pub fn pin(&mut self, text: String, at: Option<Coord>) {
        self.text = text;
        if at.is_some() {
            self.position = at;
        }
        self.state = TooltipState::Static;
        self.offset = tooltip::STATIC_OFFSET;
    }

    pub fn hide(&mut self) {
        let updates = self.updates;
        *self = Self::default();
        self.updates = updates;
    }
}
