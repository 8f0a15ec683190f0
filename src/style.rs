//! Feature styling as a pure function of selection and hover state.
//!
//! The map host turns a [`StyleDescriptor`] into whatever its renderer needs;
//! nothing here touches a rendering surface.

use serde::Serialize;

use crate::model::{Feature, FeatureId};

/// An RGBA color, serialized as a CSS `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

// ============================================================================
// Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const SELECTED_FILL: Color = Color::rgba(0, 150, 255, 0.4);
    pub const SELECTED_STROKE: Color = Color::rgb(0, 150, 255);
    pub const HOVERED_FILL: Color = Color::rgba(255, 100, 100, 0.4);
    pub const HOVERED_STROKE: Color = Color::rgb(255, 0, 0);
    pub const NORMAL_FILL: Color = Color::rgba(255, 255, 255, 0.3);
    pub const NORMAL_STROKE: Color = Color::rgb(255, 204, 51);

    pub const LABEL_FILL: Color = Color::rgb(0, 0, 0);
    pub const LABEL_OUTLINE: Color = Color::rgb(255, 255, 255);

    pub const SKETCH_FILL: Color = Color::rgba(255, 255, 255, 0.2);
    pub const SKETCH_STROKE: Color = Color::rgba(0, 0, 0, 0.5);
}

pub const STROKE_WIDTH: f64 = 3.0;
pub const MARKER_RADIUS: f64 = 7.0;
pub const MARKER_RADIUS_HIGHLIGHTED: f64 = 8.0;
pub const LABEL_FONT: &str = "14px Calibri,sans-serif";
pub const LABEL_OUTLINE_WIDTH: f64 = 4.0;
pub const LABEL_OFFSET_Y: f64 = -20.0;

/// Visual treatment of a feature. Selection wins over hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Normal,
    Hovered,
    Selected,
}

impl Highlight {
    pub fn of(id: &FeatureId, selected: Option<&FeatureId>, hovered: Option<&FeatureId>) -> Self {
        if selected == Some(id) {
            Highlight::Selected
        } else if hovered == Some(id) {
            Highlight::Hovered
        } else {
            Highlight::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Circle drawn for point features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub radius: f64,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub text: String,
    pub font: &'static str,
    pub fill: Color,
    pub outline: Stroke,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleDescriptor {
    pub highlight: Highlight,
    pub fill: Color,
    pub stroke: Stroke,
    pub marker: Marker,
    pub label: Label,
}

/// Style for a persisted feature given the current selection and hover keys.
pub fn feature_style(
    feature: &Feature,
    selected: Option<&FeatureId>,
    hovered: Option<&FeatureId>,
) -> StyleDescriptor {
    style_for(&feature.id, &feature.name, selected, hovered)
}

/// Same as [`feature_style`] for callers holding only an id and a name.
pub fn style_for(
    id: &FeatureId,
    name: &str,
    selected: Option<&FeatureId>,
    hovered: Option<&FeatureId>,
) -> StyleDescriptor {
    styled(Highlight::of(id, selected, hovered), name)
}

/// Style for a drawn shape that has not been named yet.
pub fn draft_style() -> StyleDescriptor {
    styled(Highlight::Normal, "")
}

/// Style for measurement sketches.
pub fn sketch_style() -> StyleDescriptor {
    let mut style = styled(Highlight::Normal, "");
    style.fill = palette::SKETCH_FILL;
    style.stroke = Stroke {
        color: palette::SKETCH_STROKE,
        width: 2.0,
    };
    style
}

fn styled(highlight: Highlight, name: &str) -> StyleDescriptor {
    let (fill, stroke, radius) = match highlight {
        Highlight::Selected => (
            palette::SELECTED_FILL,
            palette::SELECTED_STROKE,
            MARKER_RADIUS_HIGHLIGHTED,
        ),
        Highlight::Hovered => (
            palette::HOVERED_FILL,
            palette::HOVERED_STROKE,
            MARKER_RADIUS_HIGHLIGHTED,
        ),
        Highlight::Normal => (palette::NORMAL_FILL, palette::NORMAL_STROKE, MARKER_RADIUS),
    };

    StyleDescriptor {
        highlight,
        fill,
        stroke: Stroke {
            color: stroke,
            width: STROKE_WIDTH,
        },
        marker: Marker {
            radius,
            fill: stroke,
        },
        label: Label {
            text: name.to_string(),
            font: LABEL_FONT,
            fill: palette::LABEL_FILL,
            outline: Stroke {
                color: palette::LABEL_OUTLINE,
                width: LABEL_OUTLINE_WIDTH,
            },
            offset_y: LABEL_OFFSET_Y,
        },
    }
}
