use thiserror::Error;

/// Errors raised while decoding or encoding geometry text.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Geometry keyword is not one of POINT, LINESTRING or POLYGON.
    #[error("Unknown geometry type '{value}'")]
    UnknownGeometryType { value: String },

    /// A coordinate component could not be parsed as a number.
    #[error("Invalid number '{value}'")]
    InvalidNumber { value: String },

    /// A coordinate component parsed but is NaN or infinite.
    #[error("Non-finite coordinate '{value}'")]
    NonFiniteCoordinate { value: String },

    /// A token appeared where something else was required.
    #[error("Expected {expected} but found '{found}'")]
    UnexpectedToken { expected: String, found: String },

    /// The text ended in the middle of a geometry.
    #[error("Unexpected end of input in '{value}'")]
    UnexpectedEnd { value: String },

    /// Extra text after a complete geometry.
    #[error("Trailing input '{value}'")]
    TrailingInput { value: String },

    /// Not enough coordinates for the geometry type.
    #[error("{geometry} needs at least {required} coordinates, found {found}")]
    TooFewCoordinates {
        geometry: String,
        required: usize,
        found: usize,
    },

    /// Coordinates carried an unsupported dimension count.
    #[error("Expected 2 coordinate components, found {found} in '{value}'")]
    Dimension { found: usize, value: String },

    /// JSON serialization failure while writing an export document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    pub fn unknown_geometry_type(value: impl Into<String>) -> Self {
        Self::UnknownGeometryType {
            value: value.into(),
        }
    }

    pub fn invalid_number(value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            value: value.into(),
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn non_finite(value: f64) -> Self {
        Self::NonFiniteCoordinate {
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
