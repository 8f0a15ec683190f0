//! Error types of the interaction engine.
//!
//! Lower layers keep their own errors ([`DecodeError`], [`ApiError`],
//! [`ConfigError`]); [`Error`] gathers them for the places that turn a
//! failure into something the user reads.

use geoscribe_geo::DecodeError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::constants::GENERIC_ERROR_MESSAGE;

/// Input rejected locally, before anything is sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Feature name cannot be empty.")]
    EmptyName,

    #[error("Please enter at least {min} characters to search.")]
    QueryTooShort { min: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Text shown to the user: the API's own message when it sent one,
    /// then the transport description, then a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => e
                .domain_message()
                .map(str::to_string)
                .or_else(|| e.transport_message())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            Error::Decode(e) => e.to_string(),
            Error::Validation(e) => e.to_string(),
            Error::Config(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
