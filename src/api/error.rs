use geoscribe_geo::DecodeError;
use thiserror::Error;

/// Failures talking to the persistence API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable envelope (network, status, body)
    #[error("{0}")]
    Transport(String),

    /// The API answered with `success: false`
    #[error("{}", message.as_deref().unwrap_or("request rejected"))]
    Domain { message: Option<String> },

    /// A returned geometry could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport(err.to_string())
    }

    pub fn domain(message: Option<String>) -> Self {
        ApiError::Domain { message }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, ApiError::Domain { .. })
    }

    /// Domain message if there is one.
    pub fn domain_message(&self) -> Option<&str> {
        match self {
            ApiError::Domain { message } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Transport-level description if there is one.
    pub fn transport_message(&self) -> Option<String> {
        match self {
            ApiError::Transport(message) if !message.trim().is_empty() => Some(message.clone()),
            ApiError::Decode(e) => Some(e.to_string()),
            _ => None,
        }
    }
}
