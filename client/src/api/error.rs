//! Classified API failures.
//!
//! The classification is the only thing session logic looks at: the
//! authorization class (`Unauthorized`, `Forbidden`, `InvalidToken`) forces a
//! logout, everything else is surfaced as a message.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidToken(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Network error - {0}")]
    Network(String),
    #[error("{message}")]
    Generic { status: Option<u16>, message: String },
}

impl ApiError {
    /// True for errors that mean the session's credential is no good.
    #[must_use]
    pub fn forces_logout(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Forbidden(_) | Self::InvalidToken(_))
    }

    /// HTTP status behind the error, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::InvalidToken(_) => Some(422),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Network(_) => None,
            Self::Generic { status, .. } => *status,
        }
    }

    pub(crate) fn generic(message: impl Into<String>) -> Self {
        Self::Generic { status: None, message: message.into() }
    }
}

/// Pull a human-readable message out of an error body.
fn body_message(body: &Value) -> Option<String> {
    ["message", "msg", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Classify a non-success response from its status and (possibly `Null`) body.
#[must_use]
pub fn classify(status: u16, body: &Value) -> ApiError {
    let message = body_message(body);
    let or = |fallback: &str| message.clone().unwrap_or_else(|| fallback.to_owned());
    match status {
        401 => ApiError::Unauthorized(or("Unauthorized - Please log in again")),
        403 => ApiError::Forbidden(or("Forbidden - Access denied")),
        422 => ApiError::InvalidToken(or("Invalid token - Please log in again")),
        404 => ApiError::NotFound(or("Resource not found")),
        409 => ApiError::Conflict(or("Conflict - Resource already exists")),
        other => ApiError::Generic { status: Some(other), message: or(&format!("API error: {other}")) },
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
