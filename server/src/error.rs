//! HTTP error type shared by every handler.
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaves as JSON `{"message": ...}` with a status the client
//! classifies on. Database and internal failures are logged here and answer
//! a generic 500 so driver details never reach the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::services::auth::AuthError;
use crate::services::invoice::InvoiceError;

pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    /// Malformed credential header. Answers 422.
    #[error("{0}")]
    InvalidToken(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidToken(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                INTERNAL_MESSAGE.to_owned()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                INTERNAL_MESSAGE.to_owned()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail | AuthError::WeakPassword(_) | AuthError::MissingCredentials => {
                Self::BadRequest(err.to_string())
            }
            AuthError::EmailTaken => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Hash(msg) => Self::Internal(msg),
            AuthError::Database(e) => Self::Database(e),
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound => Self::NotFound(err.to_string()),
            InvoiceError::NegativeAmount | InvoiceError::InvalidAmount | InvoiceError::InvalidDate => {
                Self::BadRequest(err.to_string())
            }
            InvoiceError::DuplicateNumber => Self::Conflict(err.to_string()),
            InvoiceError::Database(e) => Self::Database(e),
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
