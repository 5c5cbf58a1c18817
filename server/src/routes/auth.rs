//! Auth routes: signup, login, and the bearer-token extractor.

use axum::body::Bytes;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::Json;
use serde_json::{Value, json};

use super::json_body;
use crate::error::{AppError, AppResult};
use crate::services::auth::{self as auth_svc, UserRow};
use crate::services::session;
use crate::state::AppState;

pub const MISSING_HEADER: &str = "Missing Authorization Header";
pub const BAD_HEADER: &str = "Bad Authorization header. Expected 'Authorization: Bearer <token>'";
pub const INVALID_SESSION: &str = "Invalid or expired token";
pub const SIGNUP_MESSAGE: &str = "User created successfully. Please log in.";
pub const LOGOUT_MESSAGE: &str = "Logged out";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserRow,
    pub token: String,
}

/// Pull the token out of a `Bearer <token>` header value.
pub(crate) fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Err(AppError::Unauthorized(MISSING_HEADER.into()));
        };
        let token = header
            .to_str()
            .ok()
            .and_then(parse_bearer)
            .ok_or_else(|| AppError::InvalidToken(BAD_HEADER.into()))?;

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_SESSION.into()))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

fn str_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn credentials(body: &Value) -> (&str, &str) {
    (str_field(body, "email"), str_field(body, "password"))
}

/// `POST /api/register`: create an account.
pub async fn register(State(state): State<AppState>, body: Bytes) -> AppResult<(StatusCode, Json<Value>)> {
    let body = json_body(&body)?;
    let (email, password) = credentials(&body);
    auth_svc::register_user(&state.pool, email, password).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": SIGNUP_MESSAGE }))))
}

/// `POST /api/login` and `POST /api/token`: exchange credentials for a bearer token.
pub async fn login(State(state): State<AppState>, body: Bytes) -> AppResult<Json<Value>> {
    let body = json_body(&body)?;
    let (email, password) = credentials(&body);
    let user = auth_svc::authenticate(&state.pool, email, password).await?;
    let token = session::create_session(&state.pool, user.id, state.session_ttl_secs).await?;
    tracing::info!(user_id = user.id, "login succeeded");
    Ok(Json(json!({ "token": token, "access_token": token, "user": user })))
}

/// `POST /api/logout`: revoke the presented token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Value>> {
    session::delete_session(&state.pool, &auth.token).await?;
    tracing::info!(user_id = auth.user.id, "session revoked");
    Ok(Json(json!({ "message": LOGOUT_MESSAGE })))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
