//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` plus a health probe. The
//! browser front end is served elsewhere, so every route answers CORS for
//! any origin.

pub mod auth;
pub mod invoices;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const MISSING_JSON: &str = "Missing JSON in request";

/// Full API router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/token", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/api/invoices/{id}",
            get(invoices::show)
                .put(invoices::update)
                .delete(invoices::delete),
        )
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse a request body as a JSON object.
///
/// Bodies are parsed by hand so malformed input answers 400 rather than
/// the extractor's 422, which clients read as a bad token.
pub(crate) fn json_body(body: &[u8]) -> AppResult<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        _ => Err(AppError::BadRequest(MISSING_JSON.into())),
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
