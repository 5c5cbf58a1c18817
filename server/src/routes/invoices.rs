//! Invoice CRUD routes. Every handler requires an [`AuthUser`].

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{Value, json};

use super::auth::AuthUser;
use super::json_body;
use crate::error::AppResult;
use crate::services::invoice::{self as invoice_svc, InvoiceChanges, InvoiceRow, NewInvoice};
use crate::state::AppState;

pub const DELETED_MESSAGE: &str = "Invoice deleted successfully";

/// `GET /api/invoices`
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Value>> {
    let invoices = invoice_svc::list_invoices(&state.pool, auth.user.id).await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// `POST /api/invoices`
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> AppResult<(StatusCode, Json<InvoiceRow>)> {
    let new = NewInvoice::from_json(&json_body(&body)?)?;
    let invoice = invoice_svc::create_invoice(&state.pool, auth.user.id, &new).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `GET /api/invoices/{id}`
pub async fn show(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> AppResult<Json<InvoiceRow>> {
    Ok(Json(invoice_svc::get_invoice(&state.pool, auth.user.id, id).await?))
}

/// `PUT /api/invoices/{id}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> AppResult<Json<InvoiceRow>> {
    let changes = InvoiceChanges::from_json(&json_body(&body)?)?;
    Ok(Json(invoice_svc::update_invoice(&state.pool, auth.user.id, id, &changes).await?))
}

/// `DELETE /api/invoices/{id}`
pub async fn delete(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> AppResult<Json<Value>> {
    invoice_svc::delete_invoice(&state.pool, auth.user.id, id).await?;
    Ok(Json(json!({ "message": DELETED_MESSAGE })))
}
