//! Invoice persistence, scoped per owner.
//!
//! DESIGN
//! ======
//! Every query carries `user_id` in its `WHERE` clause, so another user's
//! invoice is indistinguishable from a missing one and both answer
//! `NotFound`.
//!
//! Request bodies are parsed here from loose JSON rather than through a typed
//! extractor: amounts arrive as numbers or numeric strings and the error
//! messages are part of the wire contract.

use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use super::is_unique_violation;

#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Invoice not found or you don't have permission")]
    NotFound,
    #[error("Invoice amount cannot be negative")]
    NegativeAmount,
    #[error("Invalid invoice amount")]
    InvalidAmount,
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate,
    #[error("Invoice number already exists")]
    DuplicateNumber,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Invoice as it goes out on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub id: i64,
    pub invoice_number: String,
    pub invoice_amount: f64,
    /// ISO `YYYY-MM-DD`.
    pub invoice_date: String,
    pub user_id: i64,
}

impl InvoiceRow {
    fn from_row(row: &PgRow) -> Self {
        let date: Date = row.get("invoice_date");
        Self {
            id: row.get("id"),
            invoice_number: row.get("invoice_number"),
            invoice_amount: row.get("invoice_amount"),
            invoice_date: format_date(date),
            user_id: row.get("user_id"),
        }
    }
}

/// Validated create request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub invoice_amount: f64,
    pub invoice_date: Date,
}

impl NewInvoice {
    /// Parse a create body. Number and date fall back to generated values.
    ///
    /// # Errors
    ///
    /// Returns the amount or date validation error.
    pub fn from_json(body: &Value) -> Result<Self, InvoiceError> {
        let invoice_amount = parse_amount(body.get("invoice_amount").unwrap_or(&Value::Null))?;
        let invoice_date = match non_empty_str(body, "invoice_date") {
            Some(raw) => parse_date(raw)?,
            None => OffsetDateTime::now_utc().date(),
        };
        let invoice_number =
            non_empty_str(body, "invoice_number").map_or_else(generate_invoice_number, ToOwned::to_owned);
        Ok(Self { invoice_number, invoice_amount, invoice_date })
    }
}

/// Validated partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceChanges {
    pub invoice_amount: Option<f64>,
    pub invoice_date: Option<Date>,
}

impl InvoiceChanges {
    /// # Errors
    ///
    /// Returns the amount or date validation error.
    pub fn from_json(body: &Value) -> Result<Self, InvoiceError> {
        let invoice_amount = match body.get("invoice_amount") {
            None | Some(Value::Null) => None,
            Some(v) => Some(parse_amount(v)?),
        };
        let invoice_date = non_empty_str(body, "invoice_date").map(parse_date).transpose()?;
        Ok(Self { invoice_amount, invoice_date })
    }
}

fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// PARSING
// =============================================================================

/// Accept a JSON number or numeric string; reject negatives.
///
/// # Errors
///
/// `InvalidAmount` for anything non-numeric, `NegativeAmount` below zero.
pub fn parse_amount(value: &Value) -> Result<f64, InvoiceError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|a| a.is_finite())
    .ok_or(InvoiceError::InvalidAmount)?;

    if amount < 0.0 {
        return Err(InvoiceError::NegativeAmount);
    }
    Ok(amount)
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// # Errors
///
/// `InvalidDate` for any other shape or an impossible calendar date.
pub fn parse_date(raw: &str) -> Result<Date, InvoiceError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| InvoiceError::InvalidDate)
}

fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// `INV-<unix millis>-<4 random digits>`.
#[must_use]
pub fn generate_invoice_number() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u16 = rand::rng().random_range(0..10_000);
    format!("INV-{millis}-{suffix:04}")
}

// =============================================================================
// QUERIES
// =============================================================================

const COLUMNS: &str = "id, invoice_number, invoice_amount, invoice_date, user_id";

/// All invoices owned by `user_id`, newest first.
///
/// # Errors
///
/// Returns the database error if the query fails.
pub async fn list_invoices(pool: &PgPool, user_id: i64) -> Result<Vec<InvoiceRow>, InvoiceError> {
    let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM invoices WHERE user_id = $1 ORDER BY id DESC"))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(InvoiceRow::from_row).collect())
}

/// # Errors
///
/// `NotFound` if the invoice is missing or owned by someone else.
pub async fn get_invoice(pool: &PgPool, user_id: i64, id: i64) -> Result<InvoiceRow, InvoiceError> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM invoices WHERE id = $1 AND user_id = $2"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(InvoiceError::NotFound)?;
    Ok(InvoiceRow::from_row(&row))
}

/// # Errors
///
/// `DuplicateNumber` if the invoice number is taken.
pub async fn create_invoice(pool: &PgPool, user_id: i64, new: &NewInvoice) -> Result<InvoiceRow, InvoiceError> {
    let row = sqlx::query(&format!(
        "INSERT INTO invoices (invoice_number, invoice_amount, invoice_date, user_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {COLUMNS}"
    ))
    .bind(&new.invoice_number)
    .bind(new.invoice_amount)
    .bind(new.invoice_date)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| if is_unique_violation(&e) { InvoiceError::DuplicateNumber } else { InvoiceError::Database(e) })?;

    let invoice = InvoiceRow::from_row(&row);
    tracing::info!(user_id, invoice_id = invoice.id, number = %invoice.invoice_number, "invoice created");
    Ok(invoice)
}

/// # Errors
///
/// `NotFound` if the invoice is missing or owned by someone else.
pub async fn update_invoice(
    pool: &PgPool,
    user_id: i64,
    id: i64,
    changes: &InvoiceChanges,
) -> Result<InvoiceRow, InvoiceError> {
    let row = sqlx::query(&format!(
        "UPDATE invoices
         SET invoice_amount = COALESCE($1, invoice_amount),
             invoice_date = COALESCE($2, invoice_date)
         WHERE id = $3 AND user_id = $4
         RETURNING {COLUMNS}"
    ))
    .bind(changes.invoice_amount)
    .bind(changes.invoice_date)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(InvoiceError::NotFound)?;
    Ok(InvoiceRow::from_row(&row))
}

/// # Errors
///
/// `NotFound` if the invoice is missing or owned by someone else.
pub async fn delete_invoice(pool: &PgPool, user_id: i64, id: i64) -> Result<(), InvoiceError> {
    let deleted = sqlx::query("DELETE FROM invoices WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(InvoiceError::NotFound);
    }
    tracing::info!(user_id, invoice_id = id, "invoice deleted");
    Ok(())
}

#[cfg(test)]
#[path = "invoice_test.rs"]
mod tests;
