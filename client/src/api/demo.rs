//! In-process demo backend.
//!
//! Answers every [`InvoiceApi`] call from seed data held behind a mutex, so a
//! front end runs end to end with no server. State lives as long as the
//! `DemoApi` value; nothing is persisted.
//!
//! TRADE-OFFS
//! ==========
//! Any non-empty credentials log in as the single demo user, and every demo
//! token sees the same invoice list. Tokens without the demo prefix are
//! rejected so a stale live token left in storage behaves like an expired one.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use session::User;

use super::error::ApiError;
use super::types::{Invoice, InvoiceFields, InvoiceUpdate, LoginResponse, RegisterResponse};
use super::{ApiMode, InvoiceApi, unix_millis};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_USER_ID: i64 = 1;
pub const DEMO_TOKEN_PREFIX: &str = "demo-jwt-token-";
pub const REGISTER_MESSAGE: &str = "User created successfully. Please log in.";

pub struct DemoApi {
    invoices: Mutex<Vec<Invoice>>,
    latency: Duration,
}

impl Default for DemoApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoApi {
    #[must_use]
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Demo backend that sleeps `latency` before every answer.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self { invoices: Mutex::new(seed_invoices()), latency }
    }

    #[must_use]
    pub fn demo_user() -> User {
        User::new(DEMO_EMAIL).with("id", DEMO_USER_ID).with("is_active", true)
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn check_token(token: &str) -> Result<(), ApiError> {
        if token.starts_with(DEMO_TOKEN_PREFIX) {
            Ok(())
        } else {
            Err(ApiError::InvalidToken("Invalid token - Please log in again".to_owned()))
        }
    }

    fn with_invoices<T>(&self, f: impl FnOnce(&mut Vec<Invoice>) -> T) -> T {
        let mut invoices = self.invoices.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut invoices)
    }
}

fn seed_invoices() -> Vec<Invoice> {
    [
        (1, "INV-2024-001", 1250.00, "2024-01-15"),
        (2, "INV-2024-002", 875.50, "2024-02-10"),
        (3, "INV-2024-003", 2100.75, "2024-03-05"),
        (4, "INV-2024-004", 450.25, "2024-03-20"),
    ]
    .into_iter()
    .map(|(id, number, amount, date)| Invoice {
        id,
        invoice_number: number.to_owned(),
        invoice_amount: amount,
        invoice_date: date.to_owned(),
        user_id: Some(DEMO_USER_ID),
    })
    .collect()
}

fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_owned())
}

#[async_trait::async_trait]
impl InvoiceApi for DemoApi {
    fn mode(&self) -> ApiMode {
        ApiMode::Demo
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.pause().await;
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Unauthorized("Invalid credentials".to_owned()));
        }
        let token = format!("{DEMO_TOKEN_PREFIX}{}", unix_millis());
        tracing::debug!(email, "demo login");
        Ok(LoginResponse { token, user: Some(Self::demo_user()) })
    }

    async fn register(&self, _email: &str, _password: &str) -> Result<RegisterResponse, ApiError> {
        self.pause().await;
        Ok(RegisterResponse { message: REGISTER_MESSAGE.to_owned() })
    }

    async fn list_invoices(&self, token: &str) -> Result<Vec<Invoice>, ApiError> {
        self.pause().await;
        Self::check_token(token)?;
        Ok(self.with_invoices(|invoices| invoices.clone()))
    }

    async fn get_invoice(&self, token: &str, id: i64) -> Result<Invoice, ApiError> {
        self.pause().await;
        Self::check_token(token)?;
        self.with_invoices(|invoices| invoices.iter().find(|inv| inv.id == id).cloned())
            .ok_or_else(not_found)
    }

    async fn create_invoice(&self, token: &str, fields: &InvoiceFields) -> Result<Invoice, ApiError> {
        self.pause().await;
        Self::check_token(token)?;
        let created = self.with_invoices(|invoices| {
            let id = invoices.iter().map(|inv| inv.id).max().unwrap_or(0) + 1;
            let invoice = Invoice {
                id,
                invoice_number: format!("INV-{}", unix_millis()),
                invoice_amount: fields.invoice_amount,
                invoice_date: fields.invoice_date.clone(),
                user_id: Some(DEMO_USER_ID),
            };
            invoices.insert(0, invoice.clone());
            invoice
        });
        Ok(created)
    }

    async fn update_invoice(&self, token: &str, id: i64, update: &InvoiceUpdate) -> Result<Invoice, ApiError> {
        self.pause().await;
        Self::check_token(token)?;
        self.with_invoices(|invoices| {
            let invoice = invoices.iter_mut().find(|inv| inv.id == id)?;
            if let Some(amount) = update.invoice_amount {
                invoice.invoice_amount = amount;
            }
            if let Some(date) = &update.invoice_date {
                invoice.invoice_date.clone_from(date);
            }
            Some(invoice.clone())
        })
        .ok_or_else(not_found)
    }

    async fn delete_invoice(&self, token: &str, id: i64) -> Result<(), ApiError> {
        self.pause().await;
        Self::check_token(token)?;
        self.with_invoices(|invoices| invoices.retain(|inv| inv.id != id));
        Ok(())
    }
}

#[cfg(test)]
#[path = "demo_test.rs"]
mod tests;
