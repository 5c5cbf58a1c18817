//! Invoice API capability and its implementations.
//!
//! DESIGN
//! ======
//! [`InvoiceApi`] is the seam between the controller and the backend. The
//! live and demo implementations are interchangeable behind
//! `Arc<dyn InvoiceApi>`; nothing downstream branches on which one it holds
//! except for display ([`InvoiceApi::mode`]).

pub mod demo;
pub mod error;
pub mod http;
pub mod types;

use std::sync::Arc;

use crate::config::{ClientConfig, ConfigError};
use error::ApiError;
use types::{Invoice, InvoiceFields, InvoiceUpdate, LoginResponse, RegisterResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    Live,
    Demo,
}

impl ApiMode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Demo => "DEMO",
        }
    }
}

#[async_trait::async_trait]
pub trait InvoiceApi: Send + Sync {
    fn mode(&self) -> ApiMode;

    /// Backend base URL, if this implementation talks to one.
    fn base_url(&self) -> Option<&str> {
        None
    }

    /// `POST /api/login`.
    ///
    /// # Errors
    ///
    /// Bad credentials are [`ApiError::Unauthorized`].
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// `POST /api/register`.
    ///
    /// # Errors
    ///
    /// A taken email is [`ApiError::Conflict`].
    async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse, ApiError>;

    /// `GET /api/invoices`.
    ///
    /// # Errors
    ///
    /// Any classified [`ApiError`].
    async fn list_invoices(&self, token: &str) -> Result<Vec<Invoice>, ApiError>;

    /// `GET /api/invoices/{id}`.
    ///
    /// # Errors
    ///
    /// An unknown or foreign id is [`ApiError::NotFound`].
    async fn get_invoice(&self, token: &str, id: i64) -> Result<Invoice, ApiError>;

    /// `POST /api/invoices`.
    ///
    /// # Errors
    ///
    /// A duplicate invoice number is [`ApiError::Conflict`].
    async fn create_invoice(&self, token: &str, fields: &InvoiceFields) -> Result<Invoice, ApiError>;

    /// `PUT /api/invoices/{id}`.
    ///
    /// # Errors
    ///
    /// An unknown or foreign id is [`ApiError::NotFound`].
    async fn update_invoice(&self, token: &str, id: i64, update: &InvoiceUpdate) -> Result<Invoice, ApiError>;

    /// `DELETE /api/invoices/{id}`.
    ///
    /// # Errors
    ///
    /// Any classified [`ApiError`].
    async fn delete_invoice(&self, token: &str, id: i64) -> Result<(), ApiError>;
}

/// Pick the implementation `config` asks for.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_api(config: &ClientConfig) -> Result<Arc<dyn InvoiceApi>, ConfigError> {
    match (&config.backend_url, config.demo_mode) {
        (Some(url), false) => {
            tracing::info!(backend_url = %url, "using live invoice backend");
            Ok(Arc::new(http::HttpApi::new(url, config.timeouts)?))
        }
        _ => {
            tracing::info!("using demo invoice backend");
            Ok(Arc::new(demo::DemoApi::with_latency(config.demo_latency)))
        }
    }
}

/// Unix time in milliseconds, used for generated identifiers.
pub(crate) fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
