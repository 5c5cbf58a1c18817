//! Live REST implementation of [`InvoiceApi`] over `reqwest`.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures (connect, timeout, body read) become
//! [`ApiError::Network`]. Non-2xx responses go through [`classify`] with the
//! decoded JSON body, or `Null` when the body is empty or not JSON. A 2xx body
//! that does not match the expected type is [`ApiError::Generic`].

use std::time::Duration;

use rand::Rng;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::{ApiError, classify};
use super::types::{Invoice, InvoiceFields, InvoiceList, InvoiceUpdate, LoginResponse, RegisterResponse};
use super::{ApiMode, InvoiceApi, unix_millis};
use crate::config::{ConfigError, Timeouts};

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim().trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "invoice api request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let text = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "invoice api error response");
            return Err(classify(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn execute_as<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(request).await?;
        serde_json::from_value(body).map_err(|e| ApiError::generic(format!("Unexpected response: {e}")))
    }
}

/// `INV-<unix millis>-<4 digits>`.
pub(crate) fn generate_invoice_number() -> String {
    let suffix: u16 = rand::rng().random_range(0..10_000);
    format!("INV-{}-{suffix:04}", unix_millis())
}

#[async_trait::async_trait]
impl InvoiceApi for HttpApi {
    fn mode(&self) -> ApiMode {
        ApiMode::Live
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self.http.post(self.url("/api/login")).json(&json!({ "email": email, "password": password }));
        self.execute_as(request).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse, ApiError> {
        let request = self.http.post(self.url("/api/register")).json(&json!({ "email": email, "password": password }));
        self.execute_as(request).await
    }

    async fn list_invoices(&self, token: &str) -> Result<Vec<Invoice>, ApiError> {
        let request = self.http.get(self.url("/api/invoices")).bearer_auth(token);
        let list: InvoiceList = self.execute_as(request).await?;
        Ok(list.into())
    }

    async fn get_invoice(&self, token: &str, id: i64) -> Result<Invoice, ApiError> {
        let request = self.http.get(self.url(&format!("/api/invoices/{id}"))).bearer_auth(token);
        self.execute_as(request).await
    }

    async fn create_invoice(&self, token: &str, fields: &InvoiceFields) -> Result<Invoice, ApiError> {
        let mut body = fields.clone();
        if body.invoice_number.as_deref().is_none_or(str::is_empty) {
            body.invoice_number = Some(generate_invoice_number());
        }
        let request = self.http.post(self.url("/api/invoices")).bearer_auth(token).json(&body);
        self.execute_as(request).await
    }

    async fn update_invoice(&self, token: &str, id: i64, update: &InvoiceUpdate) -> Result<Invoice, ApiError> {
        let request = self.http.put(self.url(&format!("/api/invoices/{id}"))).bearer_auth(token).json(update);
        self.execute_as(request).await
    }

    async fn delete_invoice(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&format!("/api/invoices/{id}"))).bearer_auth(token);
        self.execute(request).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
