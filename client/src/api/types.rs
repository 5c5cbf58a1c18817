//! Wire types for the invoice REST API.

use serde::{Deserialize, Deserializer, Serialize};
use session::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub invoice_amount: f64,
    /// ISO `YYYY-MM-DD`.
    pub invoice_date: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Body of `POST /api/invoices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    pub invoice_amount: f64,
    pub invoice_date: String,
}

/// Body of `PUT /api/invoices/{id}`. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
}

impl InvoiceUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invoice_amount.is_none() && self.invoice_date.is_none()
    }
}

/// Successful login. The token may arrive as `token` or `access_token`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Option<User>,
}

impl<'de> Deserialize<'de> for LoginResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            token: Option<String>,
            access_token: Option<String>,
            #[serde(default)]
            user: Option<User>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let token = raw
            .token
            .filter(|t| !t.is_empty())
            .or(raw.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| serde::de::Error::missing_field("token"))?;
        Ok(Self { token, user: raw.user })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// `GET /api/invoices` answers `{"invoices": [...]}`; a bare array is accepted.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum InvoiceList {
    Wrapped { invoices: Vec<Invoice> },
    Bare(Vec<Invoice>),
}

impl From<InvoiceList> for Vec<Invoice> {
    fn from(list: InvoiceList) -> Self {
        match list {
            InvoiceList::Wrapped { invoices } | InvoiceList::Bare(invoices) => invoices,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
