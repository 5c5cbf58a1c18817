//! View-layer controller: the pages' behavior without the rendering.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each method corresponds to something a page does: submit the login form,
//! load the dashboard, save an edit. Methods consult the route guard, call
//! the [`InvoiceApi`], and dispatch the resulting actions into the session
//! store. Front ends (the CLI today) render whatever comes back.
//!
//! ERROR HANDLING
//! ==============
//! Protected calls fail fast with [`ViewError::Redirect`] when the guard says
//! so, without touching the network. An [`ApiError`] that
//! [`forces_logout`](ApiError::forces_logout) dispatches `LOGOUT` and comes
//! back as [`ViewError::ForcedLogout`]. Any other API error comes back as
//! [`ViewError::Api`] and leaves the session alone.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use session::{Access, Action, KeyValueStore, Route, Session, SessionStore, guard};

use crate::api::error::ApiError;
use crate::api::types::{Invoice, InvoiceFields, InvoiceUpdate};
use crate::api::{ApiMode, InvoiceApi};

pub const MISSING_CREDENTIALS: &str = "Please enter both email and password.";
pub const MISSING_AMOUNT: &str = "Amount is required.";
const TOKEN_PREVIEW_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    /// Form input rejected before any request.
    #[error("{0}")]
    Invalid(String),
    /// The guard sent the page elsewhere.
    #[error("redirected to {0}")]
    Redirect(Route),
    /// The backend rejected the credential; the session was logged out.
    #[error("{0}")]
    ForcedLogout(ApiError),
    #[error("{0}")]
    Api(ApiError),
}

impl ViewError {
    /// Where the view should navigate after this error, if anywhere.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Redirect(route) => Some(*route),
            Self::ForcedLogout(_) => Some(Route::Login),
            Self::Invalid(_) | Self::Api(_) => None,
        }
    }
}

/// Debug snapshot of the connection and credential state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub mode: ApiMode,
    pub backend_url: Option<String>,
    pub token_present: bool,
    pub token_length: usize,
    pub token_preview: Option<String>,
    pub authenticated: bool,
    pub email: Option<String>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode: {}", self.mode.label())?;
        writeln!(f, "Backend URL: {}", self.backend_url.as_deref().unwrap_or("(none)"))?;
        writeln!(f, "Token: {}", if self.token_present { "EXISTS" } else { "MISSING" })?;
        writeln!(f, "Token length: {}", self.token_length)?;
        if let Some(preview) = &self.token_preview {
            writeln!(f, "Token preview: {preview}")?;
        }
        if let Some(email) = &self.email {
            writeln!(f, "User: {email}")?;
        }
        write!(f, "Authenticated: {}", if self.authenticated { "yes" } else { "no" })
    }
}

pub struct App<S> {
    store: SessionStore<S>,
    api: Arc<dyn InvoiceApi>,
}

impl<S: KeyValueStore> App<S> {
    #[must_use]
    pub fn new(store: SessionStore<S>, api: Arc<dyn InvoiceApi>) -> Self {
        Self { store, api }
    }

    #[must_use]
    pub fn session(&self) -> Arc<Session> {
        self.store.session()
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    #[must_use]
    pub fn mode(&self) -> ApiMode {
        self.api.mode()
    }

    pub fn into_store(self) -> SessionStore<S> {
        self.store
    }

    /// Resolve what renders for `route`.
    #[must_use]
    pub fn open(&self, route: Route) -> Access {
        guard(route, &self.store.session())
    }

    // =========================================================================
    // AUTH PAGES
    // =========================================================================

    /// Submit the login form. Leads to the dashboard on success.
    ///
    /// # Errors
    ///
    /// Blank input is [`ViewError::Invalid`]. A backend rejection is
    /// [`ViewError::Api`] and is also recorded as the session message.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Route, ViewError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ViewError::Invalid(MISSING_CREDENTIALS.to_owned()));
        }

        self.store.dispatch(Action::SetLoading(true));
        match self.api.login(email, password).await {
            Ok(resp) => {
                tracing::info!(email, "login succeeded");
                self.store.dispatch(Action::login_success(resp.token, resp.user));
                Ok(Route::Dashboard)
            }
            Err(e) => {
                tracing::info!(email, error = %e, "login failed");
                self.store.dispatch(Action::set_error(e.to_string()));
                Err(ViewError::Api(e))
            }
        }
    }

    /// Submit the signup form. Leads to the login page on success.
    ///
    /// # Errors
    ///
    /// Blank input is [`ViewError::Invalid`]. A backend rejection is
    /// [`ViewError::Api`] and is also recorded as the session message.
    pub async fn signup(&mut self, email: &str, password: &str) -> Result<Route, ViewError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ViewError::Invalid(MISSING_CREDENTIALS.to_owned()));
        }

        self.store.dispatch(Action::SetLoading(true));
        match self.api.register(email, password).await {
            Ok(resp) => {
                self.store.dispatch(Action::signup_success(resp.message));
                Ok(Route::Login)
            }
            Err(e) => {
                self.store.dispatch(Action::set_error(e.to_string()));
                Err(ViewError::Api(e))
            }
        }
    }

    pub fn logout(&mut self) -> Route {
        self.store.dispatch(Action::Logout);
        Route::Login
    }

    pub fn update_profile(&mut self, partial: Map<String, Value>) -> Arc<Session> {
        self.store.dispatch(Action::update_user(partial))
    }

    pub fn clear_message(&mut self) -> Arc<Session> {
        self.store.dispatch(Action::ClearMessage)
    }

    // =========================================================================
    // PRIVATE PAGES
    // =========================================================================

    /// Dashboard load.
    ///
    /// # Errors
    ///
    /// See module docs.
    pub async fn list_invoices(&mut self) -> Result<Vec<Invoice>, ViewError> {
        let token = self.authorize(Route::Dashboard)?;
        let result = self.api.list_invoices(&token).await;
        self.settle(result)
    }

    /// Single invoice page load.
    ///
    /// # Errors
    ///
    /// See module docs.
    pub async fn invoice(&mut self, id: i64) -> Result<Invoice, ViewError> {
        let token = self.authorize(Route::Invoice(id))?;
        let result = self.api.get_invoice(&token, id).await;
        self.settle(result)
    }

    /// Dashboard "new invoice" form. `date` defaults to today (UTC).
    ///
    /// # Errors
    ///
    /// A missing amount is [`ViewError::Invalid`]; otherwise see module docs.
    pub async fn create_invoice(&mut self, amount: Option<f64>, date: Option<&str>) -> Result<Invoice, ViewError> {
        let token = self.authorize(Route::Dashboard)?;
        let Some(amount) = amount else {
            return Err(ViewError::Invalid(MISSING_AMOUNT.to_owned()));
        };
        let invoice_date = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map_or_else(today, str::to_owned);
        let fields = InvoiceFields { invoice_number: None, invoice_amount: amount, invoice_date };
        let result = self.api.create_invoice(&token, &fields).await;
        self.settle(result)
    }

    /// Edit form on the dashboard or the single invoice page.
    ///
    /// # Errors
    ///
    /// See module docs.
    pub async fn update_invoice(&mut self, id: i64, update: &InvoiceUpdate) -> Result<Invoice, ViewError> {
        let token = self.authorize(Route::Invoice(id))?;
        let result = self.api.update_invoice(&token, id, update).await;
        self.settle(result)
    }

    /// # Errors
    ///
    /// See module docs.
    pub async fn delete_invoice(&mut self, id: i64) -> Result<(), ViewError> {
        let token = self.authorize(Route::Dashboard)?;
        let result = self.api.delete_invoice(&token, id).await;
        self.settle(result)
    }

    // =========================================================================
    // DEBUG
    // =========================================================================

    #[must_use]
    pub fn status(&self) -> StatusReport {
        let session = self.store.session();
        let token = session.token.as_deref();
        StatusReport {
            mode: self.api.mode(),
            backend_url: self.api.base_url().map(str::to_owned),
            token_present: token.is_some(),
            token_length: token.map_or(0, |t| t.chars().count()),
            token_preview: token.map(|t| format!("{}...", t.chars().take(TOKEN_PREVIEW_CHARS).collect::<String>())),
            authenticated: session.is_authenticated(),
            email: session.email().map(str::to_owned),
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Run the guard for `route` and hand back the token to call with.
    fn authorize(&self, route: Route) -> Result<String, ViewError> {
        let session = self.store.session();
        match guard(route, &session) {
            Access::Render(_) => session.token.clone().ok_or(ViewError::Redirect(Route::Login)),
            Access::Redirect(to) => {
                tracing::debug!(from = %route, to = %to, "guard redirect");
                Err(ViewError::Redirect(to))
            }
        }
    }

    fn settle<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ViewError> {
        result.map_err(|e| {
            if e.forces_logout() {
                tracing::warn!(error = %e, "credential rejected, forcing logout");
                self.store.dispatch(Action::Logout);
                ViewError::ForcedLogout(e)
            } else {
                ViewError::Api(e)
            }
        })
    }
}

fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
