use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::demo::{DEMO_EMAIL, DemoApi, REGISTER_MESSAGE};
use crate::api::types::{LoginResponse, RegisterResponse};
use serde_json::json;
use session::{LOGGED_OUT_MESSAGE, MemoryStorage, TOKEN_KEY, User};

fn demo_app() -> App<MemoryStorage> {
    App::new(SessionStore::new(MemoryStorage::new()), Arc::new(DemoApi::new()))
}

/// Answers every protected call with a fixed error and counts calls.
struct RejectingApi {
    error: ApiError,
    calls: AtomicUsize,
}

impl RejectingApi {
    fn new(error: ApiError) -> Arc<Self> {
        Arc::new(Self { error, calls: AtomicUsize::new(0) })
    }

    fn fail<T>(&self) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

#[async_trait::async_trait]
impl InvoiceApi for RejectingApi {
    fn mode(&self) -> ApiMode {
        ApiMode::Live
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.fail()
    }

    async fn register(&self, _email: &str, _password: &str) -> Result<RegisterResponse, ApiError> {
        self.fail()
    }

    async fn list_invoices(&self, _token: &str) -> Result<Vec<Invoice>, ApiError> {
        self.fail()
    }

    async fn get_invoice(&self, _token: &str, _id: i64) -> Result<Invoice, ApiError> {
        self.fail()
    }

    async fn create_invoice(&self, _token: &str, _fields: &InvoiceFields) -> Result<Invoice, ApiError> {
        self.fail()
    }

    async fn update_invoice(&self, _token: &str, _id: i64, _update: &InvoiceUpdate) -> Result<Invoice, ApiError> {
        self.fail()
    }

    async fn delete_invoice(&self, _token: &str, _id: i64) -> Result<(), ApiError> {
        self.fail()
    }
}

fn signed_in_store() -> SessionStore<MemoryStorage> {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.dispatch(Action::login_success("live-token", Some(User::new("a@x.com"))));
    store
}

// =============================================================================
// Auth pages
// =============================================================================

#[tokio::test]
async fn login_blank_input_is_rejected_locally() {
    let mut app = demo_app();
    let err = app.login("  ", "pw").await.unwrap_err();
    assert_eq!(err, ViewError::Invalid(MISSING_CREDENTIALS.to_owned()));
    assert!(app.login("a@x.com", "").await.is_err());
    assert_eq!(app.session().token, None);
}

#[tokio::test]
async fn login_success_stores_session_and_leads_to_dashboard() {
    let mut app = demo_app();
    assert_eq!(app.login("a@x.com", "pw").await.unwrap(), Route::Dashboard);

    let session = app.session();
    assert!(session.is_authenticated());
    assert_eq!(session.email(), Some(DEMO_EMAIL));
    assert!(!session.loading);
    assert!(app.store().storage().get(TOKEN_KEY).unwrap().is_some());
    assert_eq!(app.open(Route::Login), Access::Redirect(Route::Dashboard));
}

#[tokio::test]
async fn login_failure_sets_message_and_keeps_token() {
    let store = signed_in_store();
    let api = RejectingApi::new(ApiError::Unauthorized("Invalid email or password".into()));
    let mut app = App::new(store, api);

    let err = app.login("a@x.com", "bad").await.unwrap_err();
    assert_eq!(err.redirect(), None);
    let session = app.session();
    assert_eq!(session.message.as_deref(), Some("Invalid email or password"));
    assert_eq!(session.token.as_deref(), Some("live-token"));
    assert!(!session.loading);
}

#[tokio::test]
async fn signup_success_leads_to_login() {
    let mut app = demo_app();
    assert_eq!(app.signup("new@x.com", "password1").await.unwrap(), Route::Login);
    let session = app.session();
    assert_eq!(session.message.as_deref(), Some(REGISTER_MESSAGE));
    assert!(session.pending_signup);
    assert_eq!(app.open(Route::Signup), Access::Redirect(Route::Login));
}

#[tokio::test]
async fn signup_failure_sets_message() {
    let api = RejectingApi::new(ApiError::Conflict("User already exists".into()));
    let mut app = App::new(SessionStore::new(MemoryStorage::new()), api);
    assert!(matches!(app.signup("a@x.com", "pw").await, Err(ViewError::Api(ApiError::Conflict(_)))));
    assert_eq!(app.session().message.as_deref(), Some("User already exists"));
    assert!(!app.session().pending_signup);
}

#[tokio::test]
async fn logout_clears_session_and_storage() {
    let mut app = demo_app();
    app.login("a@x.com", "pw").await.unwrap();
    assert_eq!(app.logout(), Route::Login);
    assert_eq!(app.session().token, None);
    assert_eq!(app.session().message.as_deref(), Some(LOGGED_OUT_MESSAGE));
    assert!(app.store().storage().is_empty());
}

// =============================================================================
// Private pages
// =============================================================================

#[tokio::test]
async fn private_calls_without_token_redirect_without_calling_api() {
    let api = RejectingApi::new(ApiError::generic("unreachable"));
    let mut app = App::new(SessionStore::new(MemoryStorage::new()), api.clone());

    assert_eq!(app.list_invoices().await.unwrap_err(), ViewError::Redirect(Route::Login));
    assert_eq!(app.invoice(1).await.unwrap_err().redirect(), Some(Route::Login));
    assert!(app.create_invoice(Some(1.0), None).await.is_err());
    assert!(app.update_invoice(1, &InvoiceUpdate::default()).await.is_err());
    assert!(app.delete_invoice(1).await.is_err());
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authorization_errors_force_logout() {
    for error in [
        ApiError::Unauthorized("Unauthorized - Please log in again".into()),
        ApiError::Forbidden("Forbidden - Access denied".into()),
        ApiError::InvalidToken("Invalid token - Please log in again".into()),
    ] {
        let mut app = App::new(signed_in_store(), RejectingApi::new(error.clone()));
        let err = app.list_invoices().await.unwrap_err();

        assert_eq!(err, ViewError::ForcedLogout(error));
        assert_eq!(err.redirect(), Some(Route::Login));
        assert_eq!(app.session().token, None);
        assert_eq!(app.session().user, None);
        assert!(app.store().storage().is_empty());
    }
}

#[tokio::test]
async fn other_errors_leave_session_unchanged() {
    for error in [
        ApiError::NotFound("Resource not found".into()),
        ApiError::Conflict("dup".into()),
        ApiError::Network("connection refused".into()),
        ApiError::generic("API error: 500"),
    ] {
        let mut app = App::new(signed_in_store(), RejectingApi::new(error.clone()));
        let before = app.session();
        let err = app.invoice(3).await.unwrap_err();

        assert_eq!(err, ViewError::Api(error));
        assert_eq!(err.redirect(), None);
        assert!(Arc::ptr_eq(&before, &app.session()));
    }
}

#[tokio::test]
async fn demo_token_left_over_from_live_mode_is_logged_out() {
    let mut app = App::new(signed_in_store(), Arc::new(DemoApi::new()));
    let err = app.list_invoices().await.unwrap_err();
    assert!(matches!(err, ViewError::ForcedLogout(ApiError::InvalidToken(_))));
    assert!(!app.session().is_authenticated());
}

#[tokio::test]
async fn create_requires_amount() {
    let mut app = demo_app();
    app.login("a@x.com", "pw").await.unwrap();
    assert_eq!(
        app.create_invoice(None, Some("2024-01-01")).await.unwrap_err(),
        ViewError::Invalid(MISSING_AMOUNT.to_owned())
    );
}

#[tokio::test]
async fn invoice_crud_through_demo_backend() {
    let mut app = demo_app();
    app.login("a@x.com", "pw").await.unwrap();

    let created = app.create_invoice(Some(42.0), Some("2024-07-04")).await.unwrap();
    assert_eq!(created.invoice_date, "2024-07-04");
    assert_eq!(app.list_invoices().await.unwrap()[0].id, created.id);

    let update = InvoiceUpdate { invoice_amount: Some(43.5), invoice_date: None };
    let updated = app.update_invoice(created.id, &update).await.unwrap();
    assert!((updated.invoice_amount - 43.5).abs() < f64::EPSILON);
    assert_eq!(app.invoice(created.id).await.unwrap(), updated);

    app.delete_invoice(created.id).await.unwrap();
    assert_eq!(app.list_invoices().await.unwrap().len(), 4);
}

#[tokio::test]
async fn create_defaults_date_to_today() {
    let mut app = demo_app();
    app.login("a@x.com", "pw").await.unwrap();
    let created = app.create_invoice(Some(1.0), Some("  ")).await.unwrap();
    assert_eq!(created.invoice_date, today());
    assert_eq!(created.invoice_date.len(), 10);
}

// =============================================================================
// Profile, messages, status
// =============================================================================

#[tokio::test]
async fn update_profile_merges_fields() {
    let mut app = demo_app();
    app.login("a@x.com", "pw").await.unwrap();
    let mut partial = Map::new();
    partial.insert("name".into(), json!("Bob"));

    let session = app.update_profile(partial);
    let user = session.user.as_ref().unwrap();
    assert_eq!(user.get("name"), Some(&json!("Bob")));
    assert_eq!(user.email(), Some(DEMO_EMAIL));
}

#[test]
fn clear_message_drops_message() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.dispatch(Action::set_error("boom"));
    let mut app = App::new(store, Arc::new(DemoApi::new()));
    assert_eq!(app.clear_message().message, None);
}

#[test]
fn status_reports_missing_token() {
    let app = demo_app();
    let report = app.status();
    assert_eq!(report.mode, ApiMode::Demo);
    assert!(!report.token_present);
    assert_eq!(report.token_length, 0);
    assert_eq!(report.token_preview, None);
    let text = report.to_string();
    assert!(text.contains("Token: MISSING"));
    assert!(text.contains("Backend URL: (none)"));
}

#[test]
fn status_previews_first_twenty_chars() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.dispatch(Action::login_success("abcdefghijklmnopqrstuvwxyz", None));
    let app = App::new(store, Arc::new(DemoApi::new()));

    let report = app.status();
    assert!(report.authenticated);
    assert_eq!(report.token_length, 26);
    assert_eq!(report.token_preview.as_deref(), Some("abcdefghijklmnopqrst..."));
    assert!(report.to_string().contains("Token: EXISTS"));
}
