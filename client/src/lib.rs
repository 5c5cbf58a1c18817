//! Invoice API client and the view-layer controller built on it.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`App`] is what a front end drives. It owns a `session::SessionStore` and an
//! [`InvoiceApi`] implementation chosen by [`ClientConfig`]: [`HttpApi`] talks
//! to the REST backend, [`DemoApi`] answers from in-process seed data. Every
//! protected call checks the route guard first, and any authorization-class
//! [`ApiError`] forces a logout.

pub mod api;
pub mod app;
pub mod config;

pub use api::demo::DemoApi;
pub use api::error::ApiError;
pub use api::http::HttpApi;
pub use api::types::{Invoice, InvoiceFields, InvoiceUpdate, LoginResponse, RegisterResponse};
pub use api::{ApiMode, InvoiceApi, build_api};
pub use app::{App, StatusReport, ViewError};
pub use config::{ClientConfig, ConfigError};
