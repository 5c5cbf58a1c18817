//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the session lifetime handed out at login.

use sqlx::PgPool;

/// Shared application state. Cheap to clone; the pool is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub session_ttl_secs: i64,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, session_ttl_secs: i64) -> Self {
        Self { pool, session_ttl_secs }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
