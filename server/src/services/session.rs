//! Bearer session management.
//!
//! ARCHITECTURE
//! ============
//! Login issues an opaque 32-byte random token. Only its SHA-256 digest is
//! stored, so a leaked `sessions` table cannot be replayed. Each request
//! hashes the presented token and looks it up along with its expiry.
//!
//! TRADE-OFFS
//! ==========
//! Expired rows are purged lazily whenever a new session is created rather
//! than by a background task.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use time::{Duration, OffsetDateTime};

use super::auth::UserRow;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Storage key for a token.
#[must_use]
pub fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.as_bytes()))
}

/// Create a session for `user_id` lasting `ttl_secs`, returning the raw token.
///
/// # Errors
///
/// Returns the database error if the insert fails.
pub async fn create_session(pool: &PgPool, user_id: i64, ttl_secs: i64) -> Result<String, sqlx::Error> {
    let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?
        .rows_affected();
    if purged > 0 {
        tracing::debug!(purged, "expired sessions removed");
    }

    let token = generate_token();
    let expires_at = OffsetDateTime::now_utc() + Duration::seconds(ttl_secs);
    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Resolve a raw token to its active, unexpired user.
///
/// # Errors
///
/// Returns the database error if the lookup fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<UserRow>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.email, u.is_active
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token_hash = $1 AND s.expires_at > now() AND u.is_active",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| UserRow { id: r.get("id"), email: r.get("email"), is_active: r.get("is_active") }))
}

/// Delete a session by raw token.
///
/// # Errors
///
/// Returns the database error if the delete fails.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
