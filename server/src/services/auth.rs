//! Email and password accounts.
//!
//! DESIGN
//! ======
//! Emails are normalized before every lookup so `Alice@Example.com ` and
//! `alice@example.com` name the same account. Unknown email, wrong password
//! and inactive account all answer the same `InvalidCredentials` so the
//! login endpoint does not reveal which accounts exist.

use sqlx::{PgPool, Row};

use super::is_unique_violation;
use super::password::{self, MIN_PASSWORD_LEN};

pub const DEV_USER_EMAIL: &str = "test@example.com";
pub const DEV_USER_PASSWORD: &str = "testpassword";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),
    #[error("User already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Public view of a user row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let mut parts = normalized.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Some(normalized),
        _ => None,
    }
}

/// Validate signup input, returning the normalized email.
///
/// # Errors
///
/// Returns the first input rule the pair breaks.
pub fn validate_signup(email: &str, password: &str) -> Result<String, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    let email = normalize_email(email).ok_or(AuthError::InvalidEmail)?;
    if !password::is_strong_enough(password) {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
    }
    Ok(email)
}

/// Create a new active account.
///
/// # Errors
///
/// Returns a validation error, `EmailTaken` for a duplicate, or the
/// underlying hash/database failure.
pub async fn register_user(pool: &PgPool, email: &str, password: &str) -> Result<UserRow, AuthError> {
    let email = validate_signup(email, password)?;
    let hash = password::hash_password(password).map_err(|e| AuthError::Hash(e.to_string()))?;

    let row = sqlx::query(
        r"INSERT INTO users (email, password_hash)
          VALUES ($1, $2)
          RETURNING id, email, is_active",
    )
    .bind(&email)
    .bind(&hash)
    .fetch_one(pool)
    .await
    .map_err(|e| if is_unique_violation(&e) { AuthError::EmailTaken } else { AuthError::Database(e) })?;

    let user = UserRow { id: row.get("id"), email: row.get("email"), is_active: row.get("is_active") };
    tracing::info!(user_id = user.id, "user registered");
    Ok(user)
}

/// Check credentials and return the matching active user.
///
/// # Errors
///
/// Returns `InvalidCredentials` for any mismatch, or the underlying failure.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<UserRow, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    let Some(email) = normalize_email(email) else {
        return Err(AuthError::InvalidCredentials);
    };

    let row = sqlx::query("SELECT id, email, password_hash, is_active FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Err(AuthError::InvalidCredentials);
    };

    let stored: String = row.get("password_hash");
    let matches = password::verify_password(password, &stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    let is_active: bool = row.get("is_active");
    if !matches || !is_active {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(UserRow { id: row.get("id"), email: row.get("email"), is_active })
}

/// Create the development account if it does not exist yet.
///
/// # Errors
///
/// Returns the underlying hash/database failure.
pub async fn seed_dev_user(pool: &PgPool) -> Result<(), AuthError> {
    match register_user(pool, DEV_USER_EMAIL, DEV_USER_PASSWORD).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, email = DEV_USER_EMAIL, "development user created");
            Ok(())
        }
        Err(AuthError::EmailTaken) => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
