//! Server configuration parsed from environment variables.
//!
//! Required:
//! - `DATABASE_URL`
//!
//! Optional:
//! - `PORT`: default 3001
//! - `APP_ENV`: `development` enables test-user seeding
//! - `SESSION_TTL_SECS`: default 3600
//! - `DB_MAX_CONNECTIONS`: default 5

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub app_env: Option<String>,
    pub session_ttl_secs: i64,
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let app_env = lookup("APP_ENV").map(|v| v.trim().to_ascii_lowercase()).filter(|v| !v.is_empty());
        let session_ttl_secs = parse(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::Invalid { var: "SESSION_TTL_SECS", value: session_ttl_secs.to_string() });
        }

        Ok(Self {
            database_url,
            port: parse(&lookup, "PORT", DEFAULT_PORT)?,
            app_env,
            session_ttl_secs,
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
        })
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        self.app_env.as_deref() == Some("development")
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
