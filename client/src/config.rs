//! Client configuration parsed from environment variables.
//!
//! - `INVOICE_BACKEND_URL`: REST backend base URL. Absent means demo mode.
//! - `INVOICE_DEMO_MODE`: force demo mode even when a URL is set.
//! - `INVOICE_REQUEST_TIMEOUT_SECS`: default 30
//! - `INVOICE_CONNECT_TIMEOUT_SECS`: default 10
//! - `INVOICE_DEMO_LATENCY_MS`: simulated demo latency, default 0

use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DEMO_LATENCY_MS: u64 = 0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    /// Trimmed, without trailing slashes. `None` when unset or blank.
    pub backend_url: Option<String>,
    pub demo_mode: bool,
    pub timeouts: Timeouts,
    pub demo_latency: Duration,
}

impl ClientConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup("INVOICE_BACKEND_URL")
            .map(|raw| raw.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty());

        let demo_flag = match lookup("INVOICE_DEMO_MODE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "INVOICE_DEMO_MODE", value: raw })?,
            None => false,
        };

        let timeouts = Timeouts {
            request_secs: parse_u64(&lookup, "INVOICE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "INVOICE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let demo_latency =
            Duration::from_millis(parse_u64(&lookup, "INVOICE_DEMO_LATENCY_MS", DEFAULT_DEMO_LATENCY_MS)?);

        Ok(Self { demo_mode: demo_flag || backend_url.is_none(), backend_url, timeouts, demo_latency })
    }

    /// Live configuration pointed at `url`.
    #[must_use]
    pub fn live(url: &str) -> Self {
        Self {
            backend_url: Some(url.trim().trim_end_matches('/').to_owned()),
            demo_mode: false,
            ..Self::default()
        }
    }

    /// Demo configuration with no simulated latency.
    #[must_use]
    pub fn demo() -> Self {
        Self { demo_mode: true, ..Self::default() }
    }
}

/// Accepts `1/true/yes/on` and `0/false/no/off`, case-insensitive.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
