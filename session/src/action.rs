//! Action vocabulary dispatched into the session store.
//!
//! Wire form is `{"type": "LOGIN_SUCCESS", "payload": {...}}`. Decoding never
//! fails: anything that does not match a known action (unknown or missing
//! `type`, malformed payload) becomes [`Action::Unrecognized`], which the
//! reducer treats as a logged no-op.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::user::User;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Credentials accepted by the backend.
    LoginSuccess {
        token: String,
        #[serde(default)]
        user: Option<User>,
    },
    /// Explicit or forced logout. Leaves a "logged out" message.
    Logout,
    /// Silent logout: clears credentials without a message.
    ClearToken,
    /// Re-adopt a previously issued token without touching storage.
    RestoreToken {
        token: String,
        #[serde(default)]
        user: Option<User>,
    },
    SignupSuccess { message: String },
    SetError { message: String },
    ClearMessage,
    SetLoading(bool),
    /// Partial user fields merged over the current user.
    UpdateUser(Map<String, Value>),
    /// Anything outside the vocabulary. `kind` is the raw `type` string.
    #[serde(skip)]
    Unrecognized { kind: String },
}

impl Action {
    #[must_use]
    pub fn login_success(token: impl Into<String>, user: Option<User>) -> Self {
        Self::LoginSuccess { token: token.into(), user }
    }

    #[must_use]
    pub fn signup_success(message: impl Into<String>) -> Self {
        Self::SignupSuccess { message: message.into() }
    }

    #[must_use]
    pub fn set_error(message: impl Into<String>) -> Self {
        Self::SetError { message: message.into() }
    }

    #[must_use]
    pub fn update_user(partial: Map<String, Value>) -> Self {
        Self::UpdateUser(partial)
    }

    /// Wire name of the action.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::LoginSuccess { .. } => "LOGIN_SUCCESS",
            Self::Logout => "LOGOUT",
            Self::ClearToken => "CLEAR_TOKEN",
            Self::RestoreToken { .. } => "RESTORE_TOKEN",
            Self::SignupSuccess { .. } => "SIGNUP_SUCCESS",
            Self::SetError { .. } => "SET_ERROR",
            Self::ClearMessage => "CLEAR_MESSAGE",
            Self::SetLoading(_) => "SET_LOADING",
            Self::UpdateUser(_) => "UPDATE_USER",
            Self::Unrecognized { kind } => kind,
        }
    }

    /// Decode a wire action. Never fails; see module docs.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!(kind, error = %e, "action did not decode");
                Self::Unrecognized { kind: kind.to_owned() }
            }
        }
    }

    /// Decode a wire action from a JSON string. Invalid JSON is unrecognized.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::debug!(error = %e, "action is not valid JSON");
                Self::Unrecognized { kind: String::new() }
            }
        }
    }

    /// Encode to the wire form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Unrecognized { kind } => json!({ "type": kind }),
            other => serde_json::to_value(other).unwrap_or_else(|_| json!({ "type": other.kind() })),
        }
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
