//! User record carried by an authenticated session.
//!
//! The backend guarantees an `email` field; everything else (`id`,
//! `is_active`, display name, ...) is open-ended so profile updates can merge
//! arbitrary fields without a schema change on the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as returned by the login endpoint and kept in the session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    /// Build a user with only an email address.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("email".to_owned(), Value::String(email.into()));
        Self(fields)
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Overlay `partial` onto this record. Fields present in `partial` win;
    /// every other field is preserved.
    #[must_use]
    pub fn merged(&self, partial: &Map<String, Value>) -> Self {
        let mut fields = self.0.clone();
        for (key, value) in partial {
            fields.insert(key.clone(), value.clone());
        }
        Self(fields)
    }

    /// Parse a persisted user entry. Only JSON objects are accepted.
    ///
    /// # Errors
    ///
    /// Returns the serde error when `raw` is not valid JSON or not an object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize for the persistent store.
    #[must_use]
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for User {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
