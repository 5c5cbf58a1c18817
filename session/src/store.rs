//! Session holder: rehydration plus dispatch.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails. Unreadable or corrupt storage during [`initialize`]
//! degrades to an absent token or user with a warning. Storage write failures
//! during [`SessionStore::dispatch`] are logged and the in-memory session still
//! advances.

use std::sync::Arc;

use crate::action::Action;
use crate::reducer::{StorageEffect, reduce};
use crate::session::Session;
use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};
use crate::user::User;

/// Build the startup session from persisted entries.
#[must_use]
pub fn initialize<S: KeyValueStore + ?Sized>(storage: &S) -> Session {
    let token = match storage.get(TOKEN_KEY) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "could not read persisted token");
            None
        }
    };

    let user = match storage.get(USER_KEY) {
        Ok(Some(raw)) => match User::from_json(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt persisted user");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "could not read persisted user");
            None
        }
    };

    Session { token, user, ..Session::default() }
}

fn apply_effect<S: KeyValueStore + ?Sized>(storage: &S, effect: &StorageEffect) -> Result<(), StorageError> {
    match effect {
        StorageEffect::SetToken(token) => storage.set(TOKEN_KEY, token),
        StorageEffect::SetUser(user) => storage.set(USER_KEY, user),
        StorageEffect::RemoveToken => storage.remove(TOKEN_KEY),
        StorageEffect::RemoveUser => storage.remove(USER_KEY),
    }
}

/// Owns the storage backend and the current session.
pub struct SessionStore<S> {
    storage: S,
    current: Arc<Session>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Rehydrate from `storage`.
    #[must_use]
    pub fn new(storage: S) -> Self {
        let current = Arc::new(initialize(&storage));
        tracing::debug!(authenticated = current.is_authenticated(), "session initialized");
        Self { storage, current }
    }

    /// Current session snapshot.
    #[must_use]
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.current)
    }

    /// Run one transition and mirror its storage effects.
    ///
    /// Returns the new snapshot. When nothing changed the previous `Arc` is
    /// returned, so `Arc::ptr_eq` detects a no-op.
    pub fn dispatch(&mut self, action: Action) -> Arc<Session> {
        tracing::debug!(action = action.kind(), "dispatch");
        let (next, effects) = reduce(&self.current, &action);

        for effect in &effects {
            if let Err(e) = apply_effect(&self.storage, effect) {
                tracing::error!(error = %e, ?effect, "session storage write failed");
            }
        }

        if next != *self.current {
            self.current = Arc::new(next);
        }
        self.session()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Tear down the holder and return its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
