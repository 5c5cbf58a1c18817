//! Pure transition function for the session store.
//!
//! DESIGN
//! ======
//! `reduce` never touches storage. It returns the replacement session plus a
//! list of [`StorageEffect`]s describing the writes that keep the persistent
//! store mirroring `token` and `user`. The holder in `store.rs` applies them.
//! Every call builds a fresh `Session`; the input is never mutated.

use crate::action::Action;
use crate::session::Session;
use crate::user::User;

pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";

/// A write the persistent store must receive after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageEffect {
    SetToken(String),
    /// Serialized user JSON.
    SetUser(String),
    RemoveToken,
    RemoveUser,
}

/// Apply `action` to `session`, returning the new session and the storage
/// writes it implies.
#[must_use]
pub fn reduce(session: &Session, action: &Action) -> (Session, Vec<StorageEffect>) {
    match action {
        Action::LoginSuccess { token, user } => {
            let mut effects = vec![StorageEffect::SetToken(token.clone())];
            effects.push(match user {
                Some(user) => StorageEffect::SetUser(user.to_json()),
                None => StorageEffect::RemoveUser,
            });
            let next = Session {
                token: Some(token.clone()),
                user: user.clone(),
                message: None,
                pending_signup: false,
                loading: false,
            };
            (next, effects)
        }
        Action::Logout => {
            let next = Session {
                token: None,
                user: None,
                message: Some(LOGGED_OUT_MESSAGE.to_owned()),
                loading: false,
                ..session.clone()
            };
            (next, vec![StorageEffect::RemoveToken, StorageEffect::RemoveUser])
        }
        Action::ClearToken => {
            let next = Session {
                token: None,
                user: None,
                message: None,
                loading: false,
                ..session.clone()
            };
            (next, vec![StorageEffect::RemoveToken, StorageEffect::RemoveUser])
        }
        Action::RestoreToken { token, user } => {
            let next = Session {
                token: Some(token.clone()),
                user: user.clone().or_else(|| session.user.clone()),
                loading: false,
                ..session.clone()
            };
            (next, Vec::new())
        }
        Action::SignupSuccess { message } => {
            let next = Session {
                message: Some(message.clone()),
                pending_signup: true,
                loading: false,
                ..session.clone()
            };
            (next, Vec::new())
        }
        Action::SetError { message } => {
            let next = Session {
                message: Some(message.clone()),
                loading: false,
                ..session.clone()
            };
            (next, Vec::new())
        }
        // Dismissing the signup notice also ends the signup-to-login redirect.
        Action::ClearMessage => {
            let next = Session { message: None, pending_signup: false, ..session.clone() };
            (next, Vec::new())
        }
        Action::SetLoading(loading) => {
            let next = Session { loading: *loading, ..session.clone() };
            (next, Vec::new())
        }
        Action::UpdateUser(partial) => {
            let merged = session.user.as_ref().map_or_else(
                || User::from(partial.clone()),
                |user| user.merged(partial),
            );
            let effects = vec![StorageEffect::SetUser(merged.to_json())];
            let next = Session { user: Some(merged), ..session.clone() };
            (next, effects)
        }
        Action::Unrecognized { kind } => {
            tracing::warn!(kind = %kind, "unrecognized session action ignored");
            (session.clone(), Vec::new())
        }
    }
}

/// [`reduce`] without the storage effects.
#[must_use]
pub fn transition(session: &Session, action: &Action) -> Session {
    reduce(session, action).0
}

#[cfg(test)]
#[path = "reducer_test.rs"]
mod tests;
