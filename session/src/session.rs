//! The session value itself.

use crate::user::User;

/// Client-held authentication state plus the transient UI message.
///
/// `token` and `user` normally move together, but a token without a user is
/// a legal state (e.g. a restored token before the profile is known) and must
/// not be treated as corruption.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    /// Opaque bearer credential.
    pub token: Option<String>,
    /// Current user record, if known.
    pub user: Option<User>,
    /// Status or error text for the next render; cleared by `CLEAR_MESSAGE`.
    pub message: Option<String>,
    /// Set by a completed signup so the view routes to the login page.
    pub pending_signup: bool,
    /// A request is in flight on behalf of the session.
    pub loading: bool,
}

impl Session {
    /// Derived on read from token presence. Never stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(User::email)
    }
}
