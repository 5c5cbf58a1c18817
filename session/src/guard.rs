//! Route table and the access check run before every render.

use std::fmt;

use crate::session::Session;

/// Pages of the invoice app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    /// Invoice list.
    Dashboard,
    /// Single invoice view.
    Invoice(i64),
}

impl Route {
    /// Private routes require a token.
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, Self::Dashboard | Self::Invoice(_))
    }

    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Signup => "/signup".to_owned(),
            Self::Dashboard => "/private".to_owned(),
            Self::Invoice(id) => format!("/single/{id}"),
        }
    }

    /// Resolve a path. A trailing slash is ignored; unknown paths are `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = trimmed.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(trimmed);
        match trimmed {
            "/" | "" => Some(Self::Home),
            "/login" => Some(Self::Login),
            "/signup" => Some(Self::Signup),
            "/private" => Some(Self::Dashboard),
            other => other
                .strip_prefix("/single/")
                .and_then(|id| id.parse().ok())
                .map(Self::Invoice),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of [`guard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Render(Route),
    Redirect(Route),
}

impl Access {
    /// The route that ends up on screen.
    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }
}

/// Decide whether `route` renders for `session` or where it redirects.
#[must_use]
pub fn guard(route: Route, session: &Session) -> Access {
    if route.is_private() && !session.is_authenticated() {
        return Access::Redirect(Route::Login);
    }
    match route {
        Route::Login | Route::Signup if session.is_authenticated() => Access::Redirect(Route::Dashboard),
        Route::Signup if session.pending_signup => Access::Redirect(Route::Login),
        _ => Access::Render(route),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
