//! Route guards.
//!
//! DESIGN
//! ======
//! A guarded screen starts in [`GuardState::Checking`]. The first check moves
//! it to `Authorized` or `Redirecting`. `Redirecting` is terminal for the
//! guard: the screen navigates away and renders nothing further. `Authorized`
//! is re-evaluated on every check because roles are read fresh from the
//! session each time, never cached.
//!
//! Missing session and missing role are distinct outcomes: the first goes to
//! sign-in, the second goes home.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::routes::{Access, Route};
use crate::state::session::{SessionSnapshot, SessionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No session: send the visitor to sign in.
    RedirectToSignIn,
    /// Signed in without a required role: send the user home.
    RedirectToHome,
}

impl GuardDecision {
    #[must_use]
    pub fn redirect_target(self) -> Option<Route> {
        match self {
            Self::Allow => None,
            Self::RedirectToSignIn => Some(Route::SignIn),
            Self::RedirectToHome => Some(Route::Home),
        }
    }
}

fn is_authenticated(snapshot: &SessionSnapshot) -> bool {
    snapshot.is_logged_in && snapshot.identity.is_some()
}

/// Decide whether `snapshot` may open a route with `access`.
#[must_use]
pub fn authorize(access: Access, snapshot: &SessionSnapshot) -> GuardDecision {
    match access {
        Access::Public => GuardDecision::Allow,
        _ if !is_authenticated(snapshot) => GuardDecision::RedirectToSignIn,
        Access::Authenticated => GuardDecision::Allow,
        Access::AnyRole(roles) if snapshot.has_any_role(roles) => GuardDecision::Allow,
        Access::AnyRole(_) => GuardDecision::RedirectToHome,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authorized,
    Redirecting(Route),
}

/// Per-mount guard for one screen.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    route: Route,
    state: GuardState,
}

impl RouteGuard {
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self { route, state: GuardState::Checking }
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Evaluate the guard against the current session.
    pub fn check(&mut self, snapshot: &SessionSnapshot) -> &GuardState {
        if matches!(self.state, GuardState::Redirecting(_)) {
            return &self.state;
        }
        self.state = match authorize(self.route.access(), snapshot).redirect_target() {
            None => GuardState::Authorized,
            Some(target) => {
                tracing::debug!(route = %self.route, target = %target, "guard redirect");
                GuardState::Redirecting(target)
            }
        };
        &self.state
    }

    pub fn check_session(&mut self, session: &SessionStore) -> &GuardState {
        self.check(&session.snapshot())
    }
}
