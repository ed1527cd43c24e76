//! Role-gated navigation.
//!
//! The action list is derived from the session snapshot on every call. Hiding
//! an action only spares the user a doomed request; it grants nothing.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use crate::routes::Route;
use crate::state::role::{ADMIN_ONLY, EMPLOYER_OR_ADMIN, JOB_SEEKER_ONLY};
use crate::state::session::SessionSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavAction {
    BrowseJobs,
    BrowseCompanies,
    SignIn,
    SignUp,
    MyApplications,
    CreateJob,
    RegisterCompany,
    EmployerDashboard,
    AdminBoard,
    AdminDashboard,
    Profile,
    Logout,
}

impl NavAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BrowseJobs => "Jobs",
            Self::BrowseCompanies => "Companies",
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::MyApplications => "My Applications",
            Self::CreateJob => "Create Job",
            Self::RegisterCompany => "Register Company",
            Self::EmployerDashboard => "Dashboard",
            Self::AdminBoard => "Test",
            Self::AdminDashboard => "Admin",
            Self::Profile => "Profile",
            Self::Logout => "Logout",
        }
    }

    /// Destination screen. `Logout` is an action, not a place.
    #[must_use]
    pub fn route(self) -> Option<Route> {
        let route = match self {
            Self::BrowseJobs => Route::Jobs,
            Self::BrowseCompanies => Route::Companies,
            Self::SignIn => Route::SignIn,
            Self::SignUp => Route::SignUp,
            Self::MyApplications => Route::MyApplications,
            Self::CreateJob => Route::CreateJob,
            Self::RegisterCompany => Route::RegisterCompany,
            Self::EmployerDashboard => Route::EmployerDashboard,
            Self::AdminBoard => Route::TestBoard,
            Self::AdminDashboard => Route::AdminDashboard,
            Self::Profile => Route::Profile,
            Self::Logout => return None,
        };
        Some(route)
    }
}

/// Actions to show for `snapshot`, in header order.
#[must_use]
pub fn visible_actions(snapshot: &SessionSnapshot) -> Vec<NavAction> {
    let mut actions = vec![NavAction::BrowseJobs, NavAction::BrowseCompanies];
    if !snapshot.is_logged_in || snapshot.identity.is_none() {
        actions.extend([NavAction::SignIn, NavAction::SignUp]);
        return actions;
    }

    if snapshot.has_any_role(JOB_SEEKER_ONLY) {
        actions.push(NavAction::MyApplications);
    }
    if snapshot.has_any_role(EMPLOYER_OR_ADMIN) {
        actions.extend([NavAction::CreateJob, NavAction::RegisterCompany, NavAction::EmployerDashboard]);
    }
    if snapshot.has_any_role(ADMIN_ONLY) {
        actions.extend([NavAction::AdminBoard, NavAction::AdminDashboard]);
    }
    actions.extend([NavAction::Profile, NavAction::Logout]);
    actions
}
