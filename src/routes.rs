//! Route table for the portal.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every screen is addressed by a path. [`Route::parse`] maps a path to a
//! screen and [`Route::access`] says who may open it; the guards in
//! [`crate::util::auth`] turn that into a redirect decision.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;

use crate::state::role::{ADMIN_ONLY, EMPLOYER_OR_ADMIN, JOB_SEEKER_ONLY, Role};

/// Who may open a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user.
    Authenticated,
    /// Signed in and holding at least one of these roles.
    AnyRole(&'static [Role]),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    RegistrationConfirm,
    Jobs,
    JobDetail(String),
    Companies,
    CompanyDetail(String),
    CreateJob,
    EditJob(String),
    RegisterCompany,
    EditCompany(String),
    JobApplications(String),
    EmployerDashboard,
    Apply(String),
    MyApplications,
    Profile,
    TestBoard,
    AdminDashboard,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::SignIn => "/signin".to_owned(),
            Self::SignUp => "/signup".to_owned(),
            Self::RegistrationConfirm => "/registrationConfirm".to_owned(),
            Self::Jobs => "/jobs".to_owned(),
            Self::JobDetail(id) => format!("/jobs/{id}"),
            Self::Companies => "/companies".to_owned(),
            Self::CompanyDetail(id) => format!("/companies/{id}"),
            Self::CreateJob => "/jobs/create".to_owned(),
            Self::EditJob(id) => format!("/jobs/edit/{id}"),
            Self::RegisterCompany => "/companies/register".to_owned(),
            Self::EditCompany(id) => format!("/companies/edit/{id}"),
            Self::JobApplications(id) => format!("/applications/job/{id}"),
            Self::EmployerDashboard => "/employer/dashboard".to_owned(),
            Self::Apply(id) => format!("/apply/{id}"),
            Self::MyApplications => "/my-applications".to_owned(),
            Self::Profile => "/profile".to_owned(),
            Self::TestBoard => "/test".to_owned(),
            Self::AdminDashboard => "/admin".to_owned(),
        }
    }

    /// Resolve a path (query string and trailing slash ignored).
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["signin"] => Self::SignIn,
            ["signup"] => Self::SignUp,
            ["registrationConfirm"] => Self::RegistrationConfirm,
            ["jobs"] => Self::Jobs,
            ["jobs" | "companies", "edit"] => return None,
            ["jobs", "create"] => Self::CreateJob,
            ["jobs", "edit", job] => Self::EditJob((*job).to_owned()),
            ["jobs", job] => Self::JobDetail((*job).to_owned()),
            ["companies"] => Self::Companies,
            ["companies", "register"] => Self::RegisterCompany,
            ["companies", "edit", company] => Self::EditCompany((*company).to_owned()),
            ["companies", company] => Self::CompanyDetail((*company).to_owned()),
            ["applications", "job", job] => Self::JobApplications((*job).to_owned()),
            ["employer", "dashboard"] => Self::EmployerDashboard,
            ["apply", job] => Self::Apply((*job).to_owned()),
            ["my-applications"] => Self::MyApplications,
            ["profile"] => Self::Profile,
            ["test"] => Self::TestBoard,
            ["admin"] => Self::AdminDashboard,
            _ => return None,
        };
        Some(route)
    }

    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Self::Home
            | Self::SignIn
            | Self::SignUp
            | Self::RegistrationConfirm
            | Self::Jobs
            | Self::JobDetail(_)
            | Self::Companies
            | Self::CompanyDetail(_) => Access::Public,
            Self::CreateJob
            | Self::EditJob(_)
            | Self::RegisterCompany
            | Self::EditCompany(_)
            | Self::JobApplications(_)
            | Self::EmployerDashboard => Access::AnyRole(EMPLOYER_OR_ADMIN),
            Self::Apply(_) | Self::MyApplications => Access::AnyRole(JOB_SEEKER_ONLY),
            Self::Profile => Access::Authenticated,
            Self::TestBoard | Self::AdminDashboard => Access::AnyRole(ADMIN_ONLY),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
