//! Application tracking views: the job seeker's own list and an employer's
//! per-job review list.

#[cfg(test)]
#[path = "applications_test.rs"]
mod applications_test;

use crate::net::api::{ApiClient, Operation};
use crate::net::error::ApiError;
use crate::net::types::{ApplicationStatus, JobApplication};
use crate::state::list::ListState;

/// Applications submitted by the signed-in user.
#[derive(Clone, Debug, Default)]
pub struct MyApplications {
    pub list: ListState<JobApplication>,
}

impl MyApplications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        let ticket = self.list.begin_fetch();
        let result = api.my_applications().await;
        self.list
            .apply_items(ticket, result, Operation::ApplicationsByUser.failure_message());
    }

    /// # Errors
    ///
    /// Returns the gateway failure; the row stays so the user can retry.
    pub async fn withdraw(&mut self, api: &ApiClient, application_id: &str) -> Result<(), ApiError> {
        self.list.message = None;
        match api.withdraw_application(application_id).await {
            Ok(()) => {
                self.list.remove_where(|a| a.id == application_id);
                self.list.message = Operation::WithdrawApplication.success_message().map(str::to_owned);
                Ok(())
            }
            Err(err) => {
                self.list.error = Some(err.user_message(Operation::WithdrawApplication.failure_message()));
                Err(err)
            }
        }
    }
}

/// Applications received for one job posting.
#[derive(Clone, Debug)]
pub struct JobApplicationsView {
    pub job_id: String,
    pub list: ListState<JobApplication>,
}

impl JobApplicationsView {
    #[must_use]
    pub fn new(job_id: impl Into<String>) -> Self {
        Self { job_id: job_id.into(), list: ListState::new() }
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        let ticket = self.list.begin_fetch();
        let result = api.applications_by_job(&self.job_id).await;
        self.list
            .apply_items(ticket, result, Operation::ApplicationsByJob.failure_message());
    }

    /// Move an application to `status` and show the server's copy.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; the row keeps its previous status.
    pub async fn set_status(
        &mut self,
        api: &ApiClient,
        application_id: &str,
        status: &ApplicationStatus,
    ) -> Result<(), ApiError> {
        self.list.message = None;
        match api.update_application_status(application_id, status).await {
            Ok(updated) => {
                self.list.replace_where(|a| a.id == application_id, updated);
                self.list.message = Operation::UpdateApplicationStatus.success_message().map(str::to_owned);
                Ok(())
            }
            Err(err) => {
                self.list.error = Some(err.user_message(Operation::UpdateApplicationStatus.failure_message()));
                Err(err)
            }
        }
    }
}
