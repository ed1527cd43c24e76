//! REST gateway for the job portal backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every screen talks to the backend through [`ApiClient`]. It reads the
//! current access token from the [`SessionStore`] at call time (never a cached
//! copy), attaches it as a bearer header according to the endpoint's [`Auth`]
//! class, and reports outcomes uniformly.
//!
//! ERROR HANDLING
//! ==============
//! Failures are always returned to the caller. Named mutations additionally
//! raise exactly one notification; read-only fetches leave display to the
//! calling screen. There is no retry and no automatic refresh on 401.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{ApiRequest, HttpTransport, Transport};
use super::types::{
    ApplicationPayload, ApplicationStatus, AuthResponse, Company, CompanyPayload, CompanySearch, Job,
    JobApplication, JobFilter, JobPayload, JobSearch, MessageResponse, Page, RefreshRequest, SignInRequest,
    SignUpRequest, StatusUpdate, TokenRefreshResponse,
};
use crate::config::PortalConfig;
use crate::state::notify::{Notification, Notifier, TracingNotifier};
use crate::state::role::Role;
use crate::state::session::SessionStore;

const AUTH_BASE: &str = "/api/auth";
const JOBS_BASE: &str = "/api/jobs";
const COMPANIES_BASE: &str = "/api/companies";
const APPLICATIONS_BASE: &str = "/api/applications";
const TEST_BASE: &str = "/api/test";

// =============================================================================
// OPERATIONS
// =============================================================================

/// How an endpoint treats the bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// Never send a token (sign-in, sign-up, refresh, public content).
    None,
    /// Send the token when signed in (public browsing).
    Optional,
    /// Send the token; without a session the call fails locally.
    Required,
}

/// Every remote operation the gateway exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    SignIn,
    SignUp,
    RefreshToken,
    Logout,
    ConfirmRegistration,
    ListJobs,
    SearchJobs,
    FilterJobs,
    GetJob,
    JobsByCompany,
    CreateJob,
    UpdateJob,
    DeleteJob,
    RegisterCompany,
    UpdateCompany,
    GetCompany,
    SearchCompanies,
    VerifyCompany,
    ApplyForJob,
    UpdateApplicationStatus,
    ApplicationsByJob,
    ApplicationsByUser,
    WithdrawApplication,
    PublicContent,
    UserContent,
    EmployerContent,
    AdminContent,
}

impl Operation {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
            Self::RefreshToken => "refresh_token",
            Self::Logout => "logout",
            Self::ConfirmRegistration => "confirm_registration",
            Self::ListJobs => "list_jobs",
            Self::SearchJobs => "search_jobs",
            Self::FilterJobs => "filter_jobs",
            Self::GetJob => "get_job",
            Self::JobsByCompany => "jobs_by_company",
            Self::CreateJob => "create_job",
            Self::UpdateJob => "update_job",
            Self::DeleteJob => "delete_job",
            Self::RegisterCompany => "register_company",
            Self::UpdateCompany => "update_company",
            Self::GetCompany => "get_company",
            Self::SearchCompanies => "search_companies",
            Self::VerifyCompany => "verify_company",
            Self::ApplyForJob => "apply_for_job",
            Self::UpdateApplicationStatus => "update_application_status",
            Self::ApplicationsByJob => "applications_by_job",
            Self::ApplicationsByUser => "applications_by_user",
            Self::WithdrawApplication => "withdraw_application",
            Self::PublicContent => "public_content",
            Self::UserContent => "user_content",
            Self::EmployerContent => "employer_content",
            Self::AdminContent => "admin_content",
        }
    }

    #[must_use]
    pub fn auth(self) -> Auth {
        match self {
            Self::SignIn | Self::SignUp | Self::RefreshToken | Self::ConfirmRegistration | Self::PublicContent => {
                Auth::None
            }
            Self::ListJobs
            | Self::SearchJobs
            | Self::FilterJobs
            | Self::GetJob
            | Self::JobsByCompany
            | Self::GetCompany
            | Self::SearchCompanies => Auth::Optional,
            Self::Logout
            | Self::CreateJob
            | Self::UpdateJob
            | Self::DeleteJob
            | Self::RegisterCompany
            | Self::UpdateCompany
            | Self::VerifyCompany
            | Self::ApplyForJob
            | Self::UpdateApplicationStatus
            | Self::ApplicationsByJob
            | Self::ApplicationsByUser
            | Self::WithdrawApplication
            | Self::UserContent
            | Self::EmployerContent
            | Self::AdminContent => Auth::Required,
        }
    }

    /// Toast text on success; `Some` exactly for named mutations.
    #[must_use]
    pub fn success_message(self) -> Option<&'static str> {
        let text = match self {
            Self::SignIn => "Signed in successfully.",
            Self::SignUp => "Sign-up successful! Please check your email for verification.",
            Self::CreateJob => "Job created successfully!",
            Self::UpdateJob => "Job updated successfully!",
            Self::DeleteJob => "Job deleted successfully!",
            Self::RegisterCompany => "Company registered successfully!",
            Self::UpdateCompany => "Company updated successfully!",
            Self::VerifyCompany => "Company verified successfully!",
            Self::ApplyForJob => "Application submitted successfully!",
            Self::UpdateApplicationStatus => "Application status updated successfully!",
            Self::WithdrawApplication => "Application withdrawn successfully!",
            _ => return None,
        };
        Some(text)
    }

    /// Fallback failure text when the server gives no message.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::SignIn => "Sign-in failed",
            Self::SignUp => "Sign-up failed",
            Self::RefreshToken => "Session refresh failed",
            Self::Logout => "Logout failed",
            Self::ConfirmRegistration => "Verification failed.",
            Self::ListJobs | Self::SearchJobs | Self::FilterJobs => "Failed to fetch jobs",
            Self::GetJob => "Failed to fetch job details",
            Self::JobsByCompany => "Failed to fetch posted jobs.",
            Self::CreateJob => "Failed to create job",
            Self::UpdateJob => "Failed to update job",
            Self::DeleteJob => "Failed to delete job",
            Self::RegisterCompany => "Failed to register company",
            Self::UpdateCompany => "Failed to update company",
            Self::GetCompany => "Failed to fetch company details",
            Self::SearchCompanies => "Failed to fetch companies",
            Self::VerifyCompany => "Failed to verify company",
            Self::ApplyForJob => "Failed to submit application",
            Self::UpdateApplicationStatus => "Failed to update status",
            Self::ApplicationsByJob => "Failed to fetch applications",
            Self::ApplicationsByUser => "Failed to fetch your applications",
            Self::WithdrawApplication => "Failed to withdraw application",
            Self::PublicContent => "Failed to fetch public content",
            Self::UserContent => "Access Denied for User Content.",
            Self::EmployerContent => "Access Denied for Employer Content.",
            Self::AdminContent => "Access Denied for Admin Content.",
        }
    }

    #[must_use]
    pub fn is_named_mutation(self) -> bool {
        self.success_message().is_some()
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

fn auth_endpoint(action: &str) -> String {
    format!("{AUTH_BASE}/{action}")
}

fn job_endpoint(job_id: &str) -> String {
    format!("{JOBS_BASE}/{}", segment(job_id))
}

fn jobs_by_company_endpoint(company_id: &str) -> String {
    format!("{JOBS_BASE}/company/{}", segment(company_id))
}

fn company_endpoint(company_id: &str) -> String {
    format!("{COMPANIES_BASE}/{}", segment(company_id))
}

fn verify_company_endpoint(company_id: &str) -> String {
    format!("{COMPANIES_BASE}/{}/verify", segment(company_id))
}

fn application_endpoint(application_id: &str) -> String {
    format!("{APPLICATIONS_BASE}/{}", segment(application_id))
}

fn applications_by_job_endpoint(job_id: &str) -> String {
    format!("{APPLICATIONS_BASE}/job/{}", segment(job_id))
}

fn applications_by_user_endpoint(user_id: &str) -> String {
    format!("{APPLICATIONS_BASE}/user/{}", segment(user_id))
}

fn content_endpoint(tier: &str) -> String {
    format!("{TEST_BASE}/{tier}")
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
            .map(str::to_owned)
            .or_else(|| value.as_str().map(str::to_owned));
    }
    // Short plain-text bodies are messages; HTML error pages are not.
    if trimmed.len() <= 200 && !trimmed.starts_with('<') {
        return Some(trimmed.to_owned());
    }
    None
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_message(body: &str) -> Result<MessageResponse, ApiError> {
    if body.trim().is_empty() {
        return Ok(MessageResponse::default());
    }
    match serde_json::from_str::<MessageResponse>(body) {
        Ok(message) => Ok(message),
        Err(_) => Ok(MessageResponse { message: decode_text(body) }),
    }
}

/// Content endpoints answer with plain text, sometimes JSON-quoted.
fn decode_text(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_owned())
}

fn with_body<B: Serialize>(request: ApiRequest, body: &B) -> Result<ApiRequest, ApiError> {
    let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body: {e}")))?;
    Ok(request.json(value))
}

fn failure_text(op: Operation, err: &ApiError) -> String {
    match err {
        ApiError::Status { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
        _ => format!("{}: {err}", op.failure_message()),
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed gateway to the backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { transport, session, notifier }
    }

    /// HTTP gateway for `config`, notifying through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &PortalConfig, session: SessionStore) -> Result<Self, ApiError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport), session, Arc::new(TracingNotifier)))
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Sign in and, on success, replace the session with the returned identity.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP failure, or [`ApiError::InvalidAuthResponse`]
    /// when the body cannot be turned into a session.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let result = self.sign_in_inner(username, password).await;
        self.report(Operation::SignIn, result)
    }

    async fn sign_in_inner(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = with_body(
            ApiRequest::new(Method::POST, auth_endpoint("signin")),
            &SignInRequest { username, password },
        )?;
        let body = self.execute(Operation::SignIn, request).await?;
        let auth = AuthResponse::parse(&body).map_err(ApiError::InvalidAuthResponse)?;
        self.session
            .set_auth(auth.access_token.clone(), auth.refresh_token.clone(), auth.identity.clone());
        Ok(auth)
    }

    /// Register a new account. The session is not touched; the account must be
    /// confirmed and signed in separately.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &Role,
    ) -> Result<MessageResponse, ApiError> {
        let op = Operation::SignUp;
        let result = match with_body(
            ApiRequest::new(Method::POST, auth_endpoint("signup")),
            &SignUpRequest::new(username, email, password, role),
        ) {
            Ok(request) => self.execute(op, request).await.and_then(|body| decode_message(&body)),
            Err(e) => Err(e),
        };
        self.report_with(op, result, |response| {
            Some(response.message.clone()).filter(|m| !m.trim().is_empty())
        })
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without a stored refresh token,
    /// the transport/HTTP failure, or [`ApiError::InvalidAuthResponse`] when
    /// no access token comes back.
    pub async fn refresh(&self) -> Result<TokenRefreshResponse, ApiError> {
        let result = self.refresh_inner().await;
        self.report(Operation::RefreshToken, result)
    }

    async fn refresh_inner(&self) -> Result<TokenRefreshResponse, ApiError> {
        let refresh_token = self.session.refresh_token().ok_or(ApiError::NotAuthenticated)?;
        let request = with_body(
            ApiRequest::new(Method::POST, auth_endpoint("refreshtoken")),
            &RefreshRequest { refresh_token: &refresh_token },
        )?;
        let body = self.execute(Operation::RefreshToken, request).await?;
        let response: TokenRefreshResponse = decode(&body)?;
        let token = response
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidAuthResponse("missing accessToken".to_owned()))?;
        self.session.set_token(token)?;
        Ok(response)
    }

    /// Invalidate the session server-side and always clear it locally.
    ///
    /// The local session is cleared even when the remote call fails; the
    /// remote outcome is still returned.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after the session has been cleared.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let op = Operation::Logout;
        let result = self
            .execute(op, ApiRequest::new(Method::POST, auth_endpoint("logout")))
            .await
            .map(|_| ());
        self.session.clear_auth();
        tracing::info!(remote_ok = result.is_ok(), "signed out");
        self.report(op, result)
    }

    /// Confirm an account with the emailed verification token.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn confirm_registration(&self, token: &str) -> Result<MessageResponse, ApiError> {
        let op = Operation::ConfirmRegistration;
        let request = ApiRequest::new(Method::GET, auth_endpoint("registrationConfirm")).query("token", token);
        let result = self.execute(op, request).await.and_then(|body| decode_message(&body));
        self.report(op, result)
    }

    // -------------------------------------------------------------------------
    // Jobs
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn list_jobs(&self, page: u32, size: u32) -> Result<Page<Job>, ApiError> {
        let request = ApiRequest::new(Method::GET, JOBS_BASE).query("page", page).query("size", size);
        self.call(Operation::ListJobs, Ok(request)).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn search_jobs(&self, search: &JobSearch, page: u32, size: u32) -> Result<Page<Job>, ApiError> {
        let request = ApiRequest::new(Method::GET, format!("{JOBS_BASE}/search"))
            .query("title", search.title.trim())
            .query("location", search.location.trim())
            .query("company", search.company.trim())
            .query("page", page)
            .query("size", size);
        self.call(Operation::SearchJobs, Ok(request)).await
    }

    /// Blank salary bounds are sent as the wide defaults.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn filter_jobs(&self, filter: &JobFilter, page: u32, size: u32) -> Result<Page<Job>, ApiError> {
        let request = ApiRequest::new(Method::GET, format!("{JOBS_BASE}/filter"))
            .query("minSalary", filter.min_or_default())
            .query("maxSalary", filter.max_or_default())
            .query("jobType", filter.job_type.trim())
            .query("location", filter.location.trim())
            .query("page", page)
            .query("size", size);
        self.call(Operation::FilterJobs, Ok(request)).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn get_job(&self, job_id: &str) -> Result<Job, ApiError> {
        self.call(Operation::GetJob, Ok(ApiRequest::new(Method::GET, job_endpoint(job_id))))
            .await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn jobs_by_company(&self, company_id: &str) -> Result<Vec<Job>, ApiError> {
        let request = ApiRequest::new(Method::GET, jobs_by_company_endpoint(company_id));
        self.call(Operation::JobsByCompany, Ok(request)).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn create_job(&self, job: &JobPayload) -> Result<Job, ApiError> {
        let request = with_body(ApiRequest::new(Method::POST, JOBS_BASE), job);
        self.call(Operation::CreateJob, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn update_job(&self, job_id: &str, job: &JobPayload) -> Result<Job, ApiError> {
        let request = with_body(ApiRequest::new(Method::PUT, job_endpoint(job_id)), job);
        self.call(Operation::UpdateJob, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn delete_job(&self, job_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::DELETE, job_endpoint(job_id));
        self.call_discard(Operation::DeleteJob, request).await
    }

    // -------------------------------------------------------------------------
    // Companies
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn register_company(&self, company: &CompanyPayload) -> Result<Company, ApiError> {
        let request = with_body(ApiRequest::new(Method::POST, COMPANIES_BASE), company);
        self.call(Operation::RegisterCompany, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn update_company(&self, company_id: &str, company: &CompanyPayload) -> Result<Company, ApiError> {
        let request = with_body(ApiRequest::new(Method::PUT, company_endpoint(company_id)), company);
        self.call(Operation::UpdateCompany, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn get_company(&self, company_id: &str) -> Result<Company, ApiError> {
        let request = ApiRequest::new(Method::GET, company_endpoint(company_id));
        self.call(Operation::GetCompany, Ok(request)).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn search_companies(
        &self,
        search: &CompanySearch,
        page: u32,
        size: u32,
    ) -> Result<Page<Company>, ApiError> {
        let request = ApiRequest::new(Method::GET, format!("{COMPANIES_BASE}/search"))
            .query("name", search.name.trim())
            .query("industry", search.industry.trim())
            .query("page", page)
            .query("size", size);
        self.call(Operation::SearchCompanies, Ok(request)).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn verify_company(&self, company_id: &str) -> Result<Company, ApiError> {
        let request = ApiRequest::new(Method::PUT, verify_company_endpoint(company_id));
        self.call(Operation::VerifyCompany, Ok(request)).await
    }

    // -------------------------------------------------------------------------
    // Applications
    // -------------------------------------------------------------------------

    /// Submit an application for `job_id` as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without a session, otherwise the
    /// transport/HTTP/decode failure.
    pub async fn apply_for_job(
        &self,
        job_id: i64,
        cover_letter: &str,
        resume_file: Option<&str>,
    ) -> Result<JobApplication, ApiError> {
        let op = Operation::ApplyForJob;
        let request = match self.session.snapshot().user_id() {
            Some(user_id) => with_body(
                ApiRequest::new(Method::POST, APPLICATIONS_BASE),
                &ApplicationPayload {
                    job_id,
                    user_id: user_id.to_owned(),
                    cover_letter: cover_letter.to_owned(),
                    resume_url: ApplicationPayload::resume_url_for(resume_file),
                },
            ),
            None => Err(ApiError::NotAuthenticated),
        };
        self.call(op, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn update_application_status(
        &self,
        application_id: &str,
        status: &ApplicationStatus,
    ) -> Result<JobApplication, ApiError> {
        let request = with_body(
            ApiRequest::new(Method::PUT, application_endpoint(application_id)),
            &StatusUpdate { status: status.as_str() },
        );
        self.call(Operation::UpdateApplicationStatus, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn applications_by_job(&self, job_id: &str) -> Result<Vec<JobApplication>, ApiError> {
        let request = ApiRequest::new(Method::GET, applications_by_job_endpoint(job_id));
        self.call(Operation::ApplicationsByJob, Ok(request)).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP/decode failure.
    pub async fn applications_by_user(&self, user_id: &str) -> Result<Vec<JobApplication>, ApiError> {
        let request = ApiRequest::new(Method::GET, applications_by_user_endpoint(user_id));
        self.call(Operation::ApplicationsByUser, Ok(request)).await
    }

    /// Applications of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAuthenticated`] without a session, otherwise the
    /// transport/HTTP/decode failure.
    pub async fn my_applications(&self) -> Result<Vec<JobApplication>, ApiError> {
        let request = self
            .session
            .snapshot()
            .user_id()
            .map(|user_id| ApiRequest::new(Method::GET, applications_by_user_endpoint(user_id)))
            .ok_or(ApiError::NotAuthenticated);
        self.call(Operation::ApplicationsByUser, request).await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn withdraw_application(&self, application_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::DELETE, application_endpoint(application_id));
        self.call_discard(Operation::WithdrawApplication, request).await
    }

    // -------------------------------------------------------------------------
    // Tiered content
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn public_content(&self) -> Result<String, ApiError> {
        self.content(Operation::PublicContent, "all").await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn user_content(&self) -> Result<String, ApiError> {
        self.content(Operation::UserContent, "user").await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn employer_content(&self) -> Result<String, ApiError> {
        self.content(Operation::EmployerContent, "employer").await
    }

    /// # Errors
    ///
    /// Returns the transport/HTTP failure.
    pub async fn admin_content(&self) -> Result<String, ApiError> {
        self.content(Operation::AdminContent, "admin").await
    }

    async fn content(&self, op: Operation, tier: &str) -> Result<String, ApiError> {
        let request = ApiRequest::new(Method::GET, content_endpoint(tier));
        let result = self.execute(op, request).await.map(|body| decode_text(&body));
        self.report(op, result)
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    /// Attach credentials per the operation's [`Auth`] class and send.
    /// Returns the body of a 2xx response.
    async fn execute(&self, op: Operation, mut request: ApiRequest) -> Result<String, ApiError> {
        request.bearer = match op.auth() {
            Auth::None => None,
            Auth::Optional => self.session.access_token(),
            Auth::Required => Some(self.session.access_token().ok_or(ApiError::NotAuthenticated)?),
        };
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Status { status: response.status, message: error_message(&response.body) });
        }
        Ok(response.body)
    }

    async fn call<T>(&self, op: Operation, request: Result<ApiRequest, ApiError>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let result = match request {
            Ok(request) => self.execute(op, request).await.and_then(|body| decode(&body)),
            Err(e) => Err(e),
        };
        self.report(op, result)
    }

    async fn call_discard(&self, op: Operation, request: ApiRequest) -> Result<(), ApiError> {
        let result = self.execute(op, request).await.map(|_| ());
        self.report(op, result)
    }

    fn report<T>(&self, op: Operation, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.report_with(op, result, |_| None)
    }

    /// Log the outcome and raise the single notification a named mutation owes.
    fn report_with<T, F>(&self, op: Operation, result: Result<T, ApiError>, success_text: F) -> Result<T, ApiError>
    where
        F: FnOnce(&T) -> Option<String>,
    {
        match &result {
            Ok(value) => {
                tracing::debug!(operation = op.name(), "api call succeeded");
                if let Some(default) = op.success_message() {
                    let text = success_text(value).unwrap_or_else(|| default.to_owned());
                    self.notifier.notify(Notification::success(text));
                }
            }
            Err(err) => {
                tracing::warn!(operation = op.name(), error = %err, "api call failed");
                if op.is_named_mutation() {
                    self.notifier.notify(Notification::error(failure_text(op, err)));
                }
            }
        }
        result
    }
}
