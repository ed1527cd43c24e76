//! Wire DTOs for the job portal REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Identifiers arrive as
//! numbers from some endpoints and strings from others; they are normalized to
//! `String` on the way in so screens never care which.
//!
//! The sign-in response is the one place where shape matters for correctness:
//! [`AuthResponse::parse`] turns it into a session-ready value or a descriptive
//! error instead of trusting whatever came back.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::state::role::Role;
use crate::state::session::Identity;

// =============================================================================
// AUTH
// =============================================================================

/// Successful sign-in, parsed at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub identity: Identity,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthResponse {
    #[serde(default, alias = "token")]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default, alias = "type")]
    token_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl AuthResponse {
    /// Parse a sign-in response body.
    ///
    /// # Errors
    ///
    /// Returns a description of the first missing or malformed field.
    pub fn parse(body: &str) -> Result<Self, String> {
        let raw: RawAuthResponse = serde_json::from_str(body).map_err(|e| format!("malformed body: {e}"))?;

        let access_token = non_empty(raw.access_token).ok_or("missing accessToken")?;
        let id = non_empty(raw.id).ok_or("missing id")?;
        let username = non_empty(raw.username).ok_or("missing username")?;
        let email = raw.email.unwrap_or_default();
        let roles: Vec<Role> = raw.roles.iter().filter_map(|r| Role::parse(r)).collect();
        let identity = Identity::new(id, username, email, roles).map_err(|e| e.to_string())?;

        Ok(Self {
            access_token,
            refresh_token: non_empty(raw.refresh_token),
            token_type: non_empty(raw.token_type).unwrap_or_else(|| "Bearer".to_owned()),
            identity,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignInRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Submitted as a one-element list of bare role names.
    pub role: Vec<String>,
}

impl SignUpRequest {
    #[must_use]
    pub fn new(username: &str, email: &str, password: &str, role: &Role) -> Self {
        Self {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            role: vec![role.signup_name().to_owned()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshResponse {
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `{ "message": "..." }` bodies returned by sign-up, confirm, and deletes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Spring-style page envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { content: Vec::new(), total_pages: 0, total_elements: 0, number: 0, size: 0 }
    }
}

// =============================================================================
// JOBS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default, alias = "type")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Create/update body for a job posting.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub job_type: String,
    pub company_id: i64,
}

/// Free-text job search. Blank fields are sent as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobSearch {
    pub title: String,
    pub location: String,
    pub company: String,
}

impl JobSearch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.title, &self.location, &self.company].iter().all(|f| f.trim().is_empty())
    }
}

/// Structured job filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobFilter {
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub job_type: String,
    pub location: String,
}

/// Salary bounds the job list sends when a filter leaves them blank.
pub const FILTER_MIN_SALARY: f64 = 0.0;
pub const FILTER_MAX_SALARY: f64 = 999_999_999.0;

impl JobFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_salary.is_none()
            && self.max_salary.is_none()
            && self.job_type.trim().is_empty()
            && self.location.trim().is_empty()
    }

    #[must_use]
    pub fn min_or_default(&self) -> f64 {
        self.min_salary.unwrap_or(FILTER_MIN_SALARY)
    }

    /// Upper bound to send. A bound that is not positive counts as blank.
    #[must_use]
    pub fn max_or_default(&self) -> f64 {
        self.max_salary.filter(|max| *max > 0.0).unwrap_or(FILTER_MAX_SALARY)
    }
}

// =============================================================================
// COMPANIES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompanyPayload {
    pub name: String,
    pub industry: String,
    pub description: String,
    pub address: String,
    pub website: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanySearch {
    pub name: String,
    pub industry: String,
}

// =============================================================================
// APPLICATIONS
// =============================================================================

/// Review stage of an application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Hired,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    /// Statuses an employer can move an application to.
    pub const SELECTABLE: [Self; 5] = [Self::Pending, Self::Reviewed, Self::Interview, Self::Hired, Self::Rejected];

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().replace(' ', "_").as_str() {
            "PENDING" | "APPLIED" => Self::Pending,
            "REVIEWED" | "UNDER_REVIEW" => Self::Reviewed,
            "INTERVIEW" => Self::Interview,
            "HIRED" => Self::Hired,
            "REJECTED" => Self::Rejected,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Reviewed => "REVIEWED",
            Self::Interview => "INTERVIEW",
            Self::Hired => "HIRED",
            Self::Rejected => "REJECTED",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Interview => "Interview",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::parse(&String::deserialize(deserializer)?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_email: Option<String>,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_url: String,
    pub status: ApplicationStatus,
}

/// Submission body. The resume is referenced by URL; uploading it is the
/// backend's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub job_id: i64,
    pub user_id: String,
    pub cover_letter: String,
    pub resume_url: String,
}

impl ApplicationPayload {
    /// Resume reference in the `/uploads/<file>` form the backend expects.
    #[must_use]
    pub fn resume_url_for(file_name: Option<&str>) -> String {
        match file_name.map(str::trim) {
            Some(name) if !name.is_empty() => format!("/uploads/{name}"),
            _ => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}

// =============================================================================
// ID NORMALIZATION
// =============================================================================

fn id_from_value<E: serde::de::Error>(value: serde_json::Value) -> Result<Option<String>, E> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(E::custom(format!("expected string or number id, got {other}"))),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)?.ok_or_else(|| D::Error::custom("id must not be null"))
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)
}
