//! Account roles as issued by the backend.
//!
//! The backend reports roles as `ROLE_EMPLOYER`-style authorities while the
//! sign-up form submits bare names (`employer`). Both spellings parse to the
//! same variant so gating never depends on which one a response used.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ROLE_PREFIX: &str = "ROLE_";

/// A named capability tag attached to an account.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    JobSeeker,
    Employer,
    Admin,
    /// Any authority the client has no gating rules for (e.g. `ROLE_USER`).
    Other(String),
}

/// Roles that may manage jobs and companies.
pub const EMPLOYER_OR_ADMIN: &[Role] = &[Role::Employer, Role::Admin];
pub const JOB_SEEKER_ONLY: &[Role] = &[Role::JobSeeker];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Role {
    /// Parse a role from either the authority form or the bare form.
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let bare = match trimmed.get(..ROLE_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(ROLE_PREFIX) => &trimmed[ROLE_PREFIX.len()..],
            _ => trimmed,
        };
        let normalized = bare.to_ascii_lowercase().replace(['-', ' '], "_");
        let role = match normalized.as_str() {
            "" => return None,
            "job_seeker" | "jobseeker" => Self::JobSeeker,
            "employer" => Self::Employer,
            "admin" => Self::Admin,
            _ => Self::Other(normalized),
        };
        Some(role)
    }

    /// Bare lowercase name, as submitted by the sign-up form.
    #[must_use]
    pub fn signup_name(&self) -> &str {
        match self {
            Self::JobSeeker => "job_seeker",
            Self::Employer => "employer",
            Self::Admin => "admin",
            Self::Other(name) => name,
        }
    }

    /// Authority form used on the wire (`ROLE_JOB_SEEKER`).
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{ROLE_PREFIX}{}", self.signup_name().to_ascii_uppercase())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::JobSeeker => "Job Seeker",
            Self::Employer => "Employer",
            Self::Admin => "Admin",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid role: {s:?}"))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.authority())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty role name"))
    }
}
