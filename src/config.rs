//! Portal configuration parsed from environment variables.
//!
//! A `.env` file in the working directory is honored via `dotenvy`; real
//! environment variables take precedence over it.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Backend origin without a trailing slash, e.g. `http://localhost:8080`.
    pub api_url: String,
    pub timeouts: Timeouts,
    /// Where the durable session record lives.
    pub session_file: PathBuf,
    pub page_size: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            session_file: default_session_file(std::env::var("HOME").ok().as_deref()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PortalConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `JOBPORTAL_API_URL`: default `http://localhost:8080`
    /// - `JOBPORTAL_REQUEST_TIMEOUT_SECS`: default 30
    /// - `JOBPORTAL_CONNECT_TIMEOUT_SECS`: default 10
    /// - `JOBPORTAL_SESSION_FILE`: default `$HOME/.jobportal/auth-storage.json`
    /// - `JOBPORTAL_PAGE_SIZE`: default 10
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Used by `from_env` and tests.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("JOBPORTAL_API_URL") {
            Some(raw) => normalize_api_url(&raw).ok_or(ConfigError::Empty { var: "JOBPORTAL_API_URL" })?,
            None => DEFAULT_API_URL.to_owned(),
        };
        let timeouts = Timeouts {
            request_secs: parse_or(&lookup, "JOBPORTAL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_or(&lookup, "JOBPORTAL_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let session_file = match lookup("JOBPORTAL_SESSION_FILE") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_session_file(lookup("HOME").as_deref()),
        };
        let page_size = parse_or(&lookup, "JOBPORTAL_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        Ok(Self { api_url, timeouts, session_file, page_size })
    }
}

fn normalize_api_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

fn default_session_file(home: Option<&str>) -> PathBuf {
    let base = home.map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(".jobportal").join(format!("{SESSION_STORAGE_KEY}.json"))
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
