//! Gateway error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Every caller-visible failure comes back as an [`ApiError`]; nothing is
//! swallowed. Screens pick between [`ApiError::user_message`] for inline text
//! and the notification the gateway already raised for named mutations.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::state::session::SessionError;

/// Failure below HTTP: the request never produced a status line.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("could not reach the server: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// Network unreachable, timeout, or any failure before a response arrived.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("server returned {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// A success response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The sign-in response could not be turned into a session.
    #[error("authentication response invalid: {0}")]
    InvalidAuthResponse(String),

    /// The operation needs a signed-in session and there is none.
    #[error("not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// 401 or 403 from the server, or a call refused locally for lack of a session.
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. } | Self::NotAuthenticated)
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided message when there is one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}
