//! Error types for session operations.
//!
//! ERROR HANDLING
//! ==============
//! Each operation keeps its own propagation policy:
//! - sign-in failures are normalized into one message, with the backend cause
//!   kept as the error source rather than in the text;
//! - profile writes surface the backend error verbatim;
//! - profile reads on the implicit path are logged, not returned;
//! - sign-out never fails from the caller's point of view (see
//!   [`crate::SignOut`]).

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::demo::{DEMO_EMAIL, DEMO_PASSWORD};

/// Failure reported by the auth backend or the remote `users` table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request could not be sent or completed.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend responded with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// No row matched the requested id.
    #[error("no users row for id {0}")]
    NotFound(String),

    /// The operation needs an active session and there is none.
    #[error("no active session")]
    NoSession,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BackendError {
    /// Whether retrying the same call could succeed (transport failures,
    /// throttling, server errors).
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

/// Sign-in failure as shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// The backend rejected the credentials. The message never carries the
    /// backend's own text; read [`SignInError::backend_error`] for that.
    #[error("Invalid email or password. Try the demo account: {} / {}", DEMO_EMAIL, DEMO_PASSWORD)]
    InvalidCredentials {
        #[source]
        source: BackendError,
    },
}

impl SignInError {
    /// The original backend failure behind the normalized message.
    #[must_use]
    pub fn backend_error(&self) -> &BackendError {
        match self {
            Self::InvalidCredentials { source } => source,
        }
    }
}

/// Failure of a profile read or write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("no user logged in")]
    NoUserLoggedIn,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
