//! Supabase backend: GoTrue for sessions, PostgREST for the `users` table.
//!
//! DESIGN
//! ======
//! One [`SupabaseClient`] implements both [`crate::AuthBackend`] and
//! [`crate::ProfileStore`], so PostgREST calls carry the signed-in user's
//! bearer token (row-level security sees the real user).
//!
//! The session is held in memory only. Persisting it across page loads is
//! the host's job; a restored session can be handed back through
//! [`SupabaseClient::restore_session`].

pub mod auth;
pub mod config;
pub mod rest;


use std::sync::{PoisonError, RwLock};

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub use config::{RequestTimeouts, SupabaseConfig};

use crate::backend::AuthListeners;
use crate::error::BackendError;
use crate::model::{AuthChange, AuthEvent, AuthSession};

pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
    session: RwLock<Option<AuthSession>>,
    listeners: AuthListeners,
}

impl SupabaseClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: SupabaseConfig) -> Result<Self, BackendError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(std::time::Duration::from_secs(config.timeouts.connect_secs));
        let http = builder
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, config, session: RwLock::new(None), listeners: AuthListeners::new() })
    }

    #[must_use]
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Install a previously persisted session and announce it to listeners.
    pub fn restore_session(&self, session: AuthSession) {
        self.store_session(Some(session.clone()));
        self.listeners
            .notify(&AuthChange::new(AuthEvent::InitialSession, Some(session)));
    }

    fn stored_session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store_session(&self, session: Option<AuthSession>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Bearer for data requests: the user's access token, else the anon key.
    fn bearer(&self) -> String {
        self.stored_session()
            .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token)
    }

    fn with_api_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("apikey", &self.config.anon_key)
    }
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Status and body of a response, for the pure `parse_*` mappers.
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<(StatusCode, String), BackendError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| BackendError::Request(e.to_string()))?;
    Ok((status, body))
}

pub(crate) fn ensure_success(status: StatusCode, body: &str) -> Result<(), BackendError> {
    if status.is_success() {
        return Ok(());
    }
    Err(status_error(status, body))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))
}

fn status_error(status: StatusCode, body: &str) -> BackendError {
    BackendError::Status { status: status.as_u16(), message: error_message(body) }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Pull the human-readable message out of a GoTrue or PostgREST error body.
pub(crate) fn error_message(body: &str) -> String {
    let raw = body.trim();
    match serde_json::from_str::<ErrorBody>(raw) {
        Ok(parsed) => parsed
            .error_description
            .or(parsed.msg)
            .or(parsed.message)
            .or(parsed.error)
            .unwrap_or_else(|| raw.to_owned()),
        Err(_) => raw.to_owned(),
    }
}
