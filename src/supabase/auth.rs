//! GoTrue session endpoints: password grant and logout.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use super::{SupabaseClient, check_status, ensure_success, parse_json, read_body};
use crate::backend::{AuthBackend, AuthSubscription};
use crate::error::BackendError;
use crate::model::{AuthChange, AuthEvent, AuthSession};

fn password_grant_url(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=password")
}

fn logout_url(base: &str) -> String {
    format!("{base}/auth/v1/logout")
}

fn parse_session_response(status: StatusCode, body: &str) -> Result<AuthSession, BackendError> {
    ensure_success(status, body)?;
    parse_json(body)
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl AuthBackend for SupabaseClient {
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        Ok(self.stored_session())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.listeners.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let resp = self
            .with_api_key(self.http.post(password_grant_url(&self.config.url)))
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let (status, body) = read_body(resp).await?;
        let session = parse_session_response(status, &body)?;

        self.store_session(Some(session.clone()));
        self.listeners
            .notify(&AuthChange::new(AuthEvent::SignedIn, Some(session.clone())));
        Ok(session)
    }

    /// Clears and announces the local session first, then revokes it remotely.
    async fn sign_out(&self) -> Result<(), BackendError> {
        let previous = self.stored_session();
        self.store_session(None);
        self.listeners
            .notify(&AuthChange::new(AuthEvent::SignedOut, None));

        let Some(previous) = previous else {
            debug!("sign-out without a backend session");
            return Err(BackendError::NoSession);
        };

        let resp = self
            .with_api_key(self.http.post(logout_url(&self.config.url)))
            .bearer_auth(&previous.access_token)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        check_status(resp).await.map(|_| ())
    }
}
