//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering. [`AuthContext`] is the only
//! surface pages see: a reactive read view plus the three session
//! operations.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use chamber_session::{Identity, Profile, ProfileError, ProfileUpdate, SessionProvider, SessionState, SignInError, SignOut};
use leptos::prelude::*;

/// Reactive mirror of [`SessionState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::from(&SessionState::default())
    }
}

impl From<&SessionState> for AuthState {
    fn from(state: &SessionState) -> Self {
        Self { identity: state.identity.clone(), profile: state.profile.clone(), loading: state.loading }
    }
}

impl AuthState {
    /// Profile display name, falling back to the identity email.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.profile
            .as_ref()
            .map(|p| p.full_name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| self.identity.as_ref().map(|i| i.email.clone()))
    }
}

/// Accessing the auth surface outside of an `AuthProvider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("use_auth must be used within an AuthProvider")]
    MissingProvider,
}

/// Auth surface provided to every component under `AuthProvider`.
#[derive(Clone, Debug)]
pub struct AuthContext {
    session: SessionProvider,
    state: RwSignal<AuthState>,
}

impl AuthContext {
    #[must_use]
    pub fn new(session: SessionProvider, state: RwSignal<AuthState>) -> Self {
        Self { session, state }
    }

    /// Read-only reactive view of the session.
    #[must_use]
    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.with(|s| s.identity.clone())
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.state.with(|s| s.profile.clone())
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    #[must_use]
    pub fn session(&self) -> &SessionProvider {
        &self.session
    }

    /// # Errors
    ///
    /// Returns the normalized [`SignInError`] when the backend rejects the pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SignInError> {
        let result = self.session.sign_in(email, password).await;
        self.sync();
        result
    }

    pub async fn sign_out(&self) -> SignOut {
        let outcome = self.session.sign_out().await;
        self.sync();
        outcome
    }

    /// # Errors
    ///
    /// Returns [`ProfileError::NoUserLoggedIn`] when signed out, or the
    /// backend error unchanged if the write fails.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), ProfileError> {
        let result = self.session.update_profile(update).await;
        self.sync();
        result
    }

    /// Copy the provider's current state into the signal now instead of
    /// waiting for the mirror task.
    fn sync(&self) {
        let next = AuthState::from(&self.session.snapshot());
        if self.state.with_untracked(|current| current != &next) {
            self.state.set(next);
        }
    }
}

/// The auth surface of the nearest `AuthProvider`.
///
/// # Errors
///
/// Returns [`ContextError::MissingProvider`] outside of an `AuthProvider`.
pub fn use_auth() -> Result<AuthContext, ContextError> {
    use_context::<AuthContext>().ok_or(ContextError::MissingProvider)
}

/// Like [`use_auth`], for components that cannot render without a session.
///
/// # Panics
///
/// Panics with [`ContextError::MissingProvider`] outside of an `AuthProvider`.
pub fn expect_auth() -> AuthContext {
    match use_auth() {
        Ok(auth) => auth,
        Err(e) => panic!("{e}"),
    }
}
