use std::sync::Arc;

use chamber_session::{AuthBackend, AuthListeners, AuthSession, AuthSubscription, BackendError, ProfileStore};

use super::*;

struct Offline {
    listeners: AuthListeners,
}

#[async_trait::async_trait]
impl AuthBackend for Offline {
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        Ok(None)
    }

    fn subscribe(&self) -> AuthSubscription {
        self.listeners.subscribe()
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<AuthSession, BackendError> {
        Err(BackendError::Request("offline".into()))
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        Err(BackendError::NoSession)
    }
}

#[async_trait::async_trait]
impl ProfileStore for Offline {
    async fn fetch_profile(&self, user_id: &str) -> Result<Profile, BackendError> {
        Err(BackendError::NotFound(user_id.to_owned()))
    }

    async fn update_profile(&self, _user_id: &str, _update: &ProfileUpdate) -> Result<(), BackendError> {
        Err(BackendError::Request("offline".into()))
    }
}

fn session() -> SessionProvider {
    let backend = Arc::new(Offline { listeners: AuthListeners::new() });
    SessionProvider::new(backend.clone(), backend)
}

// =============================================================
// AuthState
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.identity.is_none());
    assert!(state.profile.is_none());
}

#[test]
fn auth_state_default_is_loading() {
    assert!(AuthState::default().loading);
}

#[test]
fn auth_state_mirrors_session_state() {
    let provider = session();
    let mirrored = AuthState::from(&provider.snapshot());
    assert_eq!(mirrored, AuthState::default());
}

#[test]
fn display_name_is_none_when_signed_out() {
    assert!(AuthState::default().display_name().is_none());
}

// =============================================================
// Context lookup
// =============================================================

#[test]
fn use_auth_outside_provider_is_a_configuration_error() {
    let err = use_auth().unwrap_err();
    assert_eq!(err, ContextError::MissingProvider);
    assert_eq!(err.to_string(), "use_auth must be used within an AuthProvider");
}

#[test]
fn use_auth_inside_provider_scope_succeeds() {
    let owner = Owner::new();
    owner.with(|| {
        let provider = session();
        let state = RwSignal::new(AuthState::from(&provider.snapshot()));
        provide_context(AuthContext::new(provider, state));

        let auth = use_auth().expect("auth context");
        assert!(auth.loading());
        assert!(auth.identity().is_none());
    });
}

#[test]
#[should_panic(expected = "use_auth must be used within an AuthProvider")]
fn expect_auth_panics_outside_provider() {
    let _ = expect_auth();
}
