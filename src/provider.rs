//! Session provider: the single owner of identity, profile, and loading state.
//!
//! ARCHITECTURE
//! ============
//! State lives in a `tokio::sync::watch` channel so UI layers can mirror it
//! reactively while every write goes through [`SessionProvider`].
//!
//! All identity changes (initial lookup, backend notifications, demo
//! sign-in, sign-out) go through `commit`. Each trigger draws a ticket from a
//! monotonic counter when it *starts*; a commit whose ticket is not newer
//! than the last applied revision is dropped. A slow profile fetch therefore
//! cannot overwrite a sign-out or a later session that already landed.
//!
//! Profile updates are merged in place and do not move the revision: they
//! refine the current identity rather than replace it. Each merge still
//! stamps the cached profile with a fresh ticket, and a fetch that started
//! before that stamp keeps the merged row instead of its own older copy.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::{AuthBackend, ProfileStore};
use crate::config::SessionConfig;
use crate::demo::{self, DEMO_USER_ID};
use crate::error::{BackendError, ProfileError, SignInError};
use crate::model::{AuthChange, Identity, Profile, ProfileUpdate};

// =============================================================================
// STATE
// =============================================================================

/// Observable session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// Profile row for `identity`; `profile.id == identity.id` when both are set.
    pub profile: Option<Profile>,
    /// True until the first identity resolution finishes.
    pub loading: bool,
    /// Last implicit profile fetch failure, cleared by the next success.
    pub profile_error: Option<String>,
    revision: u64,
    profile_merged_at: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { identity: None, profile: None, loading: true, profile_error: None, revision: 0, profile_merged_at: 0 }
    }
}

impl SessionState {
    /// Ticket of the last applied identity transition.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a fetch of `user_id` that started at `ticket` is newer than
    /// the cached profile.
    fn fetch_is_fresher(&self, user_id: &str, ticket: u64) -> bool {
        !self.profile.as_ref().is_some_and(|p| p.id == user_id && self.profile_merged_at > ticket)
    }

    fn clear(&mut self) {
        self.identity = None;
        self.profile = None;
        self.profile_error = None;
        self.loading = false;
    }
}

/// Outcome of [`SessionProvider::sign_out`]. Local state is cleared either way.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SignOut {
    Complete,
    /// The backend call failed after local state was cleared.
    LocalOnly(BackendError),
}

// =============================================================================
// PROVIDER
// =============================================================================

struct Inner {
    auth: Arc<dyn AuthBackend>,
    profiles: Arc<dyn ProfileStore>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    tickets: AtomicU64,
}

/// Handle to one session. Clones share state.
#[derive(Clone)]
pub struct SessionProvider {
    inner: Arc<Inner>,
}

impl SessionProvider {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthBackend>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self::with_config(auth, profiles, SessionConfig::default())
    }

    #[must_use]
    pub fn with_config(auth: Arc<dyn AuthBackend>, profiles: Arc<dyn ProfileStore>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth,
                profiles,
                config,
                state: watch::Sender::new(SessionState::default()),
                tickets: AtomicU64::new(0),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Read surface
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every committed state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity.clone()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.inner.state.borrow().profile.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Whether the current identity is the synthetic demo user.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.inner
            .state
            .borrow()
            .identity
            .as_ref()
            .is_some_and(demo::is_demo_identity)
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.inner.config
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Resolve the backend's current session into state.
    ///
    /// A failed lookup is logged and treated as signed out; `loading` clears
    /// in every case.
    pub async fn initialize(&self) {
        let ticket = self.next_ticket();
        let identity = match self.inner.auth.current_session().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                warn!(error = %e, "session lookup failed; continuing signed out");
                None
            }
        };
        self.resolve(ticket, identity).await;
    }

    /// Apply one backend change notification.
    pub async fn apply_change(&self, change: AuthChange) {
        let ticket = self.next_ticket();
        debug!(event = ?change.event, ticket, "auth state changed");
        self.resolve(ticket, change.session.map(|s| s.user)).await;
    }

    /// Subscribe, initialize, then follow backend changes until the backend
    /// stops publishing. Dropping this future unsubscribes.
    pub async fn run(&self) {
        let mut changes = self.inner.auth.subscribe();
        self.initialize().await;
        while let Some(change) = changes.next().await {
            self.apply_change(change).await;
        }
        debug!("auth change stream closed");
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Sign in with email and password.
    ///
    /// The demo pair (when enabled) installs the demo identity before this
    /// returns. Any other pair goes to the backend; the resulting session
    /// arrives through the change subscription.
    ///
    /// # Errors
    ///
    /// Returns [`SignInError::InvalidCredentials`] for any backend failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SignInError> {
        if self.inner.config.demo_mode && demo::is_demo_credentials(email, password) {
            self.start_demo_session();
            return Ok(());
        }

        match self.inner.auth.sign_in_with_password(email, password).await {
            Ok(session) => {
                info!(user_id = %session.user.id, "signed in");
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, "sign-in rejected");
                Err(SignInError::InvalidCredentials { source })
            }
        }
    }

    /// Clear local state, then end the backend session best-effort.
    pub async fn sign_out(&self) -> SignOut {
        let ticket = self.next_ticket();
        self.commit(ticket, SessionState::clear);

        match self.inner.auth.sign_out().await {
            Ok(()) => {
                info!("signed out");
                SignOut::Complete
            }
            Err(e) => {
                debug!(error = %e, "backend sign-out failed after local clear");
                SignOut::LocalOnly(e)
            }
        }
    }

    /// Write `update` to the current user's row, then merge it into the
    /// cached profile. The row is not re-fetched.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NoUserLoggedIn`] without writing when no
    /// identity is set, or the backend error unchanged if the write fails.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), ProfileError> {
        let user_id = self.current_user_id().ok_or(ProfileError::NoUserLoggedIn)?;
        self.inner.profiles.update_profile(&user_id, &update).await?;

        let stamp = self.next_ticket();
        self.inner.state.send_if_modified(|state| match state.profile.as_mut() {
            Some(profile) if profile.id == user_id => {
                update.apply_to(profile);
                state.profile_merged_at = stamp;
                true
            }
            _ => false,
        });
        Ok(())
    }

    /// Re-fetch the current user's profile, returning any failure.
    ///
    /// The fetched row replaces the cache unless an update was merged while
    /// the fetch was in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NoUserLoggedIn`] when no identity is set, or
    /// the backend error if the fetch fails. Cached state is untouched on
    /// failure.
    pub async fn refresh_profile(&self) -> Result<Profile, ProfileError> {
        let user_id = self.current_user_id().ok_or(ProfileError::NoUserLoggedIn)?;
        let started = self.next_ticket();
        let profile = self.inner.profiles.fetch_profile(&user_id).await?;

        self.inner.state.send_if_modified(|state| {
            if state.identity.as_ref().is_some_and(|i| i.id == user_id) && state.fetch_is_fresher(&user_id, started) {
                state.profile = Some(profile.clone());
                state.profile_error = None;
                true
            } else {
                false
            }
        });
        Ok(profile)
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn next_ticket(&self) -> u64 {
        self.inner.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn current_user_id(&self) -> Option<String> {
        self.inner.state.borrow().identity.as_ref().map(|i| i.id.clone())
    }

    /// Apply `apply` if `ticket` is newer than the last applied revision.
    fn commit(&self, ticket: u64, apply: impl FnOnce(&mut SessionState)) -> bool {
        let applied = self.inner.state.send_if_modified(|state| {
            if ticket <= state.revision {
                return false;
            }
            state.revision = ticket;
            apply(state);
            true
        });
        if !applied {
            debug!(ticket, "discarding stale session resolution");
        }
        applied
    }

    async fn resolve(&self, ticket: u64, identity: Option<Identity>) -> bool {
        let Some(identity) = identity else {
            return self.commit(ticket, SessionState::clear);
        };

        let fetched = self.load_profile(&identity.id).await;
        self.commit(ticket, move |state| {
            match fetched {
                Ok(profile) => {
                    if state.fetch_is_fresher(&identity.id, ticket) {
                        state.profile = Some(profile);
                    } else {
                        debug!(ticket, "keeping profile merged after this fetch started");
                    }
                    state.profile_error = None;
                }
                Err(e) => {
                    if state.profile.as_ref().is_some_and(|p| p.id != identity.id) {
                        state.profile = None;
                    }
                    state.profile_error = Some(e.to_string());
                }
            }
            state.identity = Some(identity);
            state.loading = false;
        })
    }

    async fn load_profile(&self, user_id: &str) -> Result<Profile, BackendError> {
        let result = self.inner.profiles.fetch_profile(user_id).await;
        if let Err(e) = &result {
            warn!(user_id, error = %e, "profile fetch failed");
        }
        result
    }

    fn start_demo_session(&self) {
        let now = OffsetDateTime::now_utc();
        let ticket = self.next_ticket();
        self.commit(ticket, |state| {
            state.identity = Some(demo::demo_identity(now));
            state.profile = Some(demo::demo_profile(now));
            state.profile_error = None;
            state.loading = false;
        });
        info!(user_id = DEMO_USER_ID, "demo session started");
    }
}

impl fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SessionProvider")
            .field("user_id", &state.identity.as_ref().map(|i| i.id.as_str()))
            .field("loading", &state.loading)
            .field("revision", &state.revision)
            .field("demo_mode", &self.inner.config.demo_mode)
            .finish_non_exhaustive()
    }
}
