//! Seams to the external auth backend and the remote `users` table.
//!
//! DESIGN
//! ======
//! The provider only ever talks to these traits. Change notifications are
//! delivered through an [`AuthSubscription`] whose unsubscribe action runs
//! when it is dropped, so whoever owns the subscription owns its teardown.
//!
//! The browser fetch transport produces non-`Send` futures, so on wasm the
//! async methods are declared `?Send`.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::error::BackendError;
use crate::model::{AuthChange, AuthSession, Profile, ProfileUpdate};

// =============================================================================
// TRAITS
// =============================================================================

/// Session management offered by the auth backend.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait AuthBackend: Send + Sync {
    /// The session the backend currently holds, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the session cannot be read.
    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError>;

    /// Register for future session changes.
    fn subscribe(&self) -> AuthSubscription;

    /// Password sign-in. Success is also announced to subscribers.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend rejects the credentials or
    /// cannot be reached.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    /// End the current backend session.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend call fails.
    async fn sign_out(&self) -> Result<(), BackendError>;
}

/// Row access to the remote `users` table.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait ProfileStore: Send + Sync {
    /// Fetch exactly one row by id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when no row matches, or another
    /// [`BackendError`] if the request fails.
    async fn fetch_profile(&self, user_id: &str) -> Result<Profile, BackendError>;

    /// Write the present fields of `update` to the row with `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the write is rejected or fails.
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), BackendError>;
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Stream of [`AuthChange`] notifications. Dropping it unsubscribes.
pub struct AuthSubscription {
    changes: mpsc::UnboundedReceiver<AuthChange>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthSubscription {
    pub fn new(changes: mpsc::UnboundedReceiver<AuthChange>, unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self { changes, unsubscribe: Some(Box::new(unsubscribe)) }
    }

    /// Wait for the next change. `None` once the backend stops publishing.
    pub async fn next(&mut self) -> Option<AuthChange> {
        self.changes.recv().await
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<AuthChange>>,
}

/// Fan-out registry for session change listeners.
///
/// Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct AuthListeners {
    inner: Arc<Mutex<ListenerSet>>,
}

impl AuthListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; it is removed when the returned subscription drops.
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let id = set.next_id;
            set.next_id += 1;
            set.senders.insert(id, tx);
            id
        };
        let registry = Arc::clone(&self.inner);
        AuthSubscription::new(rx, move || {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .senders
                .remove(&id);
        })
    }

    /// Deliver `change` to every live listener.
    pub fn notify(&self, change: &AuthChange) {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        set.senders.retain(|_, tx| tx.send(change.clone()).is_ok());
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .senders
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for AuthListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthListeners").field("len", &self.len()).finish()
    }
}
