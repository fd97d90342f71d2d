//! # chamber-session
//!
//! Session state for the Chamber front-end: tracks the signed-in identity,
//! loads the matching `users` profile row, and exposes sign-in, sign-out,
//! and profile updates to the UI.
//!
//! ARCHITECTURE
//! ============
//! The auth backend and the remote `users` table sit behind two traits
//! ([`AuthBackend`], [`ProfileStore`]). [`SessionProvider`] is handed both at
//! construction time and owns the only state transition, so any number of
//! providers can be created side by side (one per UI root, one per test).
//!
//! The `supabase` module provides the production implementation of both
//! traits over GoTrue + PostgREST.

pub mod backend;
pub mod config;
pub mod demo;
pub mod error;
pub mod model;
pub mod provider;
pub mod supabase;

pub use backend::{AuthBackend, AuthListeners, AuthSubscription, ProfileStore};
pub use config::SessionConfig;
pub use error::{BackendError, ProfileError, SignInError};
pub use model::{AuthChange, AuthEvent, AuthSession, Identity, Language, Profile, ProfileUpdate, Role};
pub use provider::{SessionProvider, SessionState, SignOut};
pub use time;
