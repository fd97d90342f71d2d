//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain so individual components can depend on small
//! focused models. Session state is owned by `chamber-session`; this layer
//! only mirrors it into signals.

pub mod auth;
