//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read and write shared state from Leptos context providers.

pub mod auth_provider;
