//! # client
//!
//! Leptos + WASM frontend for Chamber.
//!
//! This crate contains the root component, routes, and the reactive bridge to
//! `chamber-session`: [`components::auth_provider::AuthProvider`] owns one
//! `SessionProvider` per UI root and mirrors its state into a signal that
//! pages read through [`state::auth::use_auth`].

pub mod app;
pub mod components;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: mount the app into `<body>`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
