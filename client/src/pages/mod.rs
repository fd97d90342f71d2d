//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and reaches the session only
//! through `use_auth`/`expect_auth`.

pub mod login;
pub mod profile;
