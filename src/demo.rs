//! Demo mode: one hard-coded credential pair that signs in a synthetic
//! identity without contacting the backend.

#[cfg(test)]
#[path = "demo_test.rs"]
mod demo_test;

use time::OffsetDateTime;

use crate::model::{Identity, Language, Profile, Role};

pub const DEMO_EMAIL: &str = "demo@chamber.law";
pub const DEMO_PASSWORD: &str = "demo123456";
pub const DEMO_USER_ID: &str = "demo-user-id";
pub const DEMO_TENANT_ID: &str = "demo-tenant-id";
pub const DEMO_FULL_NAME: &str = "Demo User";

/// Exact, case-sensitive match against the demo pair. No trimming.
#[must_use]
pub fn is_demo_credentials(email: &str, password: &str) -> bool {
    email == DEMO_EMAIL && password == DEMO_PASSWORD
}

/// Whether `identity` is the synthetic demo identity.
#[must_use]
pub fn is_demo_identity(identity: &Identity) -> bool {
    identity.id == DEMO_USER_ID
}

#[must_use]
pub fn demo_identity(now: OffsetDateTime) -> Identity {
    Identity { id: DEMO_USER_ID.to_owned(), email: DEMO_EMAIL.to_owned(), created_at: now, updated_at: now }
}

#[must_use]
pub fn demo_profile(now: OffsetDateTime) -> Profile {
    Profile {
        id: DEMO_USER_ID.to_owned(),
        tenant_id: DEMO_TENANT_ID.to_owned(),
        email: DEMO_EMAIL.to_owned(),
        role: Role::SeniorLawyer,
        full_name: DEMO_FULL_NAME.to_owned(),
        language: Language::En,
        created_at: now,
        updated_at: now,
    }
}
