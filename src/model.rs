//! Session data model: auth identities, sessions, and `users` profile rows.
//!
//! DESIGN
//! ======
//! These types mirror the JSON the auth backend and the `users` table return,
//! so serde round-trips stay lossless. Timestamps are RFC 3339 on the wire.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// IDENTITY / SESSION
// =============================================================================

/// The authenticated principal as known to the auth backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend-assigned user identifier.
    pub id: String,
    /// Sign-in email. Empty for identities created without one.
    #[serde(default)]
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A live auth session issued by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds, when the backend reports one.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: Identity,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Kind of session change reported by the auth backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// One session change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<AuthSession>,
}

impl AuthChange {
    #[must_use]
    pub fn new(event: AuthEvent, session: Option<AuthSession>) -> Self {
        Self { event, session }
    }

    /// The identity carried by this change, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.user)
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Organizational role stored on a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SeniorLawyer,
    Lawyer,
    Paralegal,
    Secretary,
}

impl Role {
    pub const ALL: [Self; 5] = [Self::Admin, Self::SeniorLawyer, Self::Lawyer, Self::Paralegal, Self::Secretary];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SeniorLawyer => "senior_lawyer",
            Self::Lawyer => "lawyer",
            Self::Paralegal => "paralegal",
            Self::Secretary => "secretary",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred UI language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::En, Self::Ar];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Parse a wire code (`"en"`, `"ar"`). Unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-level user record, one row of the `users` table.
///
/// `id` always equals the owning [`Identity::id`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub role: Role,
    /// Display name.
    pub full_name: String,
    pub language: Language,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial profile write. Only present fields are sent and merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Shallow merge: every present field overwrites, absent fields are kept.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(tenant_id) = &self.tenant_id {
            profile.tenant_id.clone_from(tenant_id);
        }
        if let Some(email) = &self.email {
            profile.email.clone_from(email);
        }
        if let Some(role) = self.role {
            profile.role = role;
        }
        if let Some(full_name) = &self.full_name {
            profile.full_name.clone_from(full_name);
        }
        if let Some(language) = self.language {
            profile.language = language;
        }
        if let Some(updated_at) = self.updated_at {
            profile.updated_at = updated_at;
        }
    }
}
