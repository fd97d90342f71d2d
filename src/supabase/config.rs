//! Supabase connection settings parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::config::{ConfigError, env_parse_u64, required_env};

pub const DEFAULT_USERS_TABLE: &str = "users";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    /// Public anon key sent as the `apikey` header.
    pub anon_key: String,
    /// Table holding one profile row per identity.
    pub users_table: String,
    /// Applied on native targets only.
    pub timeouts: RequestTimeouts,
}

impl SupabaseConfig {
    /// Config with default table and timeouts.
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            users_table: DEFAULT_USERS_TABLE.to_owned(),
            timeouts: RequestTimeouts::default(),
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `SUPABASE_USERS_TABLE`: default `users`
    /// - `SUPABASE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SUPABASE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if a required variable is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required_env("SUPABASE_URL")?;
        let anon_key = required_env("SUPABASE_ANON_KEY")?;
        let users_table = std::env::var("SUPABASE_USERS_TABLE")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USERS_TABLE.to_owned());
        let timeouts = RequestTimeouts {
            request_secs: env_parse_u64("SUPABASE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SUPABASE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { users_table, timeouts, ..Self::new(url, anon_key) })
    }
}
