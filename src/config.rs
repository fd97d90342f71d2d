//! Session configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing config: env var {var} not set")]
    Missing { var: String },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Accept the hard-coded demo credential pair.
    pub demo_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { demo_mode: true }
    }
}

impl SessionConfig {
    /// Build from environment variables.
    ///
    /// Optional:
    /// - `SESSION_DEMO_MODE`: `true`/`1` (default) or `false`/`0`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unrecognized flag value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let demo_mode = parse_flag("SESSION_DEMO_MODE", std::env::var("SESSION_DEMO_MODE").ok().as_deref(), true)?;
        Ok(Self { demo_mode })
    }
}

pub(crate) fn required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing { var: key.to_owned() })
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_flag(key: &str, raw: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some("true" | "1") => Ok(true),
        Some("false" | "0") => Ok(false),
        Some(other) => Err(ConfigError::Parse(format!("{key}: expected true/false, got '{other}'"))),
    }
}
