//! Signup configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid boolean for {var}: {value}")]
    InvalidBool { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupConfig {
    /// Accept any syntactically valid email without asking the checker.
    pub skip_uniqueness_check: bool,
    /// Quiet window for re-validation while typing.
    pub debounce: Duration,
    /// Drop results from passes that are no longer the newest.
    pub discard_stale: bool,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            skip_uniqueness_check: false,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            discard_stale: false,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl SignupConfig {
    /// Build typed signup config from environment variables.
    ///
    /// Optional:
    /// - `SIGNUP_SKIP_EMAIL_VERIFICATION`: `true`/`false` (default false)
    /// - `SIGNUP_EMAIL_DEBOUNCE_MS`: default 500
    /// - `SIGNUP_EMAIL_DISCARD_STALE`: `true`/`false` (default false)
    /// - `DATABASE_URL`: enables the Postgres uniqueness checker
    /// - `DB_MAX_CONNECTIONS`: default 5
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean variable holds an unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let skip_uniqueness_check = env_bool("SIGNUP_SKIP_EMAIL_VERIFICATION", false)?;
        let discard_stale = env_bool("SIGNUP_EMAIL_DISCARD_STALE", false)?;
        let debounce = Duration::from_millis(env_parse("SIGNUP_EMAIL_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS));
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            skip_uniqueness_check,
            debounce,
            discard_stale,
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
        })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidBool { var: key.to_owned(), value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
