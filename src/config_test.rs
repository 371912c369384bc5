use super::*;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that touch the process environment.
fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Caller must hold `env_guard()`.
unsafe fn clear_signup_env() {
    unsafe {
        std::env::remove_var("SIGNUP_SKIP_EMAIL_VERIFICATION");
        std::env::remove_var("SIGNUP_EMAIL_DEBOUNCE_MS");
        std::env::remove_var("SIGNUP_EMAIL_DISCARD_STALE");
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("DB_MAX_CONNECTIONS");
    }
}

#[test]
fn from_env_defaults() {
    let _env = env_guard();
    unsafe { clear_signup_env() };

    let cfg = SignupConfig::from_env().unwrap();
    assert_eq!(cfg, SignupConfig::default());
    assert_eq!(cfg.debounce, Duration::from_millis(500));
    assert!(!cfg.skip_uniqueness_check);
    assert!(cfg.database_url.is_none());
}

#[test]
fn from_env_parses_overrides() {
    let _env = env_guard();
    unsafe {
        clear_signup_env();
        std::env::set_var("SIGNUP_SKIP_EMAIL_VERIFICATION", "true");
        std::env::set_var("SIGNUP_EMAIL_DEBOUNCE_MS", "250");
        std::env::set_var("SIGNUP_EMAIL_DISCARD_STALE", "1");
        std::env::set_var("DATABASE_URL", "postgres://localhost/signup");
        std::env::set_var("DB_MAX_CONNECTIONS", "9");
    }

    let cfg = SignupConfig::from_env().unwrap();
    assert!(cfg.skip_uniqueness_check);
    assert!(cfg.discard_stale);
    assert_eq!(cfg.debounce, Duration::from_millis(250));
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/signup"));
    assert_eq!(cfg.db_max_connections, 9);

    unsafe { clear_signup_env() };
}

#[test]
fn from_env_rejects_bad_bool() {
    let _env = env_guard();
    unsafe {
        clear_signup_env();
        std::env::set_var("SIGNUP_SKIP_EMAIL_VERIFICATION", "maybe");
    }

    let err = SignupConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBool { ref var, .. } if var == "SIGNUP_SKIP_EMAIL_VERIFICATION"));

    unsafe { clear_signup_env() };
}

#[test]
fn bad_debounce_falls_back_to_default() {
    let _env = env_guard();
    unsafe {
        clear_signup_env();
        std::env::set_var("SIGNUP_EMAIL_DEBOUNCE_MS", "soon");
    }

    let cfg = SignupConfig::from_env().unwrap();
    assert_eq!(cfg.debounce, Duration::from_millis(DEFAULT_DEBOUNCE_MS));

    unsafe { clear_signup_env() };
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert_eq!(parse_bool("TRUE"), Some(true));
    assert_eq!(parse_bool(" yes "), Some(true));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool(""), Some(false));
    assert_eq!(parse_bool("2"), None);
}
