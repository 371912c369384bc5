//! Uniqueness checks ("is this field value still available?").
//!
//! DESIGN
//! ======
//! `UniquenessChecker` is the async seam the controller awaits during a
//! validation pass. The Postgres implementation asks the `users` table; the
//! in-memory one backs the terminal driver and tests. Field names are mapped
//! through a whitelist so a caller can never choose an arbitrary column.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum UniquenessError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("uniqueness backend unreachable: {0}")]
    Unreachable(String),
}

/// Determines whether a field value is acceptable (not already registered).
#[async_trait::async_trait]
pub trait UniquenessChecker: Send + Sync {
    /// Return `true` when `value` is free to use for `field`.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown or the backend fails.
    async fn is_available(&self, field: &str, value: &str) -> Result<bool, UniquenessError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

pub struct PgUniquenessChecker {
    pool: PgPool,
}

impl PgUniquenessChecker {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn lookup_query(field: &str) -> Result<&'static str, UniquenessError> {
    match field {
        "email" => Ok("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))"),
        "mobile" => Ok("SELECT EXISTS(SELECT 1 FROM users WHERE mobile = $1)"),
        other => Err(UniquenessError::UnknownField(other.to_owned())),
    }
}

#[async_trait::async_trait]
impl UniquenessChecker for PgUniquenessChecker {
    async fn is_available(&self, field: &str, value: &str) -> Result<bool, UniquenessError> {
        let query = lookup_query(field)?;
        let taken: bool = sqlx::query_scalar(query)
            .bind(value.trim())
            .fetch_one(&self.pool)
            .await?;
        Ok(!taken)
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Taken values per field. Email values are compared case-insensitively.
#[derive(Default)]
pub struct MemoryUniquenessChecker {
    taken: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryUniquenessChecker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `value` as registered for `field`.
    pub fn reserve(&self, field: &str, value: &str) {
        let mut taken = self
            .taken
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        taken
            .entry(field.to_owned())
            .or_default()
            .insert(normalize(field, value));
    }
}

fn normalize(field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if field == "email" { trimmed.to_ascii_lowercase() } else { trimmed.to_owned() }
}

#[async_trait::async_trait]
impl UniquenessChecker for MemoryUniquenessChecker {
    async fn is_available(&self, field: &str, value: &str) -> Result<bool, UniquenessError> {
        let taken = self
            .taken
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let available = taken
            .get(field)
            .is_none_or(|values| !values.contains(&normalize(field, value)));
        Ok(available)
    }
}

#[cfg(test)]
#[path = "uniqueness_test.rs"]
mod tests;
