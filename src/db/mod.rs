//! Database pool for the Postgres uniqueness checker.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `users` table belongs to the account service; this crate only reads
//! it, so no migrations run here.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect the `PostgreSQL` pool used for uniqueness lookups.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
