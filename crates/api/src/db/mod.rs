//! Database operations for the Heartwood `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Accounts (username, email, argon2 hash, role)
//! - `addresses` - User address books
//! - `themes` / `categories` - Catalog grouping entities
//! - `products` - Catalog items (ordered image list, category + theme refs)
//! - `orders` / `order_items` - Orders with immutable item snapshots
//! - `general_info` - Single-row store contact information
//!
//! Repositories use the runtime sqlx query API; enum-ish columns are stored
//! as TEXT and parsed at this boundary. Cascading deletes are sequenced in
//! the service layer, not by foreign-key actions.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p heartwood-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod catalog;
pub mod info;
pub mod orders;
pub mod users;

pub use catalog::CatalogRepository;
pub use info::InfoRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row targeted by an update or delete does not exist.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be interpreted (bad enum text, etc).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
