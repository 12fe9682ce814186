//! CLI subcommand implementations.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};

pub mod admin;
pub mod migrate;
pub mod seed;

/// Resolve the database connection string from the environment.
///
/// `HEARTWOOD_DATABASE_URL` takes precedence, with `DATABASE_URL` as a
/// fallback so the CLI plays nicely with generic tooling.
pub fn database_url() -> Option<String> {
    std::env::var("HEARTWOOD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

/// Hash a password with argon2, the same scheme the API verifies against.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}
