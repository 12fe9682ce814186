//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin account directly
//! hw-cli admin create -u admin -e admin@example.com -p 'a strong password'
//!
//! # Promote an existing account to admin
//! hw-cli admin promote -e someone@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `HEARTWOOD_DATABASE_URL` - `PostgreSQL` connection string
//!   (`DATABASE_URL` is accepted as a fallback)

use heartwood_core::Role;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password does not meet the minimum requirements.
    #[error("Password must be at least 8 characters")]
    WeakPassword,

    /// Password hashing failed.
    #[error("Password hashing error: {0}")]
    Hash(String),

    /// User already exists.
    #[error("Account already exists with email: {0}")]
    UserExists(String),

    /// No account matches the given email.
    #[error("No account found with email: {0}")]
    UserNotFound(String),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created account.
pub async fn create_admin(
    username: &str,
    email: &str,
    password: &SecretString,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = email.trim().to_lowercase();

    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(AdminError::InvalidEmail(email));
    }

    if password.expose_secret().len() < 8 {
        return Err(AdminError::WeakPassword);
    }

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("HEARTWOOD_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin account: {} ({})", username, email);

    // Check if an account already exists
    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email));
    }

    let password_hash =
        super::hash_password(password.expose_secret()).map_err(AdminError::Hash)?;

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, role) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(username.trim())
    .bind(&email)
    .bind(&password_hash)
    .bind(Role::Admin.to_string())
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        user_id,
        email
    );

    Ok(user_id)
}

/// Promote an existing account to the admin role.
///
/// # Returns
///
/// The ID of the promoted account.
pub async fn promote(email: &str) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = email.trim().to_lowercase();

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("HEARTWOOD_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Promoting account to admin: {}", email);

    let user_id: Option<i32> =
        sqlx::query_scalar("UPDATE users SET role = $1, updated_at = NOW() WHERE email = $2 RETURNING id")
            .bind(Role::Admin.to_string())
            .bind(&email)
            .fetch_optional(&pool)
            .await?;

    let user_id = user_id.ok_or(AdminError::UserNotFound(email.clone()))?;

    tracing::info!("Account promoted! ID: {}, Email: {}", user_id, email);

    Ok(user_id)
}
