//! User repository: accounts and address books.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use heartwood_core::{AddressId, Role, UserId};

use super::RepositoryError;
use crate::models::{Address, AuthUser, User};

/// Raw `users` row before enum parsing.
#[derive(FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    phone: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(RepositoryError::DataCorruption)?;
        Ok(User {
            id: UserId::new(self.id),
            username: self.username,
            email: self.email,
            phone: self.phone,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct AddressRow {
    id: i32,
    title: String,
    street: String,
    city: String,
    state: Option<String>,
    zip: Option<String>,
    country: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            title: row.title,
            street: row.street,
            city: row.city,
            state: row.state,
            zip: row.zip,
            country: row.country,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, phone, role, created_at, updated_at";

/// New address values (the `title` default mirrors the address book UI).
#[derive(Debug)]
pub struct NewAddress {
    pub title: Option<String>,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
}

/// Partial address update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct AddressPatch {
    pub title: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the id/username/role projection used by the auth middleware.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored role is unknown.
    pub async fn get_auth_user(&self, id: UserId) -> Result<Option<AuthUser>, RepositoryError> {
        let row: Option<(i32, String, String)> =
            sqlx::query_as("SELECT id, username, role FROM users WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(|(id, username, role)| {
            let role = role
                .parse::<Role>()
                .map_err(RepositoryError::DataCorruption)?;
            Ok(AuthUser {
                id: UserId::new(id),
                username,
                role,
            })
        })
        .transpose()
    }

    /// Get a full user profile by id (never includes the password hash).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Look up a user and their password hash by email for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_login(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(FromRow)]
        struct LoginRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row: Option<LoginRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((r.user.into_user()?, r.password_hash)))
            .transpose()
    }

    /// Create a new user account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the username or email is
    /// already taken, `Database` for other failures.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username.trim())
        .bind(email.to_lowercase())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("Username or email already in use".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Set or replace the user's phone number, returning the fresh profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_phone(&self, id: UserId, phone: &str) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET phone = $1, updated_at = NOW() WHERE id = $2
             RETURNING {USER_COLUMNS}"
        ))
        .bind(phone)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_user()
    }

    /// Get the stored password hash for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(&self, id: UserId) -> Result<Option<String>, RepositoryError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(|(hash,)| hash))
    }

    /// Replace the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id.as_i32())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Address book
    // =========================================================================

    /// List a user's addresses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn addresses(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows: Vec<AddressRow> = sqlx::query_as(
            "SELECT id, title, street, city, state, zip, country
             FROM addresses WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Append a new address to the user's address book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_address(
        &self,
        user_id: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let row: AddressRow = sqlx::query_as(
            "INSERT INTO addresses (user_id, title, street, city, state, zip, country)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, title, street, city, state, zip, country",
        )
        .bind(user_id.as_i32())
        .bind(address.title.as_deref().unwrap_or("Home"))
        .bind(&address.street)
        .bind(&address.city)
        .bind(address.state.as_deref())
        .bind(address.zip.as_deref())
        .bind(&address.country)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Partially update one of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no address matches both the
    /// address id and the owning user.
    pub async fn update_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
        patch: &AddressPatch,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE addresses SET
                title = COALESCE($1, title),
                street = COALESCE($2, street),
                city = COALESCE($3, city),
                state = COALESCE($4, state),
                zip = COALESCE($5, zip),
                country = COALESCE($6, country)
             WHERE id = $7 AND user_id = $8",
        )
        .bind(patch.title.as_deref())
        .bind(patch.street.as_deref())
        .bind(patch.city.as_deref())
        .bind(patch.state.as_deref())
        .bind(patch.zip.as_deref())
        .bind(patch.country.as_deref())
        .bind(address_id.as_i32())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove one of the user's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when no address matches.
    pub async fn delete_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Admin operations
    // =========================================================================

    /// List every user account (admin view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2
             RETURNING {USER_COLUMNS}"
        ))
        .bind(role.to_string())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_user()
    }

    /// Delete a user account. The caller is responsible for having removed
    /// the user's orders first (see the cleanup service).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
