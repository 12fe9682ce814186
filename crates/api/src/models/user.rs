//! User and address models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use heartwood_core::{AddressId, Role, UserId};

/// A user account. The password hash never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An entry in a user's address book.
///
/// Owned by exactly one user; at checkout its fields are copied verbatim onto
/// the order, after which the two copies have independent lifecycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub title: String,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
}

/// The authenticated identity attached to a request by the auth middleware.
///
/// Only the projection needed for gating: id, username, role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Whether this identity may use the admin surface.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
