//! General-info repository: the single store-contact row.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::RepositoryError;
use crate::models::{GeneralInfo, ShippingAddress};

#[derive(FromRow)]
struct InfoRow {
    contact_email: String,
    contact_phone: Option<String>,
    address_title: Option<String>,
    address_street: String,
    address_city: String,
    address_state: Option<String>,
    address_zip: Option<String>,
    address_country: String,
    updated_at: DateTime<Utc>,
}

impl From<InfoRow> for GeneralInfo {
    fn from(row: InfoRow) -> Self {
        Self {
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            address: ShippingAddress {
                title: row.address_title,
                street: row.address_street,
                city: row.address_city,
                state: row.address_state,
                zip: row.address_zip,
                country: row.address_country,
            },
            updated_at: row.updated_at,
        }
    }
}

const INFO_COLUMNS: &str = "contact_email, contact_phone, address_title, address_street, \
     address_city, address_state, address_zip, address_country, updated_at";

/// Partial update of the general info row; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct InfoPatch {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<ShippingAddress>,
}

/// Repository for the single general-info row.
pub struct InfoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InfoRepository<'a> {
    /// Create a new info repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the store contact info, if it has ever been set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<GeneralInfo>, RepositoryError> {
        let row: Option<InfoRow> = sqlx::query_as(&format!(
            "SELECT {INFO_COLUMNS} FROM general_info WHERE id = 1"
        ))
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(GeneralInfo::from))
    }

    /// Upsert the single info row, patching only the provided fields. The
    /// address is replaced wholesale when present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn update(&self, patch: &InfoPatch) -> Result<GeneralInfo, RepositoryError> {
        let addr = patch.address.as_ref();
        let row: InfoRow = sqlx::query_as(&format!(
            "INSERT INTO general_info
                (id, contact_email, contact_phone, address_title, address_street,
                 address_city, address_state, address_zip, address_country)
             VALUES (1, COALESCE($1, ''), $2, $3, COALESCE($4, ''),
                     COALESCE($5, ''), $6, $7, COALESCE($8, ''))
             ON CONFLICT (id) DO UPDATE SET
                contact_email = COALESCE($1, general_info.contact_email),
                contact_phone = COALESCE($2, general_info.contact_phone),
                address_title = COALESCE($3, general_info.address_title),
                address_street = COALESCE($4, general_info.address_street),
                address_city = COALESCE($5, general_info.address_city),
                address_state = COALESCE($6, general_info.address_state),
                address_zip = COALESCE($7, general_info.address_zip),
                address_country = COALESCE($8, general_info.address_country),
                updated_at = NOW()
             RETURNING {INFO_COLUMNS}"
        ))
        .bind(patch.contact_email.as_deref())
        .bind(patch.contact_phone.as_deref())
        .bind(addr.and_then(|a| a.title.as_deref()))
        .bind(addr.map(|a| a.street.as_str()))
        .bind(addr.map(|a| a.city.as_str()))
        .bind(addr.and_then(|a| a.state.as_deref()))
        .bind(addr.and_then(|a| a.zip.as_deref()))
        .bind(addr.map(|a| a.country.as_str()))
        .fetch_one(self.pool)
        .await?;
        Ok(row.into())
    }
}
