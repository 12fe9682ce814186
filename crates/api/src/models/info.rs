//! Store-wide contact information (single row).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::order::ShippingAddress;

/// General store information shown in the site footer and editable by admins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInfo {
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: ShippingAddress,
    pub updated_at: DateTime<Utc>,
}
