//! Admin store-contact info: read and partial update of the single row.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::db::{InfoRepository, info::InfoPatch};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{GeneralInfo, ShippingAddress};
use crate::state::AppState;

/// GET /api/admin/info
///
/// # Errors
///
/// 404 while the info row has never been set.
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<GeneralInfo>> {
    let info = InfoRepository::new(state.pool())
        .get()
        .await?
        .ok_or_else(|| AppError::NotFound("General information not found".to_owned()))?;
    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoRequest {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<ShippingAddress>,
}

/// PUT /api/admin/info — patch any provided fields, others stay untouched.
/// The first PUT creates the row.
///
/// # Errors
///
/// 500 on database failure.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<InfoRequest>,
) -> Result<Json<GeneralInfo>> {
    let info = InfoRepository::new(state.pool())
        .update(&InfoPatch {
            contact_email: body.contact_email,
            contact_phone: body.contact_phone,
            address: body.address,
        })
        .await?;
    Ok(Json(info))
}
