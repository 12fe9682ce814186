//! Public store contact info for the site footer.

use axum::{Json, extract::State};

use crate::db::InfoRepository;
use crate::error::{AppError, Result};
use crate::models::GeneralInfo;
use crate::state::AppState;

/// GET /api/info/footer
///
/// # Errors
///
/// 404 while the info row has never been set.
pub async fn footer(State(state): State<AppState>) -> Result<Json<GeneralInfo>> {
    let info = InfoRepository::new(state.pool())
        .get()
        .await?
        .ok_or_else(|| AppError::NotFound("General information not found".to_owned()))?;
    Ok(Json(info))
}
