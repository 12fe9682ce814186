//! Admin theme CRUD. The image arrives as a multipart file field named
//! `theme`.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use heartwood_core::ThemeId;

use crate::assets::{AssetKind, AssetStore};
use crate::db::{
    CatalogRepository,
    catalog::{NewTheme, ThemePatch},
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Theme;
use crate::routes::users::MessageResponse;
use crate::services::cleanup;
use crate::state::AppState;

use super::collect_multipart;

/// GET /api/admin/themes
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Theme>>> {
    let themes = CatalogRepository::new(state.pool()).themes().await?;
    Ok(Json(themes))
}

/// POST /api/admin/themes — fields `name`, `description`, `color` plus the
/// image file under `theme`.
///
/// # Errors
///
/// 400 when name, color or the image file is missing.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Theme>)> {
    let (mut fields, files) = collect_multipart(multipart).await?;

    let name = fields.remove("name").filter(|s| !s.trim().is_empty());
    let color = fields.remove("color").filter(|s| !s.trim().is_empty());
    let (Some(name), Some(color)) = (name, color) else {
        return Err(AppError::Validation("Name & color are required".to_owned()));
    };
    let Some(file) = files.into_iter().find(|f| f.field == "theme") else {
        return Err(AppError::Validation(
            "Theme image file is required".to_owned(),
        ));
    };

    let filename = AssetStore::generate_filename(&file.filename, file.content_type.as_deref());
    let image = state
        .assets()
        .store(AssetKind::Theme, &filename, &file.bytes)
        .await?;

    let theme = CatalogRepository::new(state.pool())
        .create_theme(&NewTheme {
            name,
            description: fields.remove("description").unwrap_or_default(),
            image,
            color,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(theme)))
}

/// PUT /api/admin/themes/{id} — patch text fields; a file under `theme`
/// replaces the image (the old asset is deleted best-effort).
///
/// # Errors
///
/// 404 when the theme does not exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ThemeId>,
    multipart: Multipart,
) -> Result<Json<Theme>> {
    let catalog = CatalogRepository::new(state.pool());
    let existing = catalog
        .theme(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Theme not found".to_owned()))?;

    let (mut fields, files) = collect_multipart(multipart).await?;

    let image = match files.into_iter().find(|f| f.field == "theme") {
        Some(file) => {
            state.assets().delete(AssetKind::Theme, &existing.image).await;
            let filename =
                AssetStore::generate_filename(&file.filename, file.content_type.as_deref());
            Some(
                state
                    .assets()
                    .store(AssetKind::Theme, &filename, &file.bytes)
                    .await?,
            )
        }
        None => None,
    };

    let theme = catalog
        .update_theme(
            id,
            &ThemePatch {
                name: fields.remove("name"),
                description: fields.remove("description"),
                image,
                color: fields.remove("color"),
            },
        )
        .await?;
    Ok(Json(theme))
}

/// DELETE /api/admin/themes/{id} — cascades to products and assets.
///
/// # Errors
///
/// 404 when the theme does not exist.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ThemeId>,
) -> Result<Json<MessageResponse>> {
    cleanup::delete_theme(&state, id).await?;
    Ok(Json(MessageResponse {
        message: "Theme, its products & images deleted".to_owned(),
    }))
}
