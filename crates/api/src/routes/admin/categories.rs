//! Admin category CRUD. The icon arrives as a multipart file field named
//! `icon`.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use heartwood_core::CategoryId;

use crate::assets::{AssetKind, AssetStore};
use crate::db::{
    CatalogRepository,
    catalog::{CategoryPatch, NewCategory},
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::routes::users::MessageResponse;
use crate::services::cleanup;
use crate::state::AppState;

use super::collect_multipart;

/// GET /api/admin/categories
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Category>>> {
    let categories = CatalogRepository::new(state.pool()).categories().await?;
    Ok(Json(categories))
}

/// POST /api/admin/categories — fields `name`, `description` plus the icon
/// file under `icon`.
///
/// # Errors
///
/// 400 when the name or the icon file is missing.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Category>)> {
    let (mut fields, files) = collect_multipart(multipart).await?;

    let Some(name) = fields.remove("name").filter(|s| !s.trim().is_empty()) else {
        return Err(AppError::Validation("Name is required".to_owned()));
    };
    let Some(file) = files.into_iter().find(|f| f.field == "icon") else {
        return Err(AppError::Validation(
            "Category icon file is required".to_owned(),
        ));
    };

    let filename = AssetStore::generate_filename(&file.filename, file.content_type.as_deref());
    let icon = state
        .assets()
        .store(AssetKind::Category, &filename, &file.bytes)
        .await?;

    let category = CatalogRepository::new(state.pool())
        .create_category(&NewCategory {
            name,
            description: fields.remove("description").unwrap_or_default(),
            icon,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/admin/categories/{id} — patch text fields; a file under `icon`
/// replaces the icon.
///
/// # Errors
///
/// 404 when the category does not exist.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    multipart: Multipart,
) -> Result<Json<Category>> {
    let catalog = CatalogRepository::new(state.pool());
    let existing = catalog
        .category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?;

    let (mut fields, files) = collect_multipart(multipart).await?;

    let icon = match files.into_iter().find(|f| f.field == "icon") {
        Some(file) => {
            state
                .assets()
                .delete(AssetKind::Category, &existing.icon)
                .await;
            let filename =
                AssetStore::generate_filename(&file.filename, file.content_type.as_deref());
            Some(
                state
                    .assets()
                    .store(AssetKind::Category, &filename, &file.bytes)
                    .await?,
            )
        }
        None => None,
    };

    let category = catalog
        .update_category(
            id,
            &CategoryPatch {
                name: fields.remove("name"),
                description: fields.remove("description"),
                icon,
            },
        )
        .await?;
    Ok(Json(category))
}

/// DELETE /api/admin/categories/{id} — cascades to products and assets.
///
/// # Errors
///
/// 404 when the category does not exist.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<MessageResponse>> {
    cleanup::delete_category(&state, id).await?;
    Ok(Json(MessageResponse {
        message: "Category, its products & images deleted".to_owned(),
    }))
}
