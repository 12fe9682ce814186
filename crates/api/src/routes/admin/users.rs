//! Admin user management: listing, role changes, account deletion.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use heartwood_core::{Role, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::users::MessageResponse;
use crate::services::cleanup;
use crate::state::AppState;

/// Account projection for the admin list (no phone, no addresses).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /api/admin/users
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminUserView>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| AdminUserView {
                id: u.id,
                username: u.username,
                email: u.email,
                role: u.role,
                created_at: u.created_at,
                updated_at: u.updated_at,
            })
            .collect(),
    ))
}

/// DELETE /api/admin/users/{id} — cascades to the user's orders and their
/// copied item images.
///
/// # Errors
///
/// 400 when an admin targets their own account, 404 for an unknown user.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>> {
    if admin.id == id {
        return Err(AppError::Validation(
            "You cannot delete your own admin account".to_owned(),
        ));
    }
    cleanup::delete_user(&state, id).await?;
    Ok(Json(MessageResponse {
        message: "User and related orders/images deleted".to_owned(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// PATCH /api/admin/users/{id}/role — set the role to `user` or `admin`.
///
/// # Errors
///
/// 400 when an admin targets themselves or the role value is unknown, 404
/// for an unknown user.
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<RoleResponse>> {
    if admin.id == id {
        return Err(AppError::Validation(
            "You cannot change your own admin role".to_owned(),
        ));
    }
    let role: Role = body
        .role
        .as_deref()
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| AppError::Validation("Invalid role".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .set_role(id, role)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("User not found".to_owned())
            }
            other => AppError::Database(other),
        })?;

    tracing::info!(user = id.as_i32(), role = %role, "Role changed");
    Ok(Json(RoleResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}
