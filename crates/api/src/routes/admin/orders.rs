//! Admin order management: listing, deletion, status transitions.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use heartwood_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, RepositoryError, orders::AdminOrder};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::users::MessageResponse;
use crate::services::orders;
use crate::state::AppState;

/// GET /api/admin/orders — every order with its owner's identity.
///
/// # Errors
///
/// 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminOrder>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// DELETE /api/admin/orders/{id} — removes only the record; copied item
/// images stay on disk.
///
/// # Errors
///
/// 404 when the order does not exist.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<MessageResponse>> {
    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order not found".to_owned()),
            other => AppError::Database(other),
        })?;
    Ok(Json(MessageResponse {
        message: "Order deleted".to_owned(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: OrderId,
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

/// PATCH /api/admin/orders/{id}/status — any status may move to any other.
///
/// # Errors
///
/// 400 for an unknown status value, 404 for an unknown order.
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<StatusResponse>> {
    let status: OrderStatus = body
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::Validation("Invalid status".to_owned()))?;

    let order = orders::set_status(&state, id, status)
        .await
        .map_err(|e| match e {
            AppError::Database(RepositoryError::NotFound) => {
                AppError::NotFound("Order not found".to_owned())
            }
            other => other,
        })?;

    Ok(Json(StatusResponse {
        id: order.id,
        status: order.status,
        updated_at: order.updated_at,
    }))
}
