//! Checkout endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::Order;
use crate::services::orders::{self, PlaceOrderRequest};
use crate::state::AppState;

/// POST /api/orders — place an order from product ids + quantities, a
/// shipping address payload and a payment method.
///
/// # Errors
///
/// 400 for an empty cart, incomplete address, missing payment method or any
/// unknown product id (the whole order fails, nothing is persisted).
pub async fn place(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = orders::place_order(&state, auth.id, body).await?;
    tracing::info!(
        order = order.id.as_i32(),
        user = auth.id.as_i32(),
        total = %order.total_price,
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(order)))
}
