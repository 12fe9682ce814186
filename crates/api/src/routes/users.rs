//! Account self-service: profile, phone, password, address book, order
//! cancellation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use heartwood_core::{AddressId, OrderId};

use crate::db::{
    OrderRepository, UserRepository,
    users::{AddressPatch, NewAddress},
};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{Address, Order, User};
use crate::services::{orders, password};
use crate::state::AppState;

/// Full profile: the user row plus their address book.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub addresses: Vec<Address>,
    /// Orders, newest first; omitted from `/me`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
}

async fn load_profile(state: &AppState, user_id: heartwood_core::UserId) -> Result<(User, Vec<Address>)> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;
    let addresses = users.addresses(user_id).await?;
    Ok((user, addresses))
}

/// GET /api/users/me
///
/// # Errors
///
/// 404 when the account vanished between token issue and request.
pub async fn me(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<Json<ProfileResponse>> {
    let (user, addresses) = load_profile(&state, auth.id).await?;
    Ok(Json(ProfileResponse {
        user,
        addresses,
        orders: None,
    }))
}

/// GET /api/users/profile — profile plus order history, newest first.
///
/// # Errors
///
/// 404 when the account no longer exists.
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<Json<ProfileResponse>> {
    let (user, addresses) = load_profile(&state, auth.id).await?;
    let orders = OrderRepository::new(state.pool())
        .list_by_user(auth.id)
        .await?;
    Ok(Json(ProfileResponse {
        user,
        addresses,
        orders: Some(orders),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    pub phone: Option<String>,
}

/// PATCH /api/users/phone — set or replace the phone number.
///
/// # Errors
///
/// 400 when the phone field is missing or blank.
pub async fn update_phone(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Json(body): Json<PhoneRequest>,
) -> Result<Json<User>> {
    let Some(phone) = body.phone.filter(|p| !p.trim().is_empty()) else {
        return Err(AppError::Validation("Phone number is required".to_owned()));
    };
    let user = UserRepository::new(state.pool())
        .update_phone(auth.id, &phone)
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// PATCH /api/users/password — change the password after re-checking the
/// old one.
///
/// # Errors
///
/// 400 when either field is missing, 401 when the old password is wrong.
pub async fn change_password(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Json(body): Json<PasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(old), Some(new)) = (
        body.old_password.filter(|s| !s.is_empty()),
        body.new_password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Both old and new passwords are required".to_owned(),
        ));
    };

    let users = UserRepository::new(state.pool());
    let stored = users
        .get_password_hash(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;
    let matches = password::verify(&old, &stored)
        .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
    if !matches {
        return Err(AppError::Unauthorized(
            "Old password is incorrect".to_owned(),
        ));
    }

    let hash = password::hash(&new)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
    users.set_password_hash(auth.id, &hash).await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_owned(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub title: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// POST /api/users/addresses — append an address, return the full book.
///
/// # Errors
///
/// 400 when street, city or country is missing.
pub async fn add_address(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Json(body): Json<AddressRequest>,
) -> Result<Json<Vec<Address>>> {
    let (Some(street), Some(city), Some(country)) = (
        body.street.filter(|s| !s.trim().is_empty()),
        body.city.filter(|s| !s.trim().is_empty()),
        body.country.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Street, city & country are required".to_owned(),
        ));
    };

    let users = UserRepository::new(state.pool());
    users
        .add_address(
            auth.id,
            &NewAddress {
                title: body.title,
                street,
                city,
                state: body.state,
                zip: body.zip,
                country,
            },
        )
        .await?;
    Ok(Json(users.addresses(auth.id).await?))
}

/// PUT /api/users/addresses/{id} — partial update, return the full book.
///
/// # Errors
///
/// 404 when the address does not exist or belongs to someone else.
pub async fn update_address(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Path(address_id): Path<AddressId>,
    Json(body): Json<AddressRequest>,
) -> Result<Json<Vec<Address>>> {
    let users = UserRepository::new(state.pool());
    users
        .update_address(
            auth.id,
            address_id,
            &AddressPatch {
                title: body.title,
                street: body.street,
                city: body.city,
                state: body.state,
                zip: body.zip,
                country: body.country,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Address not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    Ok(Json(users.addresses(auth.id).await?))
}

/// DELETE /api/users/addresses/{id} — remove, return the full book.
///
/// # Errors
///
/// 404 when the address does not exist or belongs to someone else.
pub async fn delete_address(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Path(address_id): Path<AddressId>,
) -> Result<Json<Vec<Address>>> {
    let users = UserRepository::new(state.pool());
    users
        .delete_address(auth.id, address_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Address not found".to_owned())
            }
            other => AppError::Database(other),
        })?;
    Ok(Json(users.addresses(auth.id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub message: String,
    pub order_id: OrderId,
}

/// PATCH /api/users/orders/{id}/cancel — cancel an own pending order.
///
/// # Errors
///
/// 400 "Order not found or cannot be cancelled" — ownership mismatch and
/// non-pending status are deliberately indistinguishable.
pub async fn cancel_order(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<CancelResponse>> {
    orders::cancel_order(&state, auth.id, order_id).await?;
    Ok(Json(CancelResponse {
        message: "Order cancelled".to_owned(),
        order_id,
    }))
}
