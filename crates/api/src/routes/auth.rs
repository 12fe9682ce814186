//! Signup and login: both answer with a bearer token plus a slim user view.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use heartwood_core::{Role, UserId};

use crate::config::{LOGIN_TOKEN_TTL, SIGNUP_TOKEN_TTL};
use crate::error::{AppError, Result};
use crate::models::{AuthUser, User};
use crate::services::password;
use crate::state::AppState;
use crate::db::UserRepository;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Slim user view returned next to a token.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Create an account and issue a 7-day token.
///
/// POST /api/auth/signup
///
/// # Errors
///
/// 400 on missing fields, 409 when the username or email is taken.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let (Some(username), Some(email), Some(pw)) = (
        body.username.filter(|s| !s.trim().is_empty()),
        body.email.filter(|s| !s.trim().is_empty()),
        body.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Username, email & password are required".to_owned(),
        ));
    };

    let hash = password::hash(&pw)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
    let user = UserRepository::new(state.pool())
        .create(&username, &email, &hash)
        .await?;

    let token = state.tokens().issue(
        &AuthUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        },
        SIGNUP_TOKEN_TTL,
    )?;

    tracing::info!(user = user.id.as_i32(), "New account created");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: SessionUser::from(&user),
        }),
    ))
}

/// Verify credentials and issue a 5-hour token.
///
/// POST /api/auth/login
///
/// # Errors
///
/// 400 on missing fields; 401 "Invalid email or password" for an unknown
/// email and a wrong password alike.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let (Some(email), Some(pw)) = (
        body.email.filter(|s| !s.trim().is_empty()),
        body.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Email & password are required".to_owned(),
        ));
    };

    let invalid = || AppError::Unauthorized("Invalid email or password".to_owned());

    let Some((user, stored_hash)) = UserRepository::new(state.pool()).find_login(&email).await?
    else {
        return Err(invalid());
    };
    let matches = password::verify(&pw, &stored_hash)
        .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
    if !matches {
        return Err(invalid());
    }

    let token = state.tokens().issue(
        &AuthUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        },
        LOGIN_TOKEN_TTL,
    )?;

    Ok(Json(SessionResponse {
        token,
        user: SessionUser::from(&user),
    }))
}
