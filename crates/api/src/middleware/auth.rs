//! Authentication extractors.
//!
//! Three gating levels in increasing strictness:
//!
//! - [`OptionalUser`] attaches the user when a valid token is present and
//!   silently proceeds unauthenticated on any failure.
//! - [`RequireUser`] responds 401 when the token is absent, invalid, or the
//!   referenced user no longer exists.
//! - [`RequireAdmin`] composes [`RequireUser`] and additionally requires the
//!   admin role, responding 403 otherwise.
//!
//! The token is read from the `Authorization: Bearer` header, falling back
//! to a cookie named `token`; the header wins when both are present. The
//! user projection (id, username, role) is re-loaded from the database on
//! every gated request, so a token for a deleted user stops working
//! immediately even though tokens themselves cannot be revoked.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::AuthUser;
use crate::state::AppState;

/// Extractor that attaches the current user when a valid token is present.
///
/// Never rejects: missing token, invalid token and vanished user all yield
/// `None`.
pub struct OptionalUser(pub Option<AuthUser>);

/// Extractor that requires a valid token referencing an existing user.
pub struct RequireUser(pub AuthUser);

/// Extractor that requires an authenticated admin.
pub struct RequireAdmin(pub AuthUser);

/// Pull the bearer token out of the request, header before cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Some(token.to_string());
    }

    parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_cookie)
}

/// Find a `token` cookie in a `Cookie` header value.
fn token_cookie(header_value: &str) -> Option<String> {
    header_value.split(';').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == "token").then(|| value.trim().to_string())
    })
}

/// Verify the token and load the referenced user's projection.
async fn resolve_user(state: &AppState, token: &str) -> Result<Option<AuthUser>, AppError> {
    let claims = state.tokens().verify(token)?;
    let user = UserRepository::new(state.pool())
        .get_auth_user(claims.to_auth_user().id)
        .await?;
    Ok(user)
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match extract_token(parts) {
            Some(token) => resolve_user(state, &token).await.ok().flatten(),
            None => None,
        };
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Authentication token required".to_string()))?;

        let user = resolve_user(state, &token)
            .await
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin privileges required".to_string()));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cookie_parsing() {
        assert_eq!(
            token_cookie("token=abc.def.ghi"),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(
            token_cookie("theme=dark; token=xyz; lang=en"),
            Some("xyz".to_string())
        );
        assert_eq!(token_cookie("theme=dark; lang=en"), None);
        // A cookie whose name merely contains "token" must not match.
        assert_eq!(token_cookie("csrf_token=abc"), None);
    }
}
