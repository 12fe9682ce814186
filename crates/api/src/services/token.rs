//! Bearer token issue and verification.
//!
//! Tokens are HS256 JWTs carrying `{id, username, role, exp}`. Verification
//! is stateless; there is no revocation, a token stays valid until natural
//! expiry. Signup and login hand out different lifetimes (see
//! [`crate::config::SIGNUP_TOKEN_TTL`] and [`crate::config::LOGIN_TOKEN_TTL`]).

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use heartwood_core::{Role, UserId};

use crate::models::AuthUser;

/// Token verification failure. Signature, expiry and malformation are not
/// distinguished to the caller; all map to a 401.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid or expired token")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub role: Role,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The identity these claims assert, as attached to requests.
    #[must_use]
    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: UserId::new(self.id),
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Issues and verifies bearer tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Sign a token for `user` valid for `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if signing fails.
    pub fn issue(&self, user: &AuthUser, ttl: Duration) -> Result<String, TokenError> {
        let exp = Utc::now().timestamp() + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        self.issue_with_exp(user, exp)
    }

    fn issue_with_exp(&self, user: &AuthUser, exp: i64) -> Result<String, TokenError> {
        let claims = Claims {
            id: user.id.as_i32(),
            username: user.username.clone(),
            role: user.role,
            exp,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` when the signature is invalid, the token is
    /// expired, or the token is malformed.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("k9#mQ2$vX7!pL4@nR8&wZ3*jF6^tB1%d"))
    }

    fn alice() -> AuthUser {
        AuthUser {
            id: UserId::new(1),
            username: "alice".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let svc = service();
        let token = svc.issue(&alice(), Duration::from_secs(3600)).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_claims_to_auth_user() {
        let svc = service();
        let admin = AuthUser {
            id: UserId::new(9),
            username: "root".to_string(),
            role: Role::Admin,
        };
        let token = svc.issue(&admin, Duration::from_secs(60)).unwrap();
        let user = svc.verify(&token).unwrap().to_auth_user();
        assert_eq!(user.id, UserId::new(9));
        assert!(user.is_admin());
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = service();
        let token = svc
            .issue_with_exp(&alice(), Utc::now().timestamp() - 100)
            .unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = TokenService::new(&SecretString::from("z5&wQ8$vN2!pT7@mR4#kX9*jG3^cD6%h"));
        let token = svc.issue(&alice(), Duration::from_secs(3600)).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let svc = service();
        assert!(svc.verify("not-a-token").is_err());
        assert!(svc.verify("").is_err());
    }
}
