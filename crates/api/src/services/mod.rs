//! Business logic that sits between routes and repositories.
//!
//! - [`token`] - bearer token issue/verify
//! - [`password`] - argon2 hashing and verification
//! - [`orders`] - the order placement/cancellation workflow
//! - [`cleanup`] - best-effort cascading asset/record deletion

pub mod cleanup;
pub mod orders;
pub mod password;
pub mod token;

pub use token::TokenService;
