//! Credential primitives shared by the Scribe gateway
//!
//! Password hashing (Argon2id, PHC strings) and bearer token signing and
//! verification (HS256 over a shared secret). Kept out of the gateway crate
//! so the token format has exactly one implementation.

pub mod password;
pub mod token;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHashFormat(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token signing failed: {0}")]
    TokenCreation(String),
}
