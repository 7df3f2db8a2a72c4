//! Bearer token signing and verification
//!
//! Tokens are HS256 JWTs signed with the shared application secret. The
//! subject claim carries the user id; expiry is validated on decode.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::{AuthError, Result};

/// Lifetime of tokens issued at login when no override is configured.
pub const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 30;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Sign a token embedding `user_id` as the subject.
pub fn issue_token(user_id: &str, secret: &str, lifetime: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Decode a token and validate its signature and expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-32-chars-minimum";

    #[test]
    fn test_token_roundtrip_embeds_user_id() {
        let token = issue_token("user-123", SECRET, Duration::hours(1)).unwrap();
        let claims = verify_token(&token, SECRET).expect("token should verify");

        assert_eq!(claims.sub, "user-123");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Well past jsonwebtoken's default 60s leeway
        let token = issue_token("user-123", SECRET, Duration::days(-1)).unwrap();
        let result = verify_token(&token, SECRET);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("user-123", SECRET, Duration::hours(1)).unwrap();
        let result = verify_token(&token, "a-completely-different-secret");

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let result = verify_token("not.a.valid.jwt.token.structure", SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
