//! Bearer token identity extraction
//!
//! The GraphQL handler stores the raw `Authorization` bearer token in the
//! request context; resolvers that need the caller's identity verify it
//! lazily. A request without a token stays anonymous rather than being
//! rejected, so public operations keep working without credentials.

use actix_web::HttpRequest;
use async_graphql::Context;

use crate::config::Config;

/// Raw bearer token carried through the GraphQL request context.
#[derive(Debug, Clone)]
pub struct BearerToken(pub Option<String>);

/// Pull the bearer token out of the `Authorization` header.
///
/// A missing header, or one that does not use the Bearer scheme, yields no
/// token.
pub fn bearer_token(req: &HttpRequest) -> BearerToken {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    BearerToken(token)
}

/// Resolve the caller's user id from the request context.
///
/// Returns `Ok(None)` for anonymous requests, the verified subject when a
/// token is present and valid, and an authentication error when the token
/// is malformed or its signature does not check out.
pub fn current_user_id(ctx: &Context<'_>) -> async_graphql::Result<Option<String>> {
    let token = match ctx.data_opt::<BearerToken>().and_then(|t| t.0.as_deref()) {
        Some(token) => token,
        None => return Ok(None),
    };

    let config = ctx.data::<Config>()?;

    let claims = auth_core::token::verify_token(token, &config.auth.secret)
        .map_err(|e| format!("Not authorized: {}", e))?;

    Ok(Some(claims.sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extracted() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();

        assert_eq!(bearer_token(&req).0.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert!(bearer_token(&req).0.is_none());
    }

    #[test]
    fn test_non_bearer_scheme_is_anonymous() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();

        assert!(bearer_token(&req).0.is_none());
    }
}
