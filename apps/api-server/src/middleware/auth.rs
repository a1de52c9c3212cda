//! Authentication extractor.
//!
//! Every request gets an [`AuthContext`]. A missing, malformed, expired or
//! forged token never rejects the request here; it yields `Anonymous` and
//! the operation decides whether that is acceptable.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use feed_core::AuthContext;
use feed_core::ports::{AuthError, TokenService};

use crate::state::AppState;

/// Per-request authentication result.
///
/// ```ignore
/// async fn handler(auth: RequestAuth) -> impl Responder {
///     match auth.user_id() { ... }
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAuth(pub AuthContext);

impl RequestAuth {
    pub fn into_inner(self) -> AuthContext {
        self.0
    }
}

impl std::ops::Deref for RequestAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

/// Resolve the request's [`AuthContext`] against a token service.
pub fn authenticate(req: &HttpRequest, tokens: &dyn TokenService) -> AuthContext {
    match bearer_token(req).and_then(|token| tokens.validate_token(token)) {
        Ok(claims) => {
            tracing::debug!(
                user_id = %claims.user_id,
                expires_at = claims.expires_at,
                "Bearer token accepted"
            );
            AuthContext::authenticated(claims.user_id)
        }
        Err(AuthError::MissingAuth) => AuthContext::Anonymous,
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            AuthContext::Anonymous
        }
    }
}

impl FromRequest for RequestAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth = match req.app_data::<web::Data<AppState>>() {
            Some(state) => authenticate(req, state.tokens.as_ref()),
            None => {
                tracing::error!("AppState not found in app data");
                AuthContext::Anonymous
            }
        };
        ready(Ok(RequestAuth(auth)))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use feed_infra::{JwtConfig, JwtTokenService};
    use uuid::Uuid;

    use super::*;

    fn tokens() -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "auth-extractor-secret".to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_valid_bearer_token() {
        let tokens = tokens();
        let user_id = Uuid::new_v4();
        let token = tokens.generate_token(user_id, "a@b.com").unwrap();
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        assert_eq!(
            authenticate(&req, &tokens),
            AuthContext::authenticated(user_id)
        );
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::MissingAuth)));
        assert_eq!(authenticate(&req, &tokens()), AuthContext::Anonymous);
    }

    #[test]
    fn test_garbage_token_is_anonymous() {
        for value in ["Bearer not-a-jwt", "Token abc", "Bearer "] {
            let req = TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();
            assert_eq!(authenticate(&req, &tokens()), AuthContext::Anonymous);
        }
    }
}
