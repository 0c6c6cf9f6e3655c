use crate::auth::{
    errors::{AuthError, TokenError},
    lifecycle::TokenManager,
    principal::{CredentialVerifier, IdentityLookup, Principal},
    refresh::token_from_header_value,
};
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use std::sync::Arc;
use tracing::{debug, warn};

// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub token_manager: TokenManager,
    pub identities: Arc<dyn IdentityLookup>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

/// Request principal resolved from a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        debug!("Extracting AuthenticatedUser from request");

        let principal = authenticate_headers(&state.token_manager, &parts.headers)?;

        debug!("AuthenticatedUser extracted successfully: {}", principal.subject);
        Ok(AuthenticatedUser(principal))
    }
}

/// Request authentication: header lookup, prefix strip, then `authorize`.
pub fn authenticate_headers(manager: &TokenManager, headers: &HeaderMap) -> Result<Principal, TokenError> {
    let header_value = authorization_header(headers).ok_or(TokenError::MissingToken)?;
    let token = token_from_header_value(header_value);

    manager.authorize(token).inspect_err(|e| {
        if e.is_decode_failure() {
            warn!("Rejected unverifiable request token: {}", e);
        } else {
            debug!("Rejected request token: {}", e);
        }
    })
}

/// Raw `Authorization` value. A value that is not visible ASCII counts as
/// present but empty.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).map(|value| value.to_str().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::TokenTtl;
    use axum::http::HeaderValue;

    #[test]
    fn test_authorization_header_presence() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_header(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(authorization_header(&headers), Some("Bearer abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff").unwrap());
        assert_eq!(authorization_header(&headers), Some(""));
    }

    #[test]
    fn test_authenticate_headers_outcomes() {
        let manager = TokenManager::with_ttl(b"extractor-secret", TokenTtl::from_secs(60).unwrap());
        let mut headers = HeaderMap::new();
        assert_eq!(authenticate_headers(&manager, &headers), Err(TokenError::MissingToken));
        assert!(matches!(
            AuthError::from(authenticate_headers(&manager, &headers).unwrap_err()),
            AuthError::MissingToken
        ));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert_eq!(authenticate_headers(&manager, &headers), Err(TokenError::Malformed));

        let principal = Principal { id: None, subject: "fay@example.com".into(), role: "USER".into() };
        let token = manager.issue(&principal).unwrap();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        assert_eq!(authenticate_headers(&manager, &headers).unwrap().subject, "fay@example.com");
    }
}
