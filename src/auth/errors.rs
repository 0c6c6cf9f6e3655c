use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const AUTHENTICATION_REQUIRED: &str = "access denied: authentication required";

/// Failure kinds of the token core. Kept distinct for logs and tests; collapsed
/// by `AuthError::from` before anything reaches a client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,
    #[error("Token signature is invalid")]
    SignatureInvalid,
    #[error("Token expired")]
    Expired,
    #[error("Missing token")]
    MissingToken,
    #[error("Refresh attempted on a token that is not currently valid")]
    RefreshOfInvalidToken,
    #[error("Token subject must not be empty")]
    EmptySubject,
    #[error("Failed to encode token: {0}")]
    Encoding(String),
}

impl TokenError {
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, TokenError::Malformed | TokenError::SignatureInvalid)
    }
}

/// Terminal failures of the refresh endpoint flow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshFlowError {
    #[error("Token not provided.")]
    MissingToken,
    #[error("Invalid or expired token.")]
    InvalidOrExpired,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("Refresh failed: {0}")]
    Refresh(#[from] RefreshFlowError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed
            | TokenError::SignatureInvalid
            | TokenError::Expired
            | TokenError::RefreshOfInvalidToken => AuthError::InvalidToken,
            TokenError::MissingToken => AuthError::MissingToken,
            TokenError::EmptySubject | TokenError::Encoding(_) => AuthError::Internal(err.to_string()),
        }
    }
}

/// The single response for a request that lacks a valid token.
pub fn authentication_required() -> Response {
    let status = StatusCode::UNAUTHORIZED;
    let body = Json(json!({
        "error": AUTHENTICATION_REQUIRED,
        "status": status.as_u16()
    }));

    (status, body).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::MissingToken | AuthError::InvalidToken => return authentication_required(),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid email or password", "status": 401 }),
            ),
            AuthError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "data": null, "errors": errors }))
            }
            AuthError::Refresh(err) => {
                (StatusCode::BAD_REQUEST, json!({ "data": null, "errors": [err.to_string()] }))
            }
            AuthError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "status": 500 }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
