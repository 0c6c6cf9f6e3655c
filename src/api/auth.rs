use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use crate::api::ApiResponse;
use crate::auth::{
    extractors::{authorization_header, AppState},
    principal::AuthFailure,
    refresh::refresh_from_header_value,
    AuthError, AuthenticatedUser,
};

const INVALID_BODY: &str = "Invalid request body.";

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email must not be empty."), email(message = "Invalid email."))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty."))]
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
}

pub async fn create_router() -> Result<Router<AppState>> {
    let router = Router::new()
        .route("/auth", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(profile));

    Ok(router)
}

async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TokenResponse>>, AuthError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Unreadable login body: {}", rejection.body_text());
        AuthError::Validation(vec![INVALID_BODY.to_string()])
    })?;

    req.validate().map_err(|e| {
        let messages = validation_messages(&e);
        warn!("Invalid login request: {:?}", messages);
        AuthError::Validation(messages)
    })?;

    info!("Login attempt for: {}", req.email);

    let identity = app_state
        .credentials
        .verify(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            AuthFailure::BadCredentials => AuthError::InvalidCredentials,
            AuthFailure::Unavailable(msg) => AuthError::Internal(msg),
        })?;

    let token = app_state.token_manager.issue_for_identity(&identity).map_err(|e| {
        error!("Failed to issue token for {}: {}", identity.email, e);
        AuthError::from(e)
    })?;

    Ok(Json(ApiResponse::ok(TokenResponse { token })))
}

async fn refresh(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TokenResponse>>, AuthError> {
    info!("Refreshing token");

    let token = refresh_from_header_value(&app_state.token_manager, authorization_header(&headers))?;

    Ok(Json(ApiResponse::ok(TokenResponse { token })))
}

async fn profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<ApiResponse<ProfileResponse>>, AuthError> {
    // Tokens carry no numeric id, so resolve it again by subject.
    let identity = app_state
        .identities
        .find_by_email(&principal.subject)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or_else(|| {
            warn!("Token subject no longer exists: {}", principal.subject);
            AuthError::InvalidToken
        })?;

    Ok(Json(ApiResponse::ok(ProfileResponse {
        id: identity.id,
        email: identity.email,
        role: principal.role,
    })))
}

fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .collect();
    messages.sort();
    messages
}
