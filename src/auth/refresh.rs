use crate::auth::errors::{RefreshFlowError, TokenError};
use crate::auth::lifecycle::TokenManager;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Strips the case-sensitive `Bearer ` scheme marker; anything else is taken
/// as the raw token.
pub fn token_from_header_value(value: &str) -> &str {
    value.strip_prefix(BEARER_PREFIX).unwrap_or(value)
}

/// Refresh endpoint flow over the raw `Authorization` header value.
pub fn refresh_from_header_value(
    manager: &TokenManager,
    header_value: Option<&str>,
) -> Result<String, RefreshFlowError> {
    refresh_from_header_value_at(manager, header_value, Utc::now())
}

pub fn refresh_from_header_value_at(
    manager: &TokenManager,
    header_value: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String, RefreshFlowError> {
    let Some(header_value) = header_value else {
        debug!("Refresh requested without a token");
        return Err(RefreshFlowError::MissingToken);
    };

    let token = token_from_header_value(header_value);

    if !manager.is_valid_at(token, now) {
        warn!("Refresh requested with an invalid or expired token");
        return Err(RefreshFlowError::InvalidOrExpired);
    }

    // Unreachable after the validity check above, mapped all the same.
    manager.refresh_at(token, now).map_err(|e: TokenError| {
        warn!("Refresh failed after validation: {}", e);
        RefreshFlowError::InvalidOrExpired
    })
}
