use crate::auth::claims::{ClaimSet, TokenTtl};
use crate::auth::errors::TokenError;
use crate::auth::jwt::TokenCodec;
use crate::auth::principal::{Identity, Principal};
use crate::config::AuthConfig;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Mints, checks and refreshes tokens. The only place that decides whether a
/// token is currently usable.
#[derive(Clone)]
pub struct TokenManager {
    codec: TokenCodec,
    ttl: TokenTtl,
}

impl TokenManager {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        // Parse expiration from config (e.g., "3600", "60m", "24h", "7d")
        let duration = Self::parse_duration(&config.jwt_expiration)?;
        let ttl = TokenTtl::new(duration)
            .ok_or_else(|| anyhow::anyhow!("JWT expiration must be at least one second"))?;

        Ok(Self::with_ttl(config.jwt_secret.as_bytes(), ttl))
    }

    pub fn with_ttl(secret: &[u8], ttl: TokenTtl) -> Self {
        Self { codec: TokenCodec::new(secret), ttl }
    }

    pub fn ttl(&self) -> TokenTtl {
        self.ttl
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue_at(principal, Utc::now())
    }

    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        if principal.subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let claims = principal.to_claims(now, self.ttl);
        self.codec.encode(&claims)
    }

    pub fn issue_for_identity(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue(&Principal::from_identity(identity))
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    pub fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.current_claims(token, now).is_ok()
    }

    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        self.refresh_at(token, Utc::now())
    }

    pub fn refresh_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = self
            .current_claims(token, now)
            .map_err(|_| TokenError::RefreshOfInvalidToken)?;

        self.codec.encode(&claims.reissued(now, self.ttl))
    }

    pub fn authorize(&self, token: &str) -> Result<Principal, TokenError> {
        self.authorize_at(token, Utc::now())
    }

    pub fn authorize_at(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError> {
        let claims = self.current_claims(token, now)?;
        Ok(Principal::from_claims(&claims))
    }

    /// Verified claims that have not yet expired at `now`.
    fn current_claims(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, TokenError> {
        let claims = self.codec.decode(token).inspect_err(|e| {
            debug!("Token rejected during decode: {}", e);
        })?;

        if claims.is_expired_at(now) {
            debug!("Token expired for subject: {}", claims.subject);
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn parse_duration(duration_str: &str) -> Result<Duration> {
        let duration_str = duration_str.trim();
        let duration = if let Some(days) = duration_str.strip_suffix('d') {
            Duration::try_days(days.parse()?)
        } else if let Some(hours) = duration_str.strip_suffix('h') {
            Duration::try_hours(hours.parse()?)
        } else if let Some(minutes) = duration_str.strip_suffix('m') {
            Duration::try_minutes(minutes.parse()?)
        } else if let Some(seconds) = duration_str.strip_suffix('s') {
            Duration::try_seconds(seconds.parse()?)
        } else {
            // No unit means seconds
            Duration::try_seconds(duration_str.parse()?)
        };

        duration.ok_or_else(|| anyhow::anyhow!("JWT expiration out of range: {}", duration_str))
    }
}
