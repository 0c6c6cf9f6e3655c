use crate::auth::claims::{ClaimSet, TokenTtl};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// A user as the identity store knows it. One role per identity.
#[derive(Clone)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Who is making a request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Only known when built from an [`Identity`]; tokens do not carry it.
    pub id: Option<i64>,
    pub subject: String,
    pub role: String,
}

impl Principal {
    pub fn from_identity(identity: &Identity) -> Self {
        Self { id: Some(identity.id), subject: identity.email.clone(), role: identity.role.clone() }
    }

    pub fn from_claims(claims: &ClaimSet) -> Self {
        Self { id: None, subject: claims.subject.clone(), role: claims.role.clone() }
    }

    pub fn to_claims(&self, issued_at: DateTime<Utc>, ttl: TokenTtl) -> ClaimSet {
        ClaimSet::new(self.subject.clone(), self.role.clone(), issued_at, ttl)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Unknown email and wrong password are deliberately the same outcome.
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Identity store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves identities by login email.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Identity>>;
}

/// Checks a submitted password and yields the matching identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthFailure>;
}
