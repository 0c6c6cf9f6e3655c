use crate::auth::principal::{AuthFailure, CredentialVerifier, Identity, IdentityLookup};
use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, warn};

/// Verifies login credentials against argon2 hashes held by an identity store.
#[derive(Clone)]
pub struct Argon2CredentialVerifier {
    identities: Arc<dyn IdentityLookup>,
}

impl Argon2CredentialVerifier {
    pub fn new(identities: Arc<dyn IdentityLookup>) -> Self {
        Self { identities }
    }
}

#[async_trait]
impl CredentialVerifier for Argon2CredentialVerifier {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthFailure> {
        let identity = self
            .identities
            .find_by_email(email)
            .await
            .map_err(|e| {
                error!("Identity lookup failed for {}: {:?}", email, e);
                AuthFailure::Unavailable(e.to_string())
            })?
            .ok_or_else(|| {
                warn!("Login attempt for unknown email: {}", email);
                AuthFailure::BadCredentials
            })?;

        let is_valid = verify_password(password, &identity.password_hash).unwrap_or_else(|e| {
            error!("Stored password hash for {} is unreadable: {}", email, e);
            false
        });

        if !is_valid {
            warn!("Wrong password for: {}", email);
            return Err(AuthFailure::BadCredentials);
        }

        Ok(identity)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Password hash parsing failed: {}", e))?;
    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
