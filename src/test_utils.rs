use crate::auth::{
    claims::TokenTtl,
    extractors::AppState,
    lifecycle::TokenManager,
    password::{hash_password, Argon2CredentialVerifier},
    principal::{Identity, IdentityLookup},
};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-authentication";

/// Identity store backed by a map, for tests that should not need Postgres.
#[derive(Default, Clone)]
pub struct InMemoryIdentityStore {
    identities: HashMap<String, Identity>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user whose password is stored as an argon2 hash.
    pub fn with_user(mut self, id: i64, email: &str, password: &str, role: &str) -> Self {
        let password_hash = hash_password(password).expect("Failed to hash test password");
        self.identities.insert(
            email.to_string(),
            Identity { id, email: email.to_string(), password_hash, role: role.to_string() },
        );
        self
    }
}

#[async_trait]
impl IdentityLookup for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        Ok(self.identities.get(email).cloned())
    }
}

pub fn test_token_manager(ttl_secs: i64) -> TokenManager {
    let ttl = TokenTtl::from_secs(ttl_secs).expect("Test TTL must be positive");
    TokenManager::with_ttl(TEST_SECRET.as_bytes(), ttl)
}

pub fn create_test_app_state(store: InMemoryIdentityStore) -> AppState {
    let identities: Arc<dyn IdentityLookup> = Arc::new(store);
    AppState {
        token_manager: test_token_manager(3600),
        credentials: Arc::new(Argon2CredentialVerifier::new(identities.clone())),
        identities,
    }
}
