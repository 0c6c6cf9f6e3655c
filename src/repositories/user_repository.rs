use crate::auth::principal::{Identity, IdentityLookup};
use crate::models::User;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl IdentityLookup for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        Ok(UserRepository::find_by_email(self, email).await?.map(Identity::from))
    }
}
