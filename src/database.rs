use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Snapshot returned by `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseHealth {
    pub users: i64,
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .context("connecting to the identity database")?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await.context("running migrations")?;

        let database = Self { pool };
        let health = database.health_check().await?;
        info!("Identity store ready with {} users", health.users);

        Ok(database)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fails unless the users table is reachable and readable.
    pub async fn health_check(&self) -> Result<DatabaseHealth> {
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("reading the users table")?;

        Ok(DatabaseHealth { users })
    }
}

pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}
