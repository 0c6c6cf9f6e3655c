pub mod auth;

use anyhow::Result;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::auth::extractors::AppState;

/// Envelope shared by every JSON endpoint: either `data` or a list of errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { data: Some(data), errors: Vec::new() }
    }
}

pub async fn create_router() -> Result<Router<AppState>> {
    let router = Router::new()
        .route("/status", get(status_handler))
        .merge(auth::create_router().await?);

    Ok(router)
}

async fn status_handler() -> &'static str {
    "API is running"
}
