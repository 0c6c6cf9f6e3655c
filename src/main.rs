use anyhow::Result;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use finbook_rs::auth::{
    extractors::AppState,
    lifecycle::TokenManager,
    password::Argon2CredentialVerifier,
    principal::IdentityLookup,
};
use finbook_rs::repositories::UserRepository;
use finbook_rs::{api, AppConfig, Database};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finbook_rs=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::new()?;
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    info!("Starting Finbook-RS server on {}", bind_address);

    // Initialize database
    let database = match Database::new(&config.database).await {
        Ok(db) => {
            info!("Database connected successfully");
            db
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    // Initialize token manager
    let token_manager = match TokenManager::new(&config.auth) {
        Ok(manager) => {
            info!("Token manager initialized, tokens live {}s", manager.ttl().num_seconds());
            manager
        }
        Err(e) => {
            error!("Failed to initialize token manager: {}", e);
            return Err(e);
        }
    };

    let identities: Arc<dyn IdentityLookup> = Arc::new(UserRepository::new(database.pool().clone()));

    // Create application state
    let app_state = AppState {
        token_manager,
        credentials: Arc::new(Argon2CredentialVerifier::new(identities.clone())),
        identities,
    };

    // Build application router
    let app = create_app(app_state, database).await?;

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Server listening on http://{}", bind_address);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_app(app_state: AppState, database: Database) -> Result<Router> {
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(move || health_handler(database.clone())))
        .nest("/api", api::create_router().await?)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Ok(app)
}

async fn root_handler() -> &'static str {
    "Finbook-RS: Personal Finance Bookkeeping API"
}

async fn health_handler(database: Database) -> impl IntoResponse {
    match database.health_check().await {
        Ok(health) => (StatusCode::OK, Json(json!({ "status": "OK", "users": health.users }))),
        Err(e) => {
            warn!("Health check failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "Database connection failed" })),
            )
        }
    }
}
