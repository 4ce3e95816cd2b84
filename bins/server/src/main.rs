//! Petcare API Server
//!
//! Main entry point for the Petcare backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petcare_api::{AppState, Repositories, create_router};
use petcare_core::storage::{StorageConfig, StorageProvider, StorageService};
use petcare_db::connect_with_pool;
use petcare_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petcare=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .unwrap_or(i64::MAX),
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create upload storage
    let mut storage_config = StorageConfig::new(StorageProvider::local_fs(&config.storage.root))
        .with_max_file_size(config.storage.max_file_size);
    if let Some(types) = config.storage.allowed_mime_types.clone() {
        storage_config = storage_config.with_allowed_mime_types(types);
    }
    let storage = StorageService::from_config(storage_config)?;
    info!(
        provider = storage.provider_name(),
        root = %config.storage.root,
        base_url = %config.storage.base_url,
        "Storage configured"
    );

    // Create application state
    let state = AppState::new(
        Arc::new(jwt_service),
        Arc::new(storage),
        Repositories::postgres(&db),
        config.storage.base_url.clone(),
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
