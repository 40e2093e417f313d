//! Chewy attachment server
//!
//! Main entry point for the attachment storage and access service.

use std::sync::Arc;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chewy_api::{AppState, create_router};
use chewy_core::attachment::{AttachmentPresenter, PresentationConfig};
use chewy_core::storage::{StorageConfig, StorageService};
use chewy_db::{Migrator, connect};
use chewy_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chewy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    if std::env::var("CHEWY_MIGRATE_ON_START").is_ok_and(|v| v == "true" || v == "1") {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let storage_config = StorageConfig::from_settings(&config.storage)?;
    let storage = StorageService::from_config(storage_config)?;

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let presenter = AttachmentPresenter::new(PresentationConfig {
        datetime_format: config.attachment.datetime_format.clone(),
        content_url_prefix: config.attachment.content_url_prefix.clone(),
    });

    let state = AppState::new(db, Arc::new(storage), Arc::new(jwt_service), presenter);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
