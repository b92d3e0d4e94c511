use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::{JwtConfig, JwtService};
use catalog::{
    AppConfig, AppState,
    config::StoreBackend,
    create_router,
};
use common::{
    DocumentStore, MemoryStore, PgDocumentStore,
    database::{DatabaseConfig, init_pool},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting catalog service");

    let config = AppConfig::from_env().context("Failed to load catalog configuration")?;
    let store = open_store(config.store).await?;

    let jwt_config = JwtConfig::from_env()?;
    let jwt = JwtService::new(jwt_config)?;

    let state = AppState::new(store, jwt, config.admin.clone(), config.cors_origins.clone());
    let app = create_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Catalog service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Catalog service stopped");
    Ok(())
}

async fn open_store(backend: StoreBackend) -> Result<Arc<dyn DocumentStore>> {
    match backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if !common::database::health_check(&pool).await {
                anyhow::bail!("Failed to connect to database");
            }
            info!("Database connection successful");

            Ok(Arc::new(PgDocumentStore::connect(pool).await?))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
