mod api_doc;
mod app;
mod config;
mod error;
mod extract;
mod handlers;
mod items;
mod models;
mod provider;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::{Config, StoreBackend};
use provider::StoreProvider;
use state::AppState;
use store::{DynamoDbStore, ItemStore, MemoryStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    tracing::info!("dynamodb-items starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: Arc<dyn ItemStore> = match config.store_backend {
        StoreBackend::DynamoDb => Arc::new(DynamoDbStore::from_config(&config).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, items will not be persisted");
            Arc::new(MemoryStore::new())
        }
    };
    let provider = StoreProvider::new(store, config.table_name.clone());
    let state = AppState {
        provider: provider.clone(),
        config: Arc::new(config.clone()),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!(
        active_handles = provider.active_handles(),
        "dynamodb-items stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
