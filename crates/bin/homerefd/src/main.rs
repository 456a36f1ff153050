//! # homerefd: the homeref daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`homeref.toml`, env vars)
//! - Initialize structured logging
//! - Construct the registry source, the durable cache tier and the cache layer
//! - Load the registry once and start its background refresh
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGTERM/SIGINT), stopping refresh tasks
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use homeref_adapter_http_axum::state::AppState;
use homeref_adapter_storage_json::JsonFileStore;
use homeref_adapter_virtual::VirtualRegistry;
use homeref_app::cache::CacheLayer;
use homeref_app::services::registry_service::RegistryService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Registry source
    let source = match &config.registry.fixture {
        Some(path) => {
            tracing::info!(path = %path.display(), "serving registry fixture");
            VirtualRegistry::from_fixture(path)
        }
        None => {
            tracing::info!("serving built-in demo home");
            VirtualRegistry::demo()?
        }
    };

    // Cache tiers
    let store = JsonFileStore::new(&config.cache.dir);
    let cache = CacheLayer::new(store, config.cache_ttl());

    // Services
    let registry_service = Arc::new(RegistryService::new(source, cache));
    match registry_service.load().await {
        Ok(snapshot) => tracing::info!(entities = snapshot.len(), "registry loaded"),
        Err(err) => {
            tracing::warn!(error = %err, "initial registry load failed, starting empty");
        }
    }
    registry_service.start_auto_refresh(config.refresh_interval());

    // HTTP
    let state = AppState::from_arc(Arc::clone(&registry_service));
    let app = homeref_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "homerefd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry_service.cache().shutdown();
    tracing::info!("homerefd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
