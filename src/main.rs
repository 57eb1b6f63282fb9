mod app;
mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;
mod ui;

use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    services::{MemoryStorage, RedisStorage, SharedStorage},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load()?;

    let storage: SharedStorage = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
        StorageBackend::Redis => {
            tracing::info!("Using redis storage under namespace {}", config.storage.namespace);
            let client = redis::Client::open(config.storage.redis_url.as_str())?;
            Arc::new(RedisStorage::new(Arc::new(client), config.storage.namespace.clone()))
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = app::build_router(AppState::new(storage, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
