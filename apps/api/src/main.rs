mod config;
mod errors;
mod export;
mod extraction;
mod models;
mod notify;
mod routes;
mod state;
mod store;
mod uploads;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::matchers::MatcherSet;
use crate::notify::build_notifier;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::InMemoryResultStore;
use crate::uploads::UploadStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResuNER API v{}", env!("CARGO_PKG_VERSION"));

    // Upload directory for retained raw documents
    let uploads = UploadStorage::new(&config.upload_dir);
    uploads.ensure_dir().await?;

    // Field matchers (known literals come from config)
    let matchers = Arc::new(MatcherSet::from_config(&config.matchers)?);
    info!("Field matchers registered: {:?}", matchers.labels());

    // Notifier (simulation unless EMAIL_ENABLED)
    let notifier = build_notifier(&config.email)?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        store: Arc::new(InMemoryResultStore::new()),
        uploads,
        matchers,
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
