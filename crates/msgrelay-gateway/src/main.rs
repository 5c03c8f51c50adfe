//! msgrelay gateway binary.

use std::sync::Arc;

use clap::Parser;
use msgrelay_gateway::{create_router, AppState, Args, GatewayConfig};
use msgrelay_core::{Broadcaster, MessageStore, MutationExecutor};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        data = %config.data_path.display(),
        "starting msgrelay gateway"
    );

    // Open the message store
    if let Some(parent) = config.data_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Arc::new(MessageStore::open(&config.data_path)?);
    info!(messages = store.len(), "message store opened");

    // Build the core: one hub, one write path, shared by both surfaces
    let broadcaster = Arc::new(Broadcaster::new());
    let mutations = Arc::new(MutationExecutor::new(store.clone(), broadcaster.clone()));

    // Create application state
    let state = AppState::new(store, broadcaster.clone(), mutations, config.clone());

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("gateway listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(broadcaster))
        .await?;

    info!("gateway shutdown complete");
    Ok(())
}

/// Wait for ctrl-c, then close the hub so every live subscriber stream ends
/// and open websocket connections drain.
async fn shutdown_signal(broadcaster: Arc<Broadcaster>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(error) => tracing::error!(%error, "failed to listen for ctrl+c"),
    }
    broadcaster.close();
}
