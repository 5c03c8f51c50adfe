//! msgrelay HTTP/JSON gateway.
//!
//! Exposes the message collection over two write surfaces — a structured
//! query/mutation API (`/query`, `/mutate`) and a plain REST API
//! (`/messages`) — plus a websocket endpoint (`/subscribe`) that streams
//! change events to live listeners. Both write surfaces go through the
//! same [`MutationExecutor`], so subscribers are notified identically
//! regardless of which surface originated a change.

pub mod config;
pub mod error;
pub mod json;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use msgrelay_core::{Broadcaster, MessageStore, MutationExecutor};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The message store, for reads.
    pub store: Arc<MessageStore>,
    /// The pub-sub hub, for subscriptions.
    pub broadcaster: Arc<Broadcaster>,
    /// The single write path for both surfaces.
    pub mutations: Arc<MutationExecutor>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        store: Arc<MessageStore>,
        broadcaster: Arc<Broadcaster>,
        mutations: Arc<MutationExecutor>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            store,
            broadcaster,
            mutations,
            config,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::query::routes())
        .merge(routes::mutation::routes())
        .merge(routes::messages::routes())
        .merge(routes::subscribe::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
