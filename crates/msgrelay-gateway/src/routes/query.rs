//! Query endpoint for the structured surface.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::AppError;
use crate::json::{QueryMeta, QueryRequest, QueryResponse};
use crate::AppState;

/// Query routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/query", post(handle_query))
}

/// Handle a structured query.
async fn handle_query(
    State(state): State<AppState>,
    Json(query): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    match query {
        QueryRequest::Messages => {
            let messages = state.store.list();
            let meta = QueryMeta {
                total_messages: messages.len(),
            };
            Ok(Json(QueryResponse {
                success: true,
                data: messages,
                meta,
            }))
        }
    }
}
