//! Mutation endpoint for the structured surface.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::AppError;
use crate::json::{MutationRequest, MutationResponse};
use crate::AppState;

/// Mutation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/mutate", post(handle_mutate))
}

/// Handle a structured mutation. Both operations go through the shared
/// executor, so subscribers are notified exactly as for REST writes.
async fn handle_mutate(
    State(state): State<AppState>,
    Json(mutation): Json<MutationRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let message = match mutation {
        MutationRequest::AddMessage { content, word } => {
            state.mutations.create_message(content, word)?
        }
        MutationRequest::UpdateMessage { id, content, word } => {
            state.mutations.update_message(id, content, word)?
        }
    };

    Ok(Json(MutationResponse {
        success: true,
        data: message,
    }))
}
