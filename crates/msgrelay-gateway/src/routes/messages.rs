//! Plain REST surface for creating and updating messages.

use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use msgrelay_core::{Message, MessageId};

use crate::error::AppError;
use crate::json::{CreateMessageBody, UpdateMessageBody};
use crate::AppState;

/// REST message routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(create_message))
        .route("/messages/:id", put(update_message))
}

/// Create a message. Responds with the bare message record.
async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<CreateMessageBody>,
) -> Result<Json<Message>, AppError> {
    // Validated here so no mutation or publish happens on bad input.
    let content = match body.content {
        Some(content) if !content.is_empty() => content,
        _ => return Err(AppError::BadRequest("content is required".to_string())),
    };

    let message = state.mutations.create_message(content, body.word)?;
    Ok(Json(message))
}

/// Update a message addressed by numeric id in the path.
async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMessageBody>,
) -> Result<Json<Message>, AppError> {
    let id: MessageId = id
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id format".to_string()))?;

    let message = state.mutations.update_message(id, body.content, body.word)?;
    Ok(Json(message))
}
