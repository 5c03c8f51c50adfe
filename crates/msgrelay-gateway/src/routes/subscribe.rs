//! Websocket endpoint streaming change events to live subscribers.

use axum::{
    extract::{
        ws::{Message as WsFrame, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use msgrelay_core::{matches_message_id, ChangeEvent, FilteredSubscription, Topic};
use serde::Serialize;

use crate::error::ErrorResponse;
use crate::json::SubscribeRequest;
use crate::AppState;

/// Subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/subscribe", get(subscribe_handler))
}

/// Upgrade to a websocket session.
async fn subscribe_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one subscriber session: read the subscribe request, register on the
/// hub, then pump events until the client goes away.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let request = match read_subscribe_request(&mut socket).await {
        Ok(Some(request)) => request,
        // Closed before subscribing; nothing was registered.
        Ok(None) => return,
        Err(reason) => {
            let frame = ErrorResponse::new("BAD_REQUEST", reason);
            if let Ok(text) = serde_json::to_string(&frame) {
                let _ = socket.send(WsFrame::Text(text)).await;
            }
            let _ = socket.send(WsFrame::Close(None)).await;
            return;
        }
    };

    let (sender, receiver) = socket.split();

    match request {
        SubscribeRequest::MessageAdded => {
            let subscription = state
                .broadcaster
                .clone()
                .subscribe(Topic::MessageAdded)
                .filtered(|_| true);
            pump(sender, receiver, subscription).await;
        }
        SubscribeRequest::MessageUpdated { id } => {
            let target = id.0;
            let subscription = state
                .broadcaster
                .clone()
                .subscribe(Topic::MessageUpdated)
                .filtered(move |event| matches_message_id(event, target));
            pump(sender, receiver, subscription).await;
        }
    }
    // The subscription dropped here, deregistering from the broadcaster.
}

/// Wait for the first text frame and parse it as a subscribe request.
async fn read_subscribe_request(
    socket: &mut WebSocket,
) -> Result<Option<SubscribeRequest>, String> {
    while let Some(frame) = socket.recv().await {
        match frame {
            Ok(WsFrame::Text(text)) => {
                return serde_json::from_str(&text)
                    .map(Some)
                    .map_err(|e| format!("invalid subscribe request: {}", e));
            }
            Ok(WsFrame::Close(_)) => return Ok(None),
            // Pings are answered by axum; ignore anything else.
            Ok(_) => continue,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

/// Forward matching events to the client until it disconnects or the hub
/// shuts down.
async fn pump<F>(
    mut sender: SplitSink<WebSocket, WsFrame>,
    mut receiver: SplitStream<WebSocket>,
    mut subscription: FilteredSubscription<F>,
) where
    F: Fn(&ChangeEvent) -> bool,
{
    let subscription_id = subscription.id();
    tracing::debug!(subscription_id, "subscriber session started");

    loop {
        tokio::select! {
            event = subscription.recv() => match event {
                Some(event) => {
                    if !send_json(&mut sender, &event).await {
                        break;
                    }
                }
                // Hub closed; end the stream.
                None => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(WsFrame::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    tracing::debug!(subscription_id, "subscriber session ended");
}

/// Encode and send one JSON frame. Returns false once the client is gone.
async fn send_json<T: Serialize>(sender: &mut SplitSink<WebSocket, WsFrame>, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(text) => sender.send(WsFrame::Text(text)).await.is_ok(),
        Err(error) => {
            tracing::error!(%error, "failed to encode websocket frame");
            false
        }
    }
}
