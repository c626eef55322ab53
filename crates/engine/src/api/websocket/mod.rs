//! WebSocket handling for table clients.
//!
//! One socket is one connection. Inbound frames are parsed into
//! `ClientMessage` and handed to the app; outbound messages flow through a
//! bounded per-connection channel drained by a writer task.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use tablerelay_domain::ConnectionId;
use tablerelay_shared::{ClientMessage, ServerMessage};

use super::connections::ConnectionManager;
use crate::app::App;
use crate::use_cases::RouteError;

/// Combined state for WebSocket handlers.
pub struct WsState {
    pub app: Arc<App>,
    pub connections: Arc<ConnectionManager>,
}

impl WsState {
    pub fn new(app: Arc<App>) -> Self {
        let connections = app.connections.clone();
        Self { app, connections }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = ConnectionId::new();

    // Create a bounded channel for sending messages to this client
    let buffer = state.app.settings.connection_channel_buffer;
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(buffer);

    state.connections.register(connection_id, tx);
    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    state
        .connections
        .send(connection_id, ServerMessage::version_check(connection_id.into()));

    // Spawn a task to forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Failed to serialize server message"),
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        let parsed = match result {
            Ok(Message::Text(text)) => serde_json::from_str::<ClientMessage>(text.as_str()),
            Ok(Message::Binary(bytes)) => serde_json::from_slice::<ClientMessage>(&bytes),
            Ok(Message::Ping(_)) => {
                state.connections.send(connection_id, ServerMessage::Pong);
                continue;
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Ok(Message::Pong(_)) => continue,
            Err(e) => {
                tracing::warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
        };

        match parsed {
            Ok(msg) => state.app.handle_message(connection_id, msg).await,
            Err(e) => {
                let error = RouteError::MalformedRequest(e.to_string());
                tracing::warn!(connection_id = %connection_id, error = %error, "Ignoring message");
            }
        }
    }

    // Clean up
    state.app.handle_disconnect(connection_id).await;
    state.connections.unregister(connection_id);
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}

#[cfg(test)]
pub(crate) mod test_support;
