//! Connection management for WebSocket clients.
//!
//! Tracks the outbound channel of every connected client. Session membership
//! lives in the registry; this only knows how to reach a connection.

use dashmap::DashMap;
use tokio::sync::mpsc;

use tablerelay_domain::ConnectionId;
use tablerelay_shared::ServerMessage;

use crate::use_cases::Delivery;

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    senders: DashMap<ConnectionId, mpsc::Sender<ServerMessage>>,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    /// Register a new connection.
    pub fn register(&self, connection_id: ConnectionId, sender: mpsc::Sender<ServerMessage>) {
        self.senders.insert(connection_id, sender);
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Unregister a connection.
    pub fn unregister(&self, connection_id: ConnectionId) {
        if self.senders.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    pub fn is_connected(&self, connection_id: ConnectionId) -> bool {
        self.senders.contains_key(&connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }

    /// Queue `message` for one connection.
    ///
    /// Returns false if the connection is unknown or its channel is full or
    /// closed. Never blocks.
    pub fn send(&self, connection_id: ConnectionId, message: ServerMessage) -> bool {
        let Some(sender) = self.senders.get(&connection_id) else {
            tracing::debug!(connection_id = %connection_id, "Send to unknown connection skipped");
            return false;
        };
        match sender.try_send(message) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to send message"
                );
                false
            }
        }
    }

    /// Execute planned deliveries in order.
    pub fn deliver(&self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            let Delivery {
                recipients,
                message,
            } = delivery;
            for recipient in recipients {
                self.send(recipient, message.clone());
            }
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
