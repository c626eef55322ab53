//! Planned outbound messages.

use tablerelay_domain::ConnectionId;
use tablerelay_shared::ServerMessage;

/// One outbound message and the connections that receive it.
///
/// Recipients are resolved when the delivery is planned, under the registry
/// lock; a list of deliveries is executed in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub recipients: Vec<ConnectionId>,
    pub message: ServerMessage,
}

impl Delivery {
    pub fn to(recipient: ConnectionId, message: ServerMessage) -> Self {
        Self {
            recipients: vec![recipient],
            message,
        }
    }

    pub fn to_all(recipients: Vec<ConnectionId>, message: ServerMessage) -> Self {
        Self {
            recipients,
            message,
        }
    }

    pub fn reaches(&self, connection: ConnectionId) -> bool {
        self.recipients.contains(&connection)
    }
}
