//! Application state and composition.

use std::sync::Arc;

use tokio::sync::Mutex;

use tablerelay_domain::ConnectionId;
use tablerelay_shared::ClientMessage;

use crate::api::connections::ConnectionManager;
use crate::infrastructure::app_settings::EngineSettings;
use crate::infrastructure::ports::RandomPort;
use crate::infrastructure::random::SystemRandom;
use crate::stores::{SessionCodeAllocator, SessionRegistry};
use crate::use_cases::{MembershipCoordinator, MessageRouter};

/// Main application state.
///
/// Passed to HTTP/WebSocket handlers via Axum state. Every inbound event is
/// handled with the registry locked, from authorization through delivery, so
/// events are applied one at a time and outbound order follows causal order.
pub struct App {
    pub settings: EngineSettings,
    pub connections: Arc<ConnectionManager>,
    registry: Mutex<SessionRegistry>,
    router: MessageRouter,
}

impl App {
    pub fn new(settings: EngineSettings, connections: Arc<ConnectionManager>) -> Self {
        Self::with_random(settings, connections, Arc::new(SystemRandom::new()))
    }

    /// Compose the app with an explicit randomness source for session codes.
    pub fn with_random(
        settings: EngineSettings,
        connections: Arc<ConnectionManager>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let allocator = SessionCodeAllocator::new(random, settings.session_code_length);
        let router = MessageRouter::new(MembershipCoordinator::new(settings.auto_reassign_dm));
        Self {
            registry: Mutex::new(SessionRegistry::new(allocator)),
            router,
            connections,
            settings,
        }
    }

    /// Route one inbound message and deliver the result.
    pub async fn handle_message(&self, sender: ConnectionId, message: ClientMessage) {
        let mut registry = self.registry.lock().await;
        let deliveries = self.router.dispatch(&mut registry, sender, message);
        self.connections.deliver(deliveries);
    }

    /// The transport lost `connection`: depart its session.
    pub async fn handle_disconnect(&self, connection: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let deliveries = self.router.disconnect(&mut registry, connection);
        self.connections.deliver(deliveries);
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.registry.lock().await.len()
    }
}
