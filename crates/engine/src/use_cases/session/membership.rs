//! Membership coordination.
//!
//! Every way a connection leaves a session (explicit leave, joining or
//! creating another session, socket close) goes through [`MembershipCoordinator::depart`].

use tablerelay_domain::{ConnectionId, MembershipUpdate, SessionCode};

use crate::stores::SessionRegistry;
use crate::use_cases::routing::Delivery;
use crate::use_cases::session::role_assignment;

/// Outcome of admitting a connection to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    /// False when the connection was already a member.
    pub newly_joined: bool,
    pub scene_reference: Option<String>,
}

pub struct MembershipCoordinator {
    auto_reassign_dm: bool,
}

impl MembershipCoordinator {
    pub fn new(auto_reassign_dm: bool) -> Self {
        Self { auto_reassign_dm }
    }

    /// Remove `connection` from whatever session it belongs to.
    ///
    /// The session and the departing member are re-resolved from the registry
    /// here, so a session or DM that vanished in the meantime is treated as
    /// already gone. The session is deleted once its last member leaves.
    pub fn depart(&self, registry: &mut SessionRegistry, connection: ConnectionId) -> Vec<Delivery> {
        let Some(code) = registry.forget_membership(connection) else {
            return Vec::new();
        };

        let Some(session) = registry.lookup_mut(&code) else {
            tracing::warn!(
                connection_id = %connection,
                session_code = %code,
                "Membership pointed at a missing session"
            );
            return Vec::new();
        };

        let Some(departure) = session.depart(connection, self.auto_reassign_dm) else {
            tracing::warn!(
                connection_id = %connection,
                session_code = %code,
                "Connection was indexed but not a session member"
            );
            return Vec::new();
        };

        tracing::info!(
            connection_id = %connection,
            session_code = %code,
            was_dm = departure.was_dm(),
            remaining = departure.remaining.len(),
            "Player left session"
        );

        let deliveries = role_assignment::announce_departure(&departure);
        if departure.session_emptied() {
            registry.delete(&code);
        }
        deliveries
    }

    /// Move `connection` into the session `code`.
    ///
    /// Any other session the connection belongs to is departed first; those
    /// departure deliveries are appended to `deliveries`. Returns `None` when
    /// `code` names no live session, in which case nothing changes.
    pub fn join(
        &self,
        registry: &mut SessionRegistry,
        connection: ConnectionId,
        code: &SessionCode,
        deliveries: &mut Vec<Delivery>,
    ) -> Option<Admission> {
        registry.lookup(code)?;

        if registry.session_of(connection).is_some_and(|current| current != code) {
            deliveries.extend(self.depart(registry, connection));
        }

        let update = registry.admit(code, connection)?;
        let scene_reference = registry
            .lookup(code)
            .and_then(|session| session.scene_reference().map(str::to_string));

        let newly_joined = match update {
            MembershipUpdate::Joined { existing, .. } => {
                tracing::info!(
                    connection_id = %connection,
                    session_code = %code,
                    existing = existing.len(),
                    "Session joined"
                );
                true
            }
            MembershipUpdate::AlreadyMember { .. } => {
                tracing::debug!(connection_id = %connection, session_code = %code, "Already a member");
                false
            }
        };

        Some(Admission {
            newly_joined,
            scene_reference,
        })
    }
}
