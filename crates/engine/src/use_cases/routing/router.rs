//! Message router.
//!
//! Applies the routing table to one inbound event: resolve the session,
//! authorize against its live state, apply the rule's mutation, and plan
//! deliveries to the rule's targets. All of this happens while the caller
//! holds the registry lock, so the plan reflects the state the event was
//! authorized against.

use tablerelay_domain::{ConnectionId, DmTransition, Session, SessionCode, TokenRecord};
use tablerelay_shared::{
    ClientMessage, DmClaimed, RequestPayload, ResponseResult, ServerMessage, SessionCreated,
    SessionJoined, SessionLeft, SessionSnapshot,
};

use crate::stores::SessionRegistry;
use crate::use_cases::routing::table::{EventKind, RoutingRule, SessionMutation};
use crate::use_cases::routing::{Delivery, RouteError};
use crate::use_cases::session::{role_assignment, MembershipCoordinator};

/// Deliveries around a request's reply.
struct RequestOutcome {
    before: Vec<Delivery>,
    reply: ResponseResult,
    after: Vec<Delivery>,
}

impl RequestOutcome {
    fn reply(reply: ResponseResult) -> Self {
        Self {
            before: Vec::new(),
            reply,
            after: Vec::new(),
        }
    }
}

pub struct MessageRouter {
    membership: MembershipCoordinator,
}

impl MessageRouter {
    pub fn new(membership: MembershipCoordinator) -> Self {
        Self { membership }
    }

    /// Handle one inbound message from `sender`.
    pub fn dispatch(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        message: ClientMessage,
    ) -> Vec<Delivery> {
        match message {
            ClientMessage::Request {
                request_id,
                payload,
            } => self.handle_request(registry, sender, request_id, payload),
            ClientMessage::Heartbeat => vec![Delivery::to(sender, ServerMessage::Pong)],
            ClientMessage::Unknown => {
                tracing::debug!(connection_id = %sender, "Ignoring unknown message type");
                Vec::new()
            }
            relay => match self.handle_relay(registry, sender, relay) {
                Ok(deliveries) => deliveries,
                Err(e) => {
                    tracing::debug!(connection_id = %sender, error = %e, "Relay dropped");
                    Vec::new()
                }
            },
        }
    }

    /// The transport lost `connection`.
    pub fn disconnect(&self, registry: &mut SessionRegistry, connection: ConnectionId) -> Vec<Delivery> {
        self.membership.depart(registry, connection)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    fn handle_request(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        request_id: String,
        payload: RequestPayload,
    ) -> Vec<Delivery> {
        let outcome = match EventKind::of_request(&payload) {
            Some(kind) => self.apply_request(registry, sender, kind, payload),
            None => Err(RouteError::MalformedRequest(
                "unknown request type".to_string(),
            )),
        };

        let outcome = outcome.unwrap_or_else(|e| {
            tracing::debug!(connection_id = %sender, request_id = %request_id, error = %e, "Request rejected");
            RequestOutcome::reply(e.to_response())
        });

        let mut deliveries = outcome.before;
        deliveries.push(Delivery::to(
            sender,
            ServerMessage::response(request_id, outcome.reply),
        ));
        deliveries.extend(outcome.after);
        deliveries
    }

    fn apply_request(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        kind: EventKind,
        payload: RequestPayload,
    ) -> Result<RequestOutcome, RouteError> {
        let rule = kind.rule();
        let raw_code = payload.session_code().unwrap_or_default().to_string();

        match (rule.mutation, payload) {
            (SessionMutation::CreateSession, _) => Ok(self.create_session(registry, sender, rule)),
            (
                SessionMutation::AddMember,
                RequestPayload::JoinSession {
                    player_name,
                    initiative,
                    initiative_modifier,
                    ..
                },
            ) => self.join_session(
                registry,
                sender,
                &raw_code,
                rule,
                ServerMessage::AddPlayer {
                    player: sender.to_string(),
                    player_name,
                    initiative,
                    initiative_modifier,
                    is_dummy: false,
                },
            ),
            (SessionMutation::RemoveMember, _) => self.leave_session(registry, sender, &raw_code),
            (SessionMutation::SetDm, _) => Self::claim_dm(registry, sender, &raw_code, rule),
            (SessionMutation::None, _) => Ok(Self::sync(registry, &raw_code)),
            (mutation, _) => Err(RouteError::MalformedRequest(format!(
                "{mutation:?} does not apply to {kind:?}"
            ))),
        }
    }

    fn create_session(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        rule: RoutingRule,
    ) -> RequestOutcome {
        let before = self.membership.depart(registry, sender);
        let (code, transition) = registry.create(sender);
        let recipients = registry
            .lookup(&code)
            .map(|session| rule.recipients(session, sender))
            .unwrap_or_default();
        RequestOutcome {
            before,
            reply: ResponseResult::success(SessionCreated {
                session_code: code.to_string(),
            }),
            after: role_assignment::announce_transition(transition, &recipients),
        }
    }

    /// Recipients get `announce` before the reply and a re-sync request
    /// after it.
    fn join_session(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        raw_code: &str,
        rule: RoutingRule,
        announce: ServerMessage,
    ) -> Result<RequestOutcome, RouteError> {
        let code = authorize(registry, EventKind::JoinSession, sender, raw_code, None)?;

        let mut before = Vec::new();
        let admission = self
            .membership
            .join(registry, sender, &code, &mut before)
            .ok_or_else(|| RouteError::SessionNotFound(code.to_string()))?;

        let mut after = Vec::new();
        if admission.newly_joined {
            let recipients = registry
                .lookup(&code)
                .map(|session| rule.recipients(session, sender))
                .unwrap_or_default();
            if !recipients.is_empty() {
                before.push(Delivery::to_all(recipients.clone(), announce));
                after.push(Delivery::to_all(recipients, ServerMessage::SyncPlayerData));
            }
        }

        Ok(RequestOutcome {
            before,
            reply: ResponseResult::success(SessionJoined {
                joined: true,
                scene_reference: admission.scene_reference,
            }),
            after,
        })
    }

    fn leave_session(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        raw_code: &str,
    ) -> Result<RequestOutcome, RouteError> {
        let code = authorize(registry, EventKind::LeaveSession, sender, raw_code, None)?;

        if registry.session_of(sender) != Some(&code) {
            return Ok(RequestOutcome::reply(ResponseResult::success(SessionLeft {
                left: false,
            })));
        }

        Ok(RequestOutcome {
            before: self.membership.depart(registry, sender),
            reply: ResponseResult::success(SessionLeft { left: true }),
            after: Vec::new(),
        })
    }

    fn sync(registry: &SessionRegistry, raw_code: &str) -> RequestOutcome {
        let snapshot = SessionCode::new(raw_code)
            .ok()
            .and_then(|code| registry.lookup(&code))
            .map(|session| SessionSnapshot {
                session_exists: true,
                has_dm: session.has_dm(),
                scene_reference: session.scene_reference().map(str::to_string),
                tokens: session
                    .tokens()
                    .iter()
                    .map(|token| token.as_value().clone())
                    .collect(),
            })
            .unwrap_or(SessionSnapshot {
                session_exists: false,
                has_dm: false,
                scene_reference: None,
                tokens: Vec::new(),
            });
        RequestOutcome::reply(ResponseResult::success(snapshot))
    }

    fn claim_dm(
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        raw_code: &str,
        rule: RoutingRule,
    ) -> Result<RequestOutcome, RouteError> {
        let code = authorize(registry, EventKind::ClaimDm, sender, raw_code, None)?;
        let session = registry
            .lookup_mut(&code)
            .ok_or_else(|| RouteError::SessionNotFound(code.to_string()))?;

        let transition = session.claim_dm(sender)?;
        tracing::info!(connection_id = %sender, session_code = %code, "DM role claimed");

        Ok(RequestOutcome {
            before: Vec::new(),
            reply: ResponseResult::success(DmClaimed { dm: sender.into() }),
            after: role_assignment::announce_transition(
                transition,
                &rule.recipients(session, sender),
            ),
        })
    }

    // =========================================================================
    // Relays
    // =========================================================================

    fn handle_relay(
        &self,
        registry: &mut SessionRegistry,
        sender: ConnectionId,
        message: ClientMessage,
    ) -> Result<Vec<Delivery>, RouteError> {
        let Some(kind) = EventKind::of_relay(&message) else {
            return Ok(Vec::new());
        };
        let rule = kind.rule();
        let raw_code = message.session_code().unwrap_or_default().to_string();
        let named_player = message.named_player().map(str::to_string);

        let code = authorize(registry, kind, sender, &raw_code, named_player.as_deref())?;
        let session = registry
            .lookup_mut(&code)
            .ok_or_else(|| RouteError::SessionNotFound(raw_code.clone()))?;

        let transition = apply_relay_mutation(rule.mutation, session, sender, &message)?;
        let recipients = rule.recipients(session, sender);

        if let Some(transition) = transition {
            return Ok(role_assignment::announce_transition(transition, &recipients));
        }

        let Some(outbound) = relay_message(message, sender) else {
            return Ok(Vec::new());
        };
        if recipients.is_empty() {
            tracing::debug!(session_code = %code, event = ?kind, "No recipients for relay");
            return Ok(Vec::new());
        }
        Ok(vec![Delivery::to_all(recipients, outbound)])
    }
}

/// Resolve the session named by `raw_code` and run the event's authorization
/// check against its live state.
///
/// A code that is not a valid session code cannot name a live session and is
/// reported as not found.
fn authorize(
    registry: &SessionRegistry,
    kind: EventKind,
    sender: ConnectionId,
    raw_code: &str,
    named_player: Option<&str>,
) -> Result<SessionCode, RouteError> {
    let not_found = || RouteError::SessionNotFound(raw_code.to_string());
    let code = SessionCode::new(raw_code).map_err(|_| not_found())?;
    let session = registry.lookup(&code).ok_or_else(not_found)?;
    kind.rule()
        .authorization
        .check(session, sender, named_player)?;
    Ok(code)
}

/// Apply a relay's mutation. Returns the DM transition when the event moved
/// the DM role.
fn apply_relay_mutation(
    mutation: SessionMutation,
    session: &mut Session,
    sender: ConnectionId,
    message: &ClientMessage,
) -> Result<Option<DmTransition>, RouteError> {
    match (mutation, message) {
        (SessionMutation::None, _) => Ok(None),
        (SessionMutation::SetSceneReference, ClientMessage::LoadMap { url, .. }) => {
            session.publish_scene(sender, url.clone())?;
            tracing::info!(session_code = %session.code(), url = %url, "Session loaded map");
            Ok(None)
        }
        (SessionMutation::ReplaceTokens, ClientMessage::PublishTokens { tokens, .. }) => {
            session.publish_tokens(sender, tokens.iter().cloned().map(TokenRecord::from).collect())?;
            Ok(None)
        }
        (SessionMutation::SetDm, ClientMessage::TransferDm { player, .. }) => {
            let transition = session.transfer_dm(ConnectionId::from_uuid(*player))?;
            tracing::info!(
                session_code = %session.code(),
                requested_by = %sender,
                dm = %player,
                "DM role transferred"
            );
            Ok(Some(transition))
        }
        (mutation, _) => Err(RouteError::MalformedRequest(format!(
            "{mutation:?} does not apply to this event"
        ))),
    }
}

/// Outbound form of a relay event. Events that only move the DM role have
/// none; their notices come from the transition.
fn relay_message(message: ClientMessage, sender: ConnectionId) -> Option<ServerMessage> {
    Some(match message {
        ClientMessage::LoadMap { url, .. } => ServerMessage::LoadMap { url },
        ClientMessage::PublishTokens { tokens, .. } => ServerMessage::TokensUpdated { tokens },
        ClientMessage::UpdateSheet { sheet, .. } => ServerMessage::SheetUpdated {
            player: sender.into(),
            sheet,
        },
        ClientMessage::UpdateHp { hp, .. } => ServerMessage::HpUpdated {
            player: sender.into(),
            hp,
        },
        ClientMessage::SubmitInitiative { initiative, .. } => ServerMessage::InitiativeSubmitted {
            player: sender.into(),
            initiative,
        },
        ClientMessage::SyncPlayerData {
            player_name,
            initiative,
            initiative_modifier,
            ..
        } => ServerMessage::AddPlayer {
            player: sender.to_string(),
            player_name,
            initiative,
            initiative_modifier,
            is_dummy: false,
        },
        ClientMessage::AddParticipant {
            player,
            player_name,
            initiative,
            initiative_modifier,
            ..
        } => ServerMessage::AddPlayer {
            player,
            player_name,
            initiative,
            initiative_modifier,
            is_dummy: false,
        },
        ClientMessage::AddDummy {
            dummy_id,
            name,
            initiative_modifier,
            ..
        } => ServerMessage::AddPlayer {
            player: dummy_id,
            player_name: Some(name),
            initiative: None,
            initiative_modifier,
            is_dummy: true,
        },
        ClientMessage::RemoveParticipant { player, .. }
        | ClientMessage::RemoveDummy { player, .. } => ServerMessage::RemovePlayer { player },
        ClientMessage::UpdateInitiative {
            player, initiative, ..
        } => ServerMessage::InitiativeUpdated { player, initiative },
        ClientMessage::UpdateInitiativeModifier {
            player,
            initiative_modifier,
            ..
        } => ServerMessage::InitiativeModifierUpdated {
            player,
            initiative_modifier,
        },
        ClientMessage::TransferDm { .. }
        | ClientMessage::Request { .. }
        | ClientMessage::Heartbeat
        | ClientMessage::Unknown => return None,
    })
}
