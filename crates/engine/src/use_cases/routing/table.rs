//! Authorization and routing table.
//!
//! Every inbound event kind maps to one [`RoutingRule`]: who may send it,
//! who receives its broadcast, and what it changes. The router authorizes,
//! mutates and resolves recipients from this table.
//!
//! Requests always reply to the sender; the targets column covers only the
//! broadcast. Departure notices (RemovePlayer, DM vacancy) are planned by the
//! membership coordinator, because a disconnect has no event of its own.
//!
//! | Event | Authorization | Targets | Mutation |
//! |---|---|---|---|
//! | CreateSession | none | all members | create session, sender is DM |
//! | JoinSession | session exists | other members | add member |
//! | LeaveSession | session exists | - | remove member |
//! | Sync | none | - | none |
//! | ClaimDm | vacant DM slot | all members | set DM |
//! | LoadMap | sender is DM | other members | scene reference |
//! | PublishTokens | sender is DM | other members | token snapshot |
//! | TransferDm | session exists | all members | set DM |
//! | UpdateSheet, UpdateHp, SubmitInitiative, SyncPlayerData | member, not DM | DM | none |
//! | AddParticipant, RemoveParticipant, AddDummy, RemoveDummy | sender is DM | other members | none |
//! | UpdateInitiative, UpdateInitiativeModifier | DM or named player | other members | none |

use tablerelay_domain::{ConnectionId, RoleError, Session};
use tablerelay_shared::{ClientMessage, RequestPayload};

/// Who may send an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// No session involved.
    None,
    /// The named session must exist; no role required.
    SessionExists,
    /// The sender must currently hold the DM slot.
    SenderIsDm,
    /// The sender must be a member that does not hold the DM slot.
    SenderIsMemberNotDm,
    /// The current DM, or the member the event names as `player`.
    DmOrNamedPlayer,
    /// The sender must be a member and the DM slot must be vacant.
    VacantDmSlot,
}

/// Who receives an event's broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector {
    /// Every member except the sender.
    OtherMembers,
    /// Every member, sender included. DM changes use this so the new DM
    /// gets `AssignDm` and everyone else the re-sync.
    AllMembers,
    /// The session's current DM only.
    Dm,
}

impl TargetSelector {
    /// Resolve to concrete connections against the session's live state.
    pub fn select(self, session: &Session, sender: ConnectionId) -> Vec<ConnectionId> {
        match self {
            TargetSelector::OtherMembers => session.members_except(sender),
            TargetSelector::AllMembers => session.members().to_vec(),
            TargetSelector::Dm => session.dm().into_iter().collect(),
        }
    }
}

/// State an event changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMutation {
    None,
    CreateSession,
    AddMember,
    RemoveMember,
    SetDm,
    SetSceneReference,
    ReplaceTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingRule {
    pub authorization: Authorization,
    /// `None` when the event broadcasts nothing itself.
    pub targets: Option<TargetSelector>,
    pub mutation: SessionMutation,
}

impl RoutingRule {
    /// Recipients of the event's broadcast, in join order.
    pub fn recipients(&self, session: &Session, sender: ConnectionId) -> Vec<ConnectionId> {
        self.targets
            .map_or_else(Vec::new, |targets| targets.select(session, sender))
    }
}

const fn rule(
    authorization: Authorization,
    targets: Option<TargetSelector>,
    mutation: SessionMutation,
) -> RoutingRule {
    RoutingRule {
        authorization,
        targets,
        mutation,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CreateSession,
    JoinSession,
    LeaveSession,
    Sync,
    ClaimDm,
    LoadMap,
    PublishTokens,
    TransferDm,
    UpdateSheet,
    UpdateHp,
    SubmitInitiative,
    SyncPlayerData,
    AddParticipant,
    RemoveParticipant,
    AddDummy,
    RemoveDummy,
    UpdateInitiative,
    UpdateInitiativeModifier,
}

impl EventKind {
    pub const ALL: [EventKind; 18] = [
        EventKind::CreateSession,
        EventKind::JoinSession,
        EventKind::LeaveSession,
        EventKind::Sync,
        EventKind::ClaimDm,
        EventKind::LoadMap,
        EventKind::PublishTokens,
        EventKind::TransferDm,
        EventKind::UpdateSheet,
        EventKind::UpdateHp,
        EventKind::SubmitInitiative,
        EventKind::SyncPlayerData,
        EventKind::AddParticipant,
        EventKind::RemoveParticipant,
        EventKind::AddDummy,
        EventKind::RemoveDummy,
        EventKind::UpdateInitiative,
        EventKind::UpdateInitiativeModifier,
    ];

    pub const fn rule(self) -> RoutingRule {
        use Authorization as A;
        use SessionMutation as M;
        use TargetSelector as T;

        match self {
            EventKind::CreateSession => rule(A::None, Some(T::AllMembers), M::CreateSession),
            EventKind::JoinSession => rule(A::SessionExists, Some(T::OtherMembers), M::AddMember),
            EventKind::LeaveSession => rule(A::SessionExists, None, M::RemoveMember),
            EventKind::Sync => rule(A::None, None, M::None),
            EventKind::ClaimDm => rule(A::VacantDmSlot, Some(T::AllMembers), M::SetDm),
            EventKind::LoadMap => rule(A::SenderIsDm, Some(T::OtherMembers), M::SetSceneReference),
            EventKind::PublishTokens => rule(A::SenderIsDm, Some(T::OtherMembers), M::ReplaceTokens),
            EventKind::TransferDm => rule(A::SessionExists, Some(T::AllMembers), M::SetDm),

            // Private player data goes to the DM only.
            EventKind::UpdateSheet
            | EventKind::UpdateHp
            | EventKind::SubmitInitiative
            | EventKind::SyncPlayerData => rule(A::SenderIsMemberNotDm, Some(T::Dm), M::None),

            EventKind::AddParticipant
            | EventKind::RemoveParticipant
            | EventKind::AddDummy
            | EventKind::RemoveDummy => rule(A::SenderIsDm, Some(T::OtherMembers), M::None),

            EventKind::UpdateInitiative | EventKind::UpdateInitiativeModifier => {
                rule(A::DmOrNamedPlayer, Some(T::OtherMembers), M::None)
            }
        }
    }

    /// Kind of a request payload; `None` for unknown request types.
    pub fn of_request(payload: &RequestPayload) -> Option<Self> {
        Some(match payload {
            RequestPayload::CreateSession => EventKind::CreateSession,
            RequestPayload::JoinSession { .. } => EventKind::JoinSession,
            RequestPayload::LeaveSession { .. } => EventKind::LeaveSession,
            RequestPayload::Sync { .. } => EventKind::Sync,
            RequestPayload::ClaimDm { .. } => EventKind::ClaimDm,
            RequestPayload::Unknown => return None,
        })
    }

    /// Kind of a fire-and-forget relay event.
    pub fn of_relay(message: &ClientMessage) -> Option<Self> {
        Some(match message {
            ClientMessage::LoadMap { .. } => EventKind::LoadMap,
            ClientMessage::PublishTokens { .. } => EventKind::PublishTokens,
            ClientMessage::TransferDm { .. } => EventKind::TransferDm,
            ClientMessage::UpdateSheet { .. } => EventKind::UpdateSheet,
            ClientMessage::UpdateHp { .. } => EventKind::UpdateHp,
            ClientMessage::SubmitInitiative { .. } => EventKind::SubmitInitiative,
            ClientMessage::SyncPlayerData { .. } => EventKind::SyncPlayerData,
            ClientMessage::AddParticipant { .. } => EventKind::AddParticipant,
            ClientMessage::RemoveParticipant { .. } => EventKind::RemoveParticipant,
            ClientMessage::AddDummy { .. } => EventKind::AddDummy,
            ClientMessage::RemoveDummy { .. } => EventKind::RemoveDummy,
            ClientMessage::UpdateInitiative { .. } => EventKind::UpdateInitiative,
            ClientMessage::UpdateInitiativeModifier { .. } => EventKind::UpdateInitiativeModifier,
            ClientMessage::Request { .. } | ClientMessage::Heartbeat | ClientMessage::Unknown => {
                return None
            }
        })
    }
}

impl Authorization {
    /// Check `sender` against the session's live state.
    ///
    /// `named_player` is the `player` field of the event, for
    /// [`Authorization::DmOrNamedPlayer`].
    ///
    /// # Errors
    ///
    /// The [`RoleError`] describing the failed check; nothing is mutated.
    pub fn check(
        self,
        session: &Session,
        sender: ConnectionId,
        named_player: Option<&str>,
    ) -> Result<(), RoleError> {
        match self {
            Authorization::None | Authorization::SessionExists => Ok(()),
            Authorization::SenderIsDm => session.require_dm(sender),
            Authorization::SenderIsMemberNotDm => {
                require_member(session, sender)?;
                session.require_not_dm(sender)
            }
            Authorization::DmOrNamedPlayer => {
                if session.is_dm(sender) {
                    return Ok(());
                }
                require_member(session, sender)?;
                match named_player {
                    Some(player) if player == sender.to_string() => Ok(()),
                    _ => Err(RoleError::NotDm),
                }
            }
            Authorization::VacantDmSlot => {
                require_member(session, sender)?;
                match session.dm() {
                    Some(current) => Err(RoleError::AlreadyAssigned { current }),
                    None => Ok(()),
                }
            }
        }
    }
}

fn require_member(session: &Session, sender: ConnectionId) -> Result<(), RoleError> {
    if session.is_member(sender) {
        Ok(())
    } else {
        Err(RoleError::NotMember)
    }
}
