//! Session mutation outcomes.

use crate::ConnectionId;

/// Outcome of a transition of a session's DM slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmTransition {
    /// The slot now holds `dm`. `previous` is set for a handoff.
    Assigned {
        dm: ConnectionId,
        previous: Option<ConnectionId>,
    },
    /// The holder departed and the slot is empty.
    Vacated { previous: ConnectionId },
}

impl DmTransition {
    /// The connection that holds the slot after this transition, if any.
    pub fn new_dm(&self) -> Option<ConnectionId> {
        match self {
            DmTransition::Assigned { dm, .. } => Some(*dm),
            DmTransition::Vacated { .. } => None,
        }
    }
}

/// Outcome of admitting a connection to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipUpdate {
    /// Newly admitted. `existing` lists the members present before the join,
    /// in join order.
    Joined {
        member: ConnectionId,
        existing: Vec<ConnectionId>,
    },
    AlreadyMember { member: ConnectionId },
}

/// Everything that happened when one member left a session.
///
/// Produced in the order remaining clients must observe it: vacancy first,
/// then any reassignment, then the departure itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub departed: ConnectionId,
    /// Set when the departing member held the DM slot.
    pub vacated: Option<DmTransition>,
    /// Set when a remaining member was promoted into the vacated slot.
    pub reassigned: Option<DmTransition>,
    /// Members still present, in join order.
    pub remaining: Vec<ConnectionId>,
}

impl Departure {
    /// True when no member is left and the session must be dropped.
    pub fn session_emptied(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn was_dm(&self) -> bool {
        self.vacated.is_some()
    }
}
