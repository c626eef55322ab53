//! DM role state machine
//!
//! A session has exactly one DM slot with two states:
//!
//! ```text
//!            assign(c)                 hand_off(n)
//!   Vacant ------------> Assigned(c) -------------> Assigned(n)
//!     ^                      |
//!     +------ vacate(c) -----+
//! ```
//!
//! Auto-reassignment after a departure is `vacate` followed by `assign` of a
//! remaining member; the session aggregate decides whether a candidate exists.

use thiserror::Error;

use crate::events::DmTransition;
use crate::ConnectionId;

/// Why a role-gated operation was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("DM slot is already held by {current}")]
    AlreadyAssigned { current: ConnectionId },
    #[error("Connection is not the current DM")]
    NotDm,
    #[error("Only the DM's players may do this")]
    IsDm,
    #[error("Connection is not a member of this session")]
    NotMember,
}

/// Holder of a session's DM role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DmSlot {
    #[default]
    Vacant,
    Assigned(ConnectionId),
}

impl DmSlot {
    /// The connection currently holding the slot.
    pub fn current(&self) -> Option<ConnectionId> {
        match self {
            DmSlot::Vacant => None,
            DmSlot::Assigned(dm) => Some(*dm),
        }
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, DmSlot::Vacant)
    }

    pub fn is_held_by(&self, connection: ConnectionId) -> bool {
        self.current() == Some(connection)
    }

    /// `Vacant -> Assigned(connection)`.
    ///
    /// # Errors
    ///
    /// `RoleError::AlreadyAssigned` if the slot is taken; the slot is left
    /// untouched.
    pub fn assign(&mut self, connection: ConnectionId) -> Result<DmTransition, RoleError> {
        if let DmSlot::Assigned(current) = *self {
            return Err(RoleError::AlreadyAssigned { current });
        }
        *self = DmSlot::Assigned(connection);
        Ok(DmTransition::Assigned {
            dm: connection,
            previous: None,
        })
    }

    /// Unconditional handoff to `connection`, from any state.
    pub fn hand_off(&mut self, connection: ConnectionId) -> DmTransition {
        let previous = std::mem::replace(self, DmSlot::Assigned(connection)).current();
        DmTransition::Assigned {
            dm: connection,
            previous,
        }
    }

    /// `Assigned(departing) -> Vacant`.
    ///
    /// Returns `None` when `departing` does not hold the slot, including when
    /// the slot is already vacant.
    pub fn vacate(&mut self, departing: ConnectionId) -> Option<DmTransition> {
        if !self.is_held_by(departing) {
            return None;
        }
        *self = DmSlot::Vacant;
        Some(DmTransition::Vacated {
            previous: departing,
        })
    }
}
