//! Session aggregate - one live game room
//!
//! # Invariants
//!
//! - At most one DM at any time (enforced by [`DmSlot`])
//! - The DM, if any, is a current member
//! - Members are unique and kept in join order; the first remaining member is
//!   the auto-reassignment candidate
//! - An empty session is never kept alive: callers drop it as soon as
//!   [`Departure::session_emptied`] reports true
//!
//! Role checks always read the live slot, so a DM change between two requests
//! is observed by the second one.

use crate::aggregates::dm_slot::{DmSlot, RoleError};
use crate::events::{Departure, DmTransition, MembershipUpdate};
use crate::value_objects::{SessionCode, TokenRecord};
use crate::ConnectionId;

#[derive(Debug, Clone)]
pub struct Session {
    code: SessionCode,
    dm: DmSlot,
    /// Last scene/map URL broadcast by the DM
    scene_reference: Option<String>,
    /// Last full token snapshot pushed by the DM
    tokens: Vec<TokenRecord>,
    members: Vec<ConnectionId>,
}

impl Session {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Open a session with `creator` as its only member and its DM.
    pub fn open(code: SessionCode, creator: ConnectionId) -> (Self, DmTransition) {
        let session = Self {
            code,
            dm: DmSlot::Assigned(creator),
            scene_reference: None,
            tokens: Vec::new(),
            members: vec![creator],
        };
        let transition = DmTransition::Assigned {
            dm: creator,
            previous: None,
        };
        (session, transition)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    #[inline]
    pub fn dm(&self) -> Option<ConnectionId> {
        self.dm.current()
    }

    #[inline]
    pub fn has_dm(&self) -> bool {
        !self.dm.is_vacant()
    }

    pub fn is_dm(&self, connection: ConnectionId) -> bool {
        self.dm.is_held_by(connection)
    }

    pub fn scene_reference(&self) -> Option<&str> {
        self.scene_reference.as_deref()
    }

    pub fn tokens(&self) -> &[TokenRecord] {
        &self.tokens
    }

    /// Members in join order.
    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, connection: ConnectionId) -> bool {
        self.members.contains(&connection)
    }

    /// Every member except `connection`, in join order.
    pub fn members_except(&self, connection: ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .copied()
            .filter(|member| *member != connection)
            .collect()
    }

    // =========================================================================
    // Role checks
    // =========================================================================

    /// # Errors
    ///
    /// `RoleError::NotDm` unless `connection` holds the DM slot right now.
    pub fn require_dm(&self, connection: ConnectionId) -> Result<(), RoleError> {
        if self.is_dm(connection) {
            Ok(())
        } else {
            Err(RoleError::NotDm)
        }
    }

    /// # Errors
    ///
    /// `RoleError::IsDm` if `connection` holds the DM slot right now.
    pub fn require_not_dm(&self, connection: ConnectionId) -> Result<(), RoleError> {
        if self.is_dm(connection) {
            Err(RoleError::IsDm)
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Add `connection` to the member list.
    pub fn admit(&mut self, connection: ConnectionId) -> MembershipUpdate {
        if self.is_member(connection) {
            return MembershipUpdate::AlreadyMember { member: connection };
        }
        let existing = self.members.clone();
        self.members.push(connection);
        MembershipUpdate::Joined {
            member: connection,
            existing,
        }
    }

    /// Remove `connection` and drive the DM slot accordingly.
    ///
    /// If the departing member held the slot it becomes vacant; when
    /// `auto_reassign` is set and members remain, the first remaining member
    /// (join order) is promoted. Returns `None` if `connection` was not a
    /// member, leaving the session untouched.
    pub fn depart(&mut self, connection: ConnectionId, auto_reassign: bool) -> Option<Departure> {
        let position = self.members.iter().position(|m| *m == connection)?;
        self.members.remove(position);

        let vacated = self.dm.vacate(connection);
        let reassigned = match (vacated, self.members.first().copied()) {
            (Some(_), Some(candidate)) if auto_reassign => self.dm.assign(candidate).ok(),
            _ => None,
        };

        Some(Departure {
            departed: connection,
            vacated,
            reassigned,
            remaining: self.members.clone(),
        })
    }

    // =========================================================================
    // DM role transitions
    // =========================================================================

    /// Claim the vacant DM slot (login).
    ///
    /// # Errors
    ///
    /// - `RoleError::NotMember` if `connection` has not joined
    /// - `RoleError::AlreadyAssigned` if someone holds the slot
    pub fn claim_dm(&mut self, connection: ConnectionId) -> Result<DmTransition, RoleError> {
        if !self.is_member(connection) {
            return Err(RoleError::NotMember);
        }
        self.dm.assign(connection)
    }

    /// Hand the DM slot to `target`. No check is made on who asked for it.
    ///
    /// # Errors
    ///
    /// `RoleError::NotMember` if `target` is not in this session.
    pub fn transfer_dm(&mut self, target: ConnectionId) -> Result<DmTransition, RoleError> {
        if !self.is_member(target) {
            return Err(RoleError::NotMember);
        }
        Ok(self.dm.hand_off(target))
    }

    // =========================================================================
    // DM-published state
    // =========================================================================

    /// Record the scene/map reference published by the DM.
    ///
    /// # Errors
    ///
    /// `RoleError::NotDm` if `sender` is not the current DM; nothing changes.
    pub fn publish_scene(
        &mut self,
        sender: ConnectionId,
        url: impl Into<String>,
    ) -> Result<(), RoleError> {
        self.require_dm(sender)?;
        self.scene_reference = Some(url.into());
        Ok(())
    }

    /// Replace the token snapshot with the one published by the DM.
    ///
    /// # Errors
    ///
    /// `RoleError::NotDm` if `sender` is not the current DM; nothing changes.
    pub fn publish_tokens(
        &mut self,
        sender: ConnectionId,
        tokens: Vec<TokenRecord>,
    ) -> Result<(), RoleError> {
        self.require_dm(sender)?;
        self.tokens = tokens;
        Ok(())
    }
}
