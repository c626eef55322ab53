//! Live session registry.
//!
//! Owns every `Session` plus the connection → session index. A connection is
//! a member of at most one session at a time.

use std::collections::HashMap;

use tablerelay_domain::{ConnectionId, DmTransition, MembershipUpdate, Session, SessionCode};

use crate::stores::code_allocator::SessionCodeAllocator;

pub struct SessionRegistry {
    sessions: HashMap<SessionCode, Session>,
    memberships: HashMap<ConnectionId, SessionCode>,
    allocator: SessionCodeAllocator,
}

impl SessionRegistry {
    pub fn new(allocator: SessionCodeAllocator) -> Self {
        Self {
            sessions: HashMap::new(),
            memberships: HashMap::new(),
            allocator,
        }
    }

    /// Open a session under a freshly allocated code with `creator` as DM.
    ///
    /// The caller must have removed `creator` from any previous session.
    pub fn create(&mut self, creator: ConnectionId) -> (SessionCode, DmTransition) {
        let code = self
            .allocator
            .allocate(|candidate| self.sessions.contains_key(candidate));
        let (session, transition) = Session::open(code.clone(), creator);
        self.sessions.insert(code.clone(), session);
        self.memberships.insert(creator, code.clone());
        tracing::info!(session_code = %code, connection_id = %creator, "Session created");
        (code, transition)
    }

    pub fn lookup(&self, code: &SessionCode) -> Option<&Session> {
        self.sessions.get(code)
    }

    pub fn lookup_mut(&mut self, code: &SessionCode) -> Option<&mut Session> {
        self.sessions.get_mut(code)
    }

    /// Drop a session and any index entries still pointing at it.
    pub fn delete(&mut self, code: &SessionCode) -> Option<Session> {
        let removed = self.sessions.remove(code)?;
        self.memberships.retain(|_, session_code| session_code != code);
        tracing::info!(session_code = %code, "Deleting empty session");
        Some(removed)
    }

    /// Session `connection` currently belongs to.
    pub fn session_of(&self, connection: ConnectionId) -> Option<&SessionCode> {
        self.memberships.get(&connection)
    }

    /// Admit `connection` to an existing session.
    ///
    /// Returns `None` if the session does not exist. The caller must have
    /// removed `connection` from any other session.
    pub fn admit(&mut self, code: &SessionCode, connection: ConnectionId) -> Option<MembershipUpdate> {
        let session = self.sessions.get_mut(code)?;
        let update = session.admit(connection);
        self.memberships.insert(connection, code.clone());
        Some(update)
    }

    /// Clear the index entry for `connection`.
    pub fn forget_membership(&mut self, connection: ConnectionId) -> Option<SessionCode> {
        self.memberships.remove(&connection)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
