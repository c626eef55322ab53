//! Routing errors.

use tablerelay_domain::{ConnectionId, RoleError};
use tablerelay_shared::{ErrorCode, ResponseResult};
use thiserror::Error;

/// Why an inbound event was not carried out.
///
/// Requests turn these into an error reply. For relay events they are only
/// logged: an unauthorized or stale relay is dropped without a reply.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("DM role is already held by {current}")]
    RoleConflict { current: ConnectionId },

    #[error("Unauthorized: {0}")]
    Unauthorized(RoleError),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl RouteError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RouteError::SessionNotFound(_) => ErrorCode::NotFound,
            RouteError::RoleConflict { .. } => ErrorCode::Conflict,
            RouteError::Unauthorized(_) => ErrorCode::Forbidden,
            RouteError::MalformedRequest(_) => ErrorCode::BadRequest,
        }
    }

    pub fn to_response(&self) -> ResponseResult {
        ResponseResult::error(self.code(), self.to_string())
    }
}

impl From<RoleError> for RouteError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::AlreadyAssigned { current } => RouteError::RoleConflict { current },
            other => RouteError::Unauthorized(other),
        }
    }
}
