//! Request payloads for the request/response pattern
//!
//! A request travels as `ClientMessage::Request { request_id, payload }` and is
//! answered at most once with `ServerMessage::Response` carrying the same
//! `request_id`.

use serde::{Deserialize, Serialize};

/// Operations that expect a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestPayload {
    /// Open a new session with the sender as DM
    CreateSession,

    /// Join an existing session as a player
    JoinSession {
        session_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initiative: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initiative_modifier: Option<serde_json::Value>,
    },

    /// Leave a session
    LeaveSession { session_code: String },

    /// Read-only snapshot of a session (does not join it)
    Sync { session_code: String },

    /// Take the DM role of a session whose DM slot is vacant
    ClaimDm { session_code: String },

    /// Unknown request type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl RequestPayload {
    /// Session the request refers to, if any.
    pub fn session_code(&self) -> Option<&str> {
        match self {
            RequestPayload::JoinSession { session_code, .. }
            | RequestPayload::LeaveSession { session_code }
            | RequestPayload::Sync { session_code }
            | RequestPayload::ClaimDm { session_code } => Some(session_code),
            RequestPayload::CreateSession | RequestPayload::Unknown => None,
        }
    }
}
