//! Response types for WebSocket request/response pattern
//!
//! This module defines the result envelope returned for every request and the
//! typed bodies carried in `ResponseResult::Success::data`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Response Result
// =============================================================================

/// Result of a request operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseResult {
    /// Operation succeeded
    Success {
        /// Optional data payload (varies by request type)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Operation failed
    Error {
        /// Error classification code
        code: ErrorCode,
        /// Human-readable error message
        message: String,
    },
    /// Unknown response type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ResponseResult {
    /// Create a success response with data
    pub fn success<T: Serialize>(data: T) -> Self {
        ResponseResult::Success {
            data: Some(serde_json::to_value(data).unwrap_or_default()),
        }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success { .. })
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ResponseResult::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Decode the success body into `T`.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        match self {
            ResponseResult::Success { data: Some(data) } => {
                serde_json::from_value(data.clone()).ok()
            }
            _ => None,
        }
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request was malformed or invalid
    BadRequest,
    /// Sender lacks the role for this operation
    Forbidden,
    /// Referenced session does not exist
    NotFound,
    /// Operation conflicts with current state (e.g. DM slot taken)
    Conflict,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Reply Bodies
// =============================================================================

/// Reply to `CreateSession`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_code: String,
}

/// Reply to `JoinSession`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionJoined {
    pub joined: bool,
    /// Scene currently shown in the session, so the newcomer can load it
    #[serde(default)]
    pub scene_reference: Option<String>,
}

/// Reply to `LeaveSession`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLeft {
    /// False when the sender was not a member of the session
    pub left: bool,
}

/// Reply to `Sync`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_exists: bool,
    pub has_dm: bool,
    #[serde(default)]
    pub scene_reference: Option<String>,
    #[serde(default)]
    pub tokens: Vec<serde_json::Value>,
}

/// Reply to `ClaimDm`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmClaimed {
    pub dm: Uuid,
}
