//! TableRelay Protocol - Shared types for the session engine and table clients
//!
//! This crate contains all types exchanged over the WebSocket:
//! - `ClientMessage` (client → engine) and `ServerMessage` (engine → client)
//! - Request payloads and typed reply bodies for the request/response pattern
//! - Protocol version constants sent in the connection handshake
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain types** - raw `uuid::Uuid` and `String` on the wire; the engine
//!    validates them into domain types at the boundary

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::{ClientMessage, ServerMessage};
pub use requests::RequestPayload;
pub use responses::{
    DmClaimed, ErrorCode, ResponseResult, SessionCreated, SessionJoined, SessionLeft,
    SessionSnapshot,
};

/// Version reported to clients in the `VersionCheck` handshake.
pub const SERVER_VERSION: &str = "1.0.1";

/// Oldest client version the engine still speaks to.
pub const MIN_CLIENT_VERSION: &str = "1.0.1";
