//! WebSocket message types for engine ↔ client communication
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing or renaming variants is a breaking change
//! - Unknown enum variants deserialize to `Unknown` for forward compatibility
//!
//! Player identifiers in roster messages (`AddPlayer`, `RemovePlayer`,
//! initiative updates) are strings because they name either a connection or a
//! DM-created dummy combatant. Fields that must name a live connection use
//! `Uuid`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::requests::RequestPayload;
use crate::responses::ResponseResult;

// =============================================================================
// Client Messages (Client → Engine)
// =============================================================================

/// Messages from a table client to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Send a request that expects a `Response`
    Request {
        /// Correlation ID echoed in the response
        request_id: String,
        payload: RequestPayload,
    },

    /// DM shows a new scene/map
    LoadMap { session_code: String, url: String },

    /// DM pushes the full token snapshot
    PublishTokens {
        session_code: String,
        tokens: Vec<serde_json::Value>,
    },

    /// Hand the DM role to another member
    TransferDm { session_code: String, player: Uuid },

    // -------------------------------------------------------------------------
    // Player → DM (private, delivered to the DM only)
    // -------------------------------------------------------------------------
    /// Character sheet edit
    UpdateSheet {
        session_code: String,
        sheet: serde_json::Value,
    },

    /// Hit point change
    UpdateHp {
        session_code: String,
        hp: serde_json::Value,
    },

    /// Initiative roll for the DM's tracker
    SubmitInitiative {
        session_code: String,
        initiative: serde_json::Value,
    },

    /// Player (re-)announces itself, usually in answer to `SyncPlayerData`
    SyncPlayerData {
        session_code: String,
        #[serde(default)]
        player_name: Option<String>,
        #[serde(default)]
        initiative: Option<serde_json::Value>,
        #[serde(default)]
        initiative_modifier: Option<serde_json::Value>,
    },

    // -------------------------------------------------------------------------
    // DM → everyone
    // -------------------------------------------------------------------------
    /// DM adds a participant to the roster
    AddParticipant {
        session_code: String,
        player: String,
        #[serde(default)]
        player_name: Option<String>,
        #[serde(default)]
        initiative: Option<serde_json::Value>,
        #[serde(default)]
        initiative_modifier: Option<serde_json::Value>,
    },

    /// DM removes a participant from the roster
    RemoveParticipant { session_code: String, player: String },

    /// DM adds a dummy combatant (NPC/monster) to the initiative order
    AddDummy {
        session_code: String,
        dummy_id: String,
        name: String,
        #[serde(default)]
        initiative_modifier: Option<serde_json::Value>,
    },

    /// DM removes a dummy combatant
    RemoveDummy { session_code: String, player: String },

    /// Initiative change, by the DM or by the player it belongs to
    UpdateInitiative {
        session_code: String,
        player: String,
        initiative: serde_json::Value,
    },

    /// Initiative modifier change, by the DM or by the player it belongs to
    UpdateInitiativeModifier {
        session_code: String,
        player: String,
        initiative_modifier: serde_json::Value,
    },

    /// Heartbeat ping
    Heartbeat,

    /// Unknown message type for forward compatibility
    ///
    /// When deserializing an unknown variant, this variant is used instead of
    /// failing. Allows older engines to ignore newer client messages.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Session a relay event refers to. Requests carry theirs in the payload.
    pub fn session_code(&self) -> Option<&str> {
        match self {
            ClientMessage::LoadMap { session_code, .. }
            | ClientMessage::PublishTokens { session_code, .. }
            | ClientMessage::TransferDm { session_code, .. }
            | ClientMessage::UpdateSheet { session_code, .. }
            | ClientMessage::UpdateHp { session_code, .. }
            | ClientMessage::SubmitInitiative { session_code, .. }
            | ClientMessage::SyncPlayerData { session_code, .. }
            | ClientMessage::AddParticipant { session_code, .. }
            | ClientMessage::RemoveParticipant { session_code, .. }
            | ClientMessage::AddDummy { session_code, .. }
            | ClientMessage::RemoveDummy { session_code, .. }
            | ClientMessage::UpdateInitiative { session_code, .. }
            | ClientMessage::UpdateInitiativeModifier { session_code, .. } => Some(session_code),
            ClientMessage::Request { .. } | ClientMessage::Heartbeat | ClientMessage::Unknown => {
                None
            }
        }
    }

    /// Roster entry named by the event, if it names one.
    pub fn named_player(&self) -> Option<&str> {
        match self {
            ClientMessage::AddParticipant { player, .. }
            | ClientMessage::RemoveParticipant { player, .. }
            | ClientMessage::RemoveDummy { player, .. }
            | ClientMessage::UpdateInitiative { player, .. }
            | ClientMessage::UpdateInitiativeModifier { player, .. } => Some(player),
            _ => None,
        }
    }
}

// =============================================================================
// Server Messages (Engine → Client)
// =============================================================================

/// Messages from the engine to a table client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent once right after the connection is established
    VersionCheck {
        server_version: String,
        min_client_version: String,
        /// Identity of the receiving connection, as other members see it
        connection_id: Uuid,
    },

    /// Reply to a `ClientMessage::Request`
    Response {
        request_id: String,
        result: ResponseResult,
    },

    /// A participant (player or dummy) entered the roster
    AddPlayer {
        player: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initiative: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initiative_modifier: Option<serde_json::Value>,
        #[serde(default)]
        is_dummy: bool,
    },

    /// A participant left the roster
    RemovePlayer { player: String },

    /// Please re-announce your player data (new DM or new member)
    SyncPlayerData,

    /// DM switched the scene/map
    LoadMap { url: String },

    /// DM replaced the token snapshot
    TokensUpdated { tokens: Vec<serde_json::Value> },

    /// You are now the DM of your session
    AssignDm,

    /// Someone else became the DM
    DmAssigned { dm: Uuid },

    /// The DM left; the slot is vacant until reassigned
    DmRemoved { previous: Uuid },

    InitiativeUpdated {
        player: String,
        initiative: serde_json::Value,
    },

    InitiativeModifierUpdated {
        player: String,
        initiative_modifier: serde_json::Value,
    },

    /// Player sheet edit forwarded to the DM
    SheetUpdated {
        player: Uuid,
        sheet: serde_json::Value,
    },

    /// Player HP change forwarded to the DM
    HpUpdated {
        player: Uuid,
        hp: serde_json::Value,
    },

    /// Player initiative roll forwarded to the DM
    InitiativeSubmitted {
        player: Uuid,
        initiative: serde_json::Value,
    },

    /// Heartbeat response
    Pong,

    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Handshake sent to a freshly accepted connection.
    pub fn version_check(connection_id: Uuid) -> Self {
        ServerMessage::VersionCheck {
            server_version: crate::SERVER_VERSION.to_string(),
            min_client_version: crate::MIN_CLIENT_VERSION.to_string(),
            connection_id,
        }
    }

    /// Build the `Response` envelope for `request_id`.
    pub fn response(request_id: impl Into<String>, result: ResponseResult) -> Self {
        ServerMessage::Response {
            request_id: request_id.into(),
            result,
        }
    }
}
