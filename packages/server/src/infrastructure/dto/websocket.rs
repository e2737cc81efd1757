//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by its `"type"` field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Avatar override sent with `joinRoom`.
///
/// Accepts either a bare string or an object of the form `{"avatar": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvatarOverride {
    Plain(String),
    Wrapped {
        #[serde(default)]
        avatar: Option<String>,
    },
}

impl AvatarOverride {
    /// The override value, if it is non-empty.
    pub fn into_avatar(self) -> Option<String> {
        let avatar = match self {
            Self::Plain(avatar) => Some(avatar),
            Self::Wrapped { avatar } => avatar,
        };
        avatar.filter(|a| !a.is_empty())
    }
}

/// Inbound events (client → server)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "joinRoom", rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        avatar: Option<AvatarOverride>,
    },
    #[serde(rename = "move", rename_all = "camelCase")]
    Move { room_id: String, x: f64, y: f64 },
    #[serde(rename = "video-toggle", rename_all = "camelCase")]
    VideoToggle {
        enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
    },
    #[serde(rename = "chat", rename_all = "camelCase")]
    Chat { room_id: String, message: String },
    #[serde(rename = "signal")]
    Signal {
        to: String,
        #[serde(default, rename = "roomId", skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        #[serde(flatten)]
        payload: Map<String, Value>,
    },
    #[serde(rename = "leaveRoom", rename_all = "camelCase")]
    LeaveRoom { room_id: String },
}

/// Participant as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub user_id: String,
    pub username: String,
    pub avatar: String,
    pub x: f64,
    pub y: f64,
    pub session_id: String,
}

/// Outbound events (server → client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "currentPositions")]
    CurrentPositions {
        participants: BTreeMap<String, ParticipantInfo>,
    },
    #[serde(rename = "userJoined")]
    UserJoined { participant: ParticipantInfo },
    #[serde(rename = "userMoved", rename_all = "camelCase")]
    UserMoved { user_id: String, x: f64, y: f64 },
    #[serde(rename = "onlineUsers")]
    OnlineUsers { participants: Vec<ParticipantInfo> },
    #[serde(rename = "video-toggle", rename_all = "camelCase")]
    VideoToggle { user_id: String, enabled: bool },
    #[serde(rename = "chat")]
    Chat { from: String, message: String },
    #[serde(rename = "signal")]
    Signal {
        #[serde(flatten)]
        payload: Map<String, Value>,
        from: String,
    },
    #[serde(rename = "userLeft", rename_all = "camelCase")]
    UserLeft { user_id: String },
}
