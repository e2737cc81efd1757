//! Conversion logic between DTOs and domain entities.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{Participant, PresenceEvent, Room};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&Participant> for dto::ParticipantInfo {
    fn from(model: &Participant) -> Self {
        Self {
            user_id: model.user_id.as_str().to_string(),
            username: model.display_name.as_str().to_string(),
            avatar: model.avatar.as_str().to_string(),
            x: model.position.x,
            y: model.position.y,
            session_id: model.session_id.as_str().to_string(),
        }
    }
}

impl From<&PresenceEvent> for dto::ServerEvent {
    fn from(event: &PresenceEvent) -> Self {
        match event {
            PresenceEvent::CurrentPositions(participants) => Self::CurrentPositions {
                participants: participants
                    .iter()
                    .map(|p| (p.user_id.as_str().to_string(), p.into()))
                    .collect(),
            },
            PresenceEvent::UserJoined(participant) => Self::UserJoined {
                participant: participant.into(),
            },
            PresenceEvent::UserMoved { user_id, position } => Self::UserMoved {
                user_id: user_id.as_str().to_string(),
                x: position.x,
                y: position.y,
            },
            PresenceEvent::OnlineUsers(participants) => Self::OnlineUsers {
                participants: participants.iter().map(Into::into).collect(),
            },
            PresenceEvent::VideoToggled { user_id, enabled } => Self::VideoToggle {
                user_id: user_id.as_str().to_string(),
                enabled: *enabled,
            },
            PresenceEvent::Chat { from, message } => Self::Chat {
                from: from.as_str().to_string(),
                message: message.as_str().to_string(),
            },
            PresenceEvent::Signal { from, payload } => Self::Signal {
                payload: payload.fields().clone(),
                from: from.as_str().to_string(),
            },
            PresenceEvent::UserLeft { user_id } => Self::UserLeft {
                user_id: user_id.as_str().to_string(),
            },
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants_sorted()
                .into_iter()
                .map(|p| p.user_id.into_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants_sorted()
                .iter()
                .map(|p| http::ParticipantDetailDto {
                    user_id: p.user_id.as_str().to_string(),
                    username: p.display_name.as_str().to_string(),
                    avatar: p.avatar.as_str().to_string(),
                    x: p.position.x,
                    y: p.position.y,
                    joined_at: timestamp_to_rfc3339(p.joined_at.value()),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
