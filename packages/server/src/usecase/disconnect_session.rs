//! UseCase: セッションの切断処理（teardown）
//!
//! 入室中のルームを切断開始時点でスナップショットし、1 つずつ退室させます。
//! 2 回目以降の呼び出しは何もしません。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, Session};

use super::leave_room::LeaveRoomUseCase;

/// 切断処理のユースケース
pub struct DisconnectSessionUseCase {
    leave_room: Arc<LeaveRoomUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    pub fn new(leave_room: Arc<LeaveRoomUseCase>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            leave_room,
            message_pusher,
        }
    }

    /// 切断処理を実行し、退室させたルームを返す
    pub async fn execute(&self, session: &mut Session) -> Vec<RoomId> {
        let Some(rooms) = session.begin_teardown() else {
            tracing::debug!("Session '{}' already torn down", session.id);
            return Vec::new();
        };

        for room_id in &rooms {
            if let Err(e) = self.leave_room.execute(session, room_id).await {
                tracing::warn!(
                    "Failed to leave room '{}' during teardown of '{}': {}",
                    room_id,
                    session.id,
                    e
                );
            }
        }

        self.message_pusher.unregister_client(&session.id).await;
        tracing::info!(
            "Session '{}' for user '{}' torn down ({} rooms)",
            session.id,
            session.user_id,
            rooms.len()
        );

        rooms
    }
}
