//! UseCase: ルーム退室処理
//!
//! 明示的な leaveRoom と切断処理の両方から呼ばれます。
//! 参加者の削除は、そのセッションが所有している場合に限ります
//! （同じユーザーが別のセッションで入り直している場合、そちらを消さないため）。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, PresenceEvent, PresenceRepository, RepositoryError, RoomId, Session,
    SessionId, session_targets,
};

/// ルーム退室のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 退室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(targets))` - 参加者を削除し、残りの参加者に通知した
    /// * `Ok(None)` - 削除する参加者がいなかった（セッションの入室記録だけ消す）
    pub async fn execute(
        &self,
        session: &mut Session,
        room_id: &RoomId,
    ) -> Result<Option<Vec<SessionId>>, RepositoryError> {
        let removed = self
            .repository
            .remove_participant(room_id, &session.user_id, &session.id)
            .await?;
        session.mark_left(room_id);

        let Some(remaining) = removed else {
            tracing::debug!(
                "No participant owned by session '{}' in room '{}'",
                session.id,
                room_id
            );
            return Ok(None);
        };

        tracing::info!("User '{}' left room '{}'", session.user_id, room_id);

        let targets = session_targets(&remaining, None);
        let left = PresenceEvent::UserLeft {
            user_id: session.user_id.clone(),
        };
        if let Err(e) = self.message_pusher.broadcast(targets.clone(), &left).await {
            tracing::warn!("Failed to broadcast userLeft: {}", e);
        }
        let online = PresenceEvent::OnlineUsers(remaining);
        if let Err(e) = self.message_pusher.broadcast(targets.clone(), &online).await {
            tracing::warn!("Failed to broadcast onlineUsers: {}", e);
        }

        Ok(Some(targets))
    }
}
