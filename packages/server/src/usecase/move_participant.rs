//! UseCase: 位置の移動
//!
//! 高頻度のイベントなので、配信するのは位置の差分（userMoved）だけです。
//! ルームに参加していないユーザーからの移動は黙って無視します。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, Position, PresenceEvent, PresenceRepository, RepositoryError, RoomId, Session,
    SessionId, session_targets,
};

/// 位置移動のユースケース
pub struct MoveParticipantUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl MoveParticipantUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 位置移動を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(targets))` - 更新し、targets に userMoved を配信した
    /// * `Ok(None)` - 参加者がいないため何もしなかった
    pub async fn execute(
        &self,
        session: &Session,
        room_id: &RoomId,
        position: Position,
    ) -> Result<Option<Vec<SessionId>>, RepositoryError> {
        let Some(participants) = self
            .repository
            .update_position(room_id, &session.user_id, &session.id, position)
            .await?
        else {
            tracing::debug!(
                "Ignoring move from '{}' in room '{}': no participant owned by this session",
                session.user_id,
                room_id
            );
            return Ok(None);
        };

        let targets = session_targets(&participants, Some(&session.id));
        let event = PresenceEvent::UserMoved {
            user_id: session.user_id.clone(),
            position,
        };
        if let Err(e) = self.message_pusher.broadcast(targets.clone(), &event).await {
            tracing::warn!("Failed to broadcast userMoved: {}", e);
        }

        Ok(Some(targets))
    }
}
