//! UseCase: チャット送信
//!
//! チャットは保存しません。指定されたルームの参加者のうち、送信者のセッション以外へ配信します。

use std::sync::Arc;

use crate::domain::{
    MessageContent, MessagePusher, PresenceEvent, PresenceRepository, RoomId, Session, SessionId,
    session_targets,
};

/// チャット送信のユースケース
pub struct SendChatUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendChatUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// チャット送信を実行し、配信対象のセッションを返す
    pub async fn execute(
        &self,
        session: &Session,
        room_id: &RoomId,
        message: MessageContent,
    ) -> Vec<SessionId> {
        let participants = self.repository.get_participants(room_id).await;
        let targets = session_targets(&participants, Some(&session.id));
        let event = PresenceEvent::Chat {
            from: session.user_id.clone(),
            message,
        };
        if let Err(e) = self.message_pusher.broadcast(targets.clone(), &event).await {
            tracing::warn!("Failed to broadcast chat: {}", e);
        }
        targets
    }
}
