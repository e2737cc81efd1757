//! UseCase: メディア接続ネゴシエーションの中継
//!
//! ルームへのブロードキャストではなく、宛先ユーザーを所有する 1 セッションだけに届けます。
//! 宛先が同じルームにいなければ黙って破棄します（退室直後のネゴシエーションはよくある競合です）。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, NegotiationPayload, PresenceEvent, PresenceRepository, RoomId, Session,
    SessionId, UserId,
};

pub struct RelaySignalUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// シグナルを中継し、届けたセッションを返す
    ///
    /// 対象ルームが決まらない、送信者の参加者をこのセッションが所有していない、
    /// または宛先がそのルームにいない場合は `None`。
    pub async fn execute(
        &self,
        session: &Session,
        to: &UserId,
        room_id: Option<&RoomId>,
        payload: NegotiationPayload,
    ) -> Option<SessionId> {
        let room_id = session.resolve_room(room_id)?;

        if self
            .repository
            .find_owned_participant(room_id, &session.user_id, &session.id)
            .await
            .is_none()
        {
            tracing::debug!(
                "Dropping signal from '{}': no participant owned by this session in room '{}'",
                session.user_id,
                room_id
            );
            return None;
        }

        let Some(target) = self.repository.find_participant(room_id, to).await else {
            tracing::debug!(
                "Dropping signal from '{}' to '{}': target not in room '{}'",
                session.user_id,
                to,
                room_id
            );
            return None;
        };

        let event = PresenceEvent::Signal {
            from: session.user_id.clone(),
            payload,
        };
        if let Err(e) = self.message_pusher.push_to(&target.session_id, &event).await {
            tracing::warn!("Failed to relay signal to '{}': {}", to, e);
        }

        Some(target.session_id)
    }
}
