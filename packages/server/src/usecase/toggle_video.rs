//! UseCase: ビデオのオン・オフ通知
//!
//! 状態は持たず、ルームの他の参加者へ中継するだけです。
//! 対象ルームは明示された room_id（入室済みのもの）、なければ最後に入室したルームです。
//! 同じユーザーが別のセッションで入り直したルームでは、古いセッションからの通知は無視します。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, PresenceEvent, PresenceRepository, RoomId, Session, SessionId, session_targets,
};

pub struct ToggleVideoUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ToggleVideoUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ビデオ状態の通知を実行
    ///
    /// 対象ルームが決まらない、またはそのルームの参加者をこのセッションが所有していない場合は
    /// `None`（何も配信しない）。
    pub async fn execute(
        &self,
        session: &Session,
        room_id: Option<&RoomId>,
        enabled: bool,
    ) -> Option<Vec<SessionId>> {
        let Some(room_id) = session.resolve_room(room_id) else {
            tracing::debug!(
                "Ignoring video-toggle from '{}': no room context",
                session.user_id
            );
            return None;
        };

        if self
            .repository
            .find_owned_participant(room_id, &session.user_id, &session.id)
            .await
            .is_none()
        {
            tracing::debug!(
                "Ignoring video-toggle from '{}' in room '{}': no participant owned by this session",
                session.user_id,
                room_id
            );
            return None;
        }

        let participants = self.repository.get_participants(room_id).await;
        let targets = session_targets(&participants, Some(&session.id));
        let event = PresenceEvent::VideoToggled {
            user_id: session.user_id.clone(),
            enabled,
        };
        if let Err(e) = self.message_pusher.broadcast(targets.clone(), &event).await {
            tracing::warn!("Failed to broadcast video-toggle: {}", e);
        }

        Some(targets)
    }
}
