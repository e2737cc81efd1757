//! UseCase: ルーム入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - プロフィール取得、参加者の追加・置き換え、入室時の 3 種類の配信
//!
//! ### なぜこのテストが必要か
//! - 入室者には currentPositions、他の参加者には userJoined、全員に onlineUsers が届くこと
//! - 再入室で参加者が重複しないこと
//! - セッションの入室記録と Presence Store が一致すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の入室、2 人目の入室、アバター指定付きの再入室
//! - 異常系：プロフィールが存在しない

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    AvatarRef, MessagePusher, Participant, PresenceEvent, PresenceRepository, ProfileLookup,
    RoomId, Session, Timestamp, session_targets,
};

use super::error::JoinRoomError;

/// ルーム入室のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn PresenceRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// ProfileLookup（プロフィール取得の抽象化）
    profile_lookup: Arc<dyn ProfileLookup>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        profile_lookup: Arc<dyn ProfileLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            profile_lookup,
            clock,
        }
    }

    /// 入室を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 入室するセッション（入室記録が更新される）
    /// * `room_id` - 入室するルーム
    /// * `avatar_override` - プロフィールのアバターの代わりに使うアバター
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 格納された参加者
    /// * `Err(JoinRoomError)` - プロフィールが見つからない等（状態は変更されない）
    pub async fn execute(
        &self,
        session: &mut Session,
        room_id: RoomId,
        avatar_override: Option<AvatarRef>,
    ) -> Result<Participant, JoinRoomError> {
        // 1. プロフィールを取得
        let profile = self
            .profile_lookup
            .get_profile(&session.user_id)
            .await?
            .ok_or_else(|| JoinRoomError::ProfileNotFound(session.user_id.to_string()))?;

        // 2. 参加者を追加（または置き換え）し、変更後の参加者リストを得る
        let participant = Participant::new(
            session.user_id.clone(),
            profile.display_name,
            avatar_override.unwrap_or(profile.avatar),
            session.id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let (stored, participants) = self
            .repository
            .upsert_participant(&room_id, participant)
            .await?;

        // 3. セッションに入室を記録
        session.mark_joined(room_id.clone());
        tracing::info!(
            "User '{}' joined room '{}' ({} online)",
            session.user_id,
            room_id,
            participants.len()
        );

        // 4. 配信（排他区間の外で行う）
        let snapshot = PresenceEvent::CurrentPositions(participants.clone());
        if let Err(e) = self.message_pusher.push_to(&session.id, &snapshot).await {
            tracing::warn!("Failed to push currentPositions to '{}': {}", session.id, e);
        }

        let others = session_targets(&participants, Some(&session.id));
        if let Err(e) = self
            .message_pusher
            .broadcast(others, &PresenceEvent::UserJoined(stored.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast userJoined: {}", e);
        }

        let everyone = session_targets(&participants, None);
        if let Err(e) = self
            .message_pusher
            .broadcast(everyone, &PresenceEvent::OnlineUsers(participants))
            .await
        {
            tracing::warn!("Failed to broadcast onlineUsers: {}", e);
        }

        Ok(stored)
    }
}
