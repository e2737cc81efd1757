//! Room event router: WebSocket frame → use case.
//!
//! 1 セッションのイベントは受信順に 1 つずつ処理されます。
//! 形式の不正なイベントはログに残して破棄し、送信元にはエラーを返しません。

use std::sync::Arc;

use crate::{
    domain::{
        AvatarRef, MessageContent, NegotiationPayload, Position, RoomId, Session, UserId,
    },
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub struct RoomEventRouter {
    state: Arc<AppState>,
}

impl RoomEventRouter {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// テキストフレームを解釈してユースケースに振り分ける
    pub async fn dispatch(&self, session: &mut Session, text: &str) {
        if !session.is_active() {
            tracing::debug!("Discarding event for torn-down session '{}'", session.id);
            return;
        }

        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Dropping malformed event from '{}': {}", session.user_id, e);
                return;
            }
        };

        match event {
            ClientEvent::JoinRoom { room_id, avatar } => {
                let Some(room_id) = parse_room_id(session, room_id) else {
                    return;
                };
                let avatar = avatar
                    .and_then(|a| a.into_avatar())
                    .map(AvatarRef::new);
                if let Err(e) = self
                    .state
                    .join_room_usecase
                    .execute(session, room_id, avatar)
                    .await
                {
                    tracing::warn!("Join from '{}' dropped: {}", session.user_id, e);
                }
            }
            ClientEvent::Move { room_id, x, y } => {
                let Some(room_id) = parse_room_id(session, room_id) else {
                    return;
                };
                let Ok(position) = Position::new(x, y) else {
                    tracing::warn!("Dropping move with invalid coordinates from '{}'", session.user_id);
                    return;
                };
                if let Err(e) = self
                    .state
                    .move_participant_usecase
                    .execute(session, &room_id, position)
                    .await
                {
                    tracing::warn!("Move from '{}' failed: {}", session.user_id, e);
                }
            }
            ClientEvent::VideoToggle { enabled, room_id } => {
                let room_id = match room_id.map(RoomId::new).transpose() {
                    Ok(room_id) => room_id,
                    Err(e) => {
                        tracing::warn!("Dropping video-toggle from '{}': {}", session.user_id, e);
                        return;
                    }
                };
                self.state
                    .toggle_video_usecase
                    .execute(session, room_id.as_ref(), enabled)
                    .await;
            }
            ClientEvent::Chat { room_id, message } => {
                let Some(room_id) = parse_room_id(session, room_id) else {
                    return;
                };
                let message = match MessageContent::new(message) {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::warn!("Dropping chat from '{}': {}", session.user_id, e);
                        return;
                    }
                };
                self.state
                    .send_chat_usecase
                    .execute(session, &room_id, message)
                    .await;
            }
            ClientEvent::Signal {
                to,
                room_id,
                payload,
            } => {
                let (to, room_id) = match (
                    UserId::new(to),
                    room_id.map(RoomId::new).transpose(),
                ) {
                    (Ok(to), Ok(room_id)) => (to, room_id),
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::warn!("Dropping signal from '{}': {}", session.user_id, e);
                        return;
                    }
                };
                self.state
                    .relay_signal_usecase
                    .execute(
                        session,
                        &to,
                        room_id.as_ref(),
                        NegotiationPayload::new(payload),
                    )
                    .await;
            }
            ClientEvent::LeaveRoom { room_id } => {
                let Some(room_id) = parse_room_id(session, room_id) else {
                    return;
                };
                if let Err(e) = self
                    .state
                    .leave_room_usecase
                    .execute(session, &room_id)
                    .await
                {
                    tracing::warn!("Leave from '{}' failed: {}", session.user_id, e);
                }
            }
        }
    }
}

fn parse_room_id(session: &Session, room_id: String) -> Option<RoomId> {
    match RoomId::new(room_id) {
        Ok(room_id) => Some(room_id),
        Err(e) => {
            tracing::warn!("Dropping event from '{}': {}", session.user_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DisplayName, Profile, PresenceRepository,
            collaborator::{MockProfileLookup, MockRoomGate, MockTokenVerifier},
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryPresenceRepository,
        },
        usecase::test_support::{
            TEST_NOW, connect, create_test_message_pusher, create_test_repository, drain, room,
            types, user,
        },
    };
    use hiroba_shared::time::FixedClock;
    use serde_json::json;

    fn create_router(
        repository: &Arc<InMemoryPresenceRepository>,
        pusher: &Arc<WebSocketMessagePusher>,
    ) -> RoomEventRouter {
        let mut profiles = MockProfileLookup::new();
        profiles.expect_get_profile().returning(|user_id| {
            Ok(Some(Profile {
                display_name: DisplayName::new(user_id.to_string()),
                avatar: AvatarRef::new("default".to_string()),
            }))
        });
        let state = AppState::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(MockTokenVerifier::new()),
            Arc::new(profiles),
            Arc::new(MockRoomGate::new()),
            Arc::new(FixedClock::new(TEST_NOW)),
            64,
        );
        RoomEventRouter::new(Arc::new(state))
    }

    async fn dispatch(router: &RoomEventRouter, session: &mut Session, event: serde_json::Value) {
        router.dispatch(session, &event.to_string()).await;
    }

    #[tokio::test]
    async fn test_join_and_leave_room_over_socket() {
        // テスト項目: joinRoom で入室し、leaveRoom で残りの参加者に userLeft と onlineUsers が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let router = create_router(&repository, &pusher);
        let (mut s1, mut rx1) = connect(&pusher, "u1", "s1").await;
        let (mut s2, mut rx2) = connect(&pusher, "u2", "s2").await;
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": "r1"})).await;
        dispatch(&router, &mut s2, json!({"type": "joinRoom", "roomId": "r1"})).await;
        assert_eq!(types(&drain(&mut rx1)), vec!["currentPositions", "onlineUsers", "userJoined", "onlineUsers"]);
        drain(&mut rx2);

        // when (操作):
        dispatch(&router, &mut s1, json!({"type": "leaveRoom", "roomId": "r1"})).await;

        // then (期待する結果):
        assert_eq!(types(&drain(&mut rx2)), vec!["userLeft", "onlineUsers"]);
        assert!(!s1.has_joined(&room("r1")));
        assert!(s1.is_active());
        assert_eq!(repository.get_participants(&room("r1")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_events_after_teardown_are_discarded() {
        // テスト項目: 切断処理が始まったセッションのイベントは処理されない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let router = create_router(&repository, &pusher);
        let (mut s1, _rx1) = connect(&pusher, "u1", "s1").await;
        let (mut s2, mut rx2) = connect(&pusher, "u2", "s2").await;
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": "r1"})).await;
        dispatch(&router, &mut s2, json!({"type": "joinRoom", "roomId": "r1"})).await;
        drain(&mut rx2);
        s1.begin_teardown();

        // when (操作):
        dispatch(&router, &mut s1, json!({"type": "move", "roomId": "r1", "x": 5, "y": 5})).await;
        dispatch(&router, &mut s1, json!({"type": "chat", "roomId": "r1", "message": "late"})).await;
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": "r2"})).await;

        // then (期待する結果):
        assert!(drain(&mut rx2).is_empty());
        let stored = repository
            .find_participant(&room("r1"), &user("u1"))
            .await
            .unwrap();
        assert_eq!(stored.position, Position::SPAWN);
        assert!(repository.get_room(&room("r2")).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_room_id_is_dropped() {
        // テスト項目: 空白や長すぎる roomId のイベントは破棄され、状態は変わらない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let router = create_router(&repository, &pusher);
        let (mut s1, mut rx1) = connect(&pusher, "u1", "s1").await;
        let too_long = "r".repeat(129);

        // when (操作):
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": "   "})).await;
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": too_long})).await;
        dispatch(&router, &mut s1, json!({"type": "video-toggle", "enabled": true, "roomId": ""})).await;

        // then (期待する結果):
        assert!(drain(&mut rx1).is_empty());
        assert!(s1.joined_rooms().is_empty());
        assert!(repository.get_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_signal_with_invalid_target_is_dropped() {
        // テスト項目: 宛先 to が不正なシグナルは誰にも届かない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let router = create_router(&repository, &pusher);
        let (mut s1, _rx1) = connect(&pusher, "u1", "s1").await;
        let (mut s2, mut rx2) = connect(&pusher, "u2", "s2").await;
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": "r1"})).await;
        dispatch(&router, &mut s2, json!({"type": "joinRoom", "roomId": "r1"})).await;
        drain(&mut rx2);

        // when (操作):
        dispatch(&router, &mut s1, json!({"type": "signal", "to": " ", "sdp": "v=0"})).await;
        dispatch(&router, &mut s1, json!({"type": "signal", "to": "u".repeat(129), "sdp": "v=0"})).await;

        // then (期待する結果):
        assert!(drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn test_explicit_room_not_joined_is_dropped() {
        // テスト項目: 入室していないルームを明示した video-toggle と signal は配信されない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_message_pusher();
        let router = create_router(&repository, &pusher);
        let (mut s1, _rx1) = connect(&pusher, "u1", "s1").await;
        let (mut s2, mut rx2) = connect(&pusher, "u2", "s2").await;
        dispatch(&router, &mut s1, json!({"type": "joinRoom", "roomId": "r1"})).await;
        dispatch(&router, &mut s2, json!({"type": "joinRoom", "roomId": "r2"})).await;
        drain(&mut rx2);

        // when (操作):
        dispatch(&router, &mut s1, json!({"type": "video-toggle", "enabled": true, "roomId": "r2"})).await;
        dispatch(&router, &mut s1, json!({"type": "signal", "to": "u2", "roomId": "r2", "sdp": "v=0"})).await;

        // then (期待する結果):
        assert!(drain(&mut rx2).is_empty());
    }
}
