//! UseCase テスト用の共通ヘルパー

use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        AvatarRef, DisplayName, MessagePusher, Participant, PresenceRepository, RoomId, Session,
        SessionId, Timestamp, UserId,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryPresenceRepository,
    },
};
use hiroba_shared::time::FixedClock;

pub const TEST_NOW: i64 = 1672531200000;

pub fn create_test_repository() -> Arc<InMemoryPresenceRepository> {
    Arc::new(InMemoryPresenceRepository::new(Arc::new(FixedClock::new(
        TEST_NOW,
    ))))
}

pub fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
    Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))))
}

pub fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

/// セッションを作成し、送信キューを MessagePusher に登録する
pub async fn connect(
    pusher: &Arc<WebSocketMessagePusher>,
    user_id: &str,
    session_id: &str,
) -> (Session, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(64);
    let session = Session::new(SessionId::new(session_id.to_string()).unwrap(), user(user_id));
    pusher.register_client(session.id.clone(), tx).await;
    (session, rx)
}

/// Repository に直接参加者を置き、セッションにも入室を記録する
pub async fn seat(
    repository: &Arc<InMemoryPresenceRepository>,
    session: &mut Session,
    room_id: &str,
) {
    let participant = Participant::new(
        session.user_id.clone(),
        DisplayName::new(session.user_id.as_str().to_string()),
        AvatarRef::new("default".to_string()),
        session.id.clone(),
        Timestamp::new(TEST_NOW),
    );
    repository
        .upsert_participant(&room(room_id), participant)
        .await
        .unwrap();
    session.mark_joined(room(room_id));
}

/// キューに溜まっているメッセージをすべて取り出して JSON として返す
pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<Value> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).unwrap());
    }
    messages
}

/// メッセージの type 一覧
pub fn types(messages: &[Value]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
