//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - セッションごとの送信キュー（容量制限付き `mpsc::Sender`）を管理
//! - ドメインイベントを JSON にシリアライズしてキューに積む（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! キューへの書き込みは `try_send` で行い、待機しません。
//! キューが満杯のセッション宛てのイベントは破棄してログに残します。
//! 取りこぼした在室状態は、そのクライアントの次回の再接続・再入室で復元されます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{MessagePushError, MessagePusher, PresenceEvent, PusherChannel, SessionId},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のセッションと対応する送信キューのマップ
pub struct WebSocketMessagePusher {
    /// Key: session_id
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &PresenceEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }

    fn try_push(
        session_id: &SessionId,
        sender: &PusherChannel,
        content: String,
    ) -> Result<(), MessagePushError> {
        sender.try_send(content).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(session_id.to_string()),
            TrySendError::Closed(_) => {
                MessagePushError::PushFailed(format!("session '{}' queue is closed", session_id))
            }
        })
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Session '{}' registered to MessagePusher", session_id);
        clients.insert(session_id, sender);
    }

    async fn unregister_client(&self, session_id: &SessionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(session_id);
        tracing::debug!("Session '{}' unregistered from MessagePusher", session_id);
    }

    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &PresenceEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(session_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(session_id.to_string()))?;
        Self::try_push(session_id, sender, content)?;
        tracing::debug!("Pushed '{}' to session '{}'", event.name(), session_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        event: &PresenceEvent,
    ) -> Result<(), MessagePushError> {
        if targets.is_empty() {
            return Ok(());
        }
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            let Some(sender) = clients.get(&target) else {
                tracing::warn!(
                    "Session '{}' not found during broadcast of '{}', skipping",
                    target,
                    event.name()
                );
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = Self::try_push(&target, sender, content.clone()) {
                tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
            } else {
                tracing::debug!("Broadcasted '{}' to session '{}'", event.name(), target);
            }
        }

        Ok(())
    }
}
