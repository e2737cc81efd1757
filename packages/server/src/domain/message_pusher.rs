//! MessagePusher trait 定義
//!
//! セッションへのイベント配信（Broadcast Fan-out）の抽象化です。
//! 配信は送りっぱなし（fire-and-forget）で、遅い受信側が他のセッションの処理を止めてはいけません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, PresenceEvent, SessionId};

/// セッションへの送信チャンネル（容量制限付きキュー）
pub type PusherChannel = mpsc::Sender<String>;

/// MessagePusher trait
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// セッションの送信チャンネルを登録
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// セッションの送信チャンネルを登録解除
    async fn unregister_client(&self, session_id: &SessionId);

    /// 1 セッションに送信（ToSession）
    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &PresenceEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数セッションに送信（ToRoom）
    ///
    /// 一部のセッションへの送信失敗はログに残し、残りのセッションへの送信は続ける。
    async fn broadcast(
        &self,
        targets: Vec<SessionId>,
        event: &PresenceEvent,
    ) -> Result<(), MessagePushError>;
}
