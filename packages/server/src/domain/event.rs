//! サーバーからクライアントへ配信するイベント（ドメイン表現）
//!
//! ワイヤー形式への変換は Infrastructure 層の DTO が担当します。

use super::{MessageContent, NegotiationPayload, Participant, Position, UserId};

/// 配信イベント
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    /// 入室したセッションだけに送る、ルームの全参加者
    CurrentPositions(Vec<Participant>),
    /// 新規（または更新された）参加者
    UserJoined(Participant),
    /// 位置の差分のみ
    UserMoved { user_id: UserId, position: Position },
    /// 再計算された在室者リスト
    OnlineUsers(Vec<Participant>),
    VideoToggled { user_id: UserId, enabled: bool },
    Chat {
        from: UserId,
        message: MessageContent,
    },
    /// 1 対 1 で中継するネゴシエーションペイロード
    Signal {
        from: UserId,
        payload: NegotiationPayload,
    },
    UserLeft { user_id: UserId },
}

impl PresenceEvent {
    /// ログ出力用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::CurrentPositions(_) => "currentPositions",
            Self::UserJoined(_) => "userJoined",
            Self::UserMoved { .. } => "userMoved",
            Self::OnlineUsers(_) => "onlineUsers",
            Self::VideoToggled { .. } => "video-toggle",
            Self::Chat { .. } => "chat",
            Self::Signal { .. } => "signal",
            Self::UserLeft { .. } => "userLeft",
        }
    }
}
