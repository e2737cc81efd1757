//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} long")]
    TooLong { field: &'static str, max: usize },

    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinate,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Presence store is unavailable: {0}")]
    Unavailable(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Session '{0}' is not registered")]
    ClientNotFound(String),

    #[error("Outbound queue of session '{0}' is full")]
    QueueFull(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// ハンドシェイク認証のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Auth error: token missing")]
    MissingToken,

    #[error("Auth error: invalid token ({0})")]
    InvalidToken(String),
}

/// プロフィール取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Profile lookup is unavailable: {0}")]
    Unavailable(String),
}

/// ルーム入室前チェックのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomAccessError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Room directory is unavailable: {0}")]
    Unavailable(String),
}
