//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ProfileError, RepositoryError, RoomAccessError};

/// 入室処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("Profile for '{0}' was not found")]
    ProfileNotFound(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,
}

/// 入室前チェックのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckRoomAccessError {
    #[error("Room ID and password are required")]
    MissingFields,

    #[error(transparent)]
    Denied(#[from] RoomAccessError),
}
