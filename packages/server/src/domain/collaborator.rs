//! 外部コラボレーターの trait 定義
//!
//! アカウント管理や永続化はこのサーバーの範囲外です。
//! サーバーが必要とする問い合わせだけをここで定義します。
//!
//! - `TokenVerifier`: 署名付きトークンの検証 → subject
//! - `ProfileLookup`: subject → 表示名・アバター
//! - `RoomGate`: ルームの存在とパスワードの確認（入室前チェック）

use async_trait::async_trait;

use super::{AuthError, AvatarRef, DisplayName, ProfileError, RoomAccessError, RoomId, UserId};

/// ユーザープロフィール
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub display_name: DisplayName,
    pub avatar: AvatarRef,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// トークンを検証して subject を返す
    async fn verify(&self, raw_token: &str) -> Result<UserId, AuthError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// プロフィールを取得（存在しなければ `Ok(None)`）
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomGate: Send + Sync {
    /// ルームが存在し、パスワードが一致するか確認
    async fn check_access(&self, room_id: &RoomId, password: &str) -> Result<(), RoomAccessError>;
}
