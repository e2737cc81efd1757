//! UseCase: 入室前チェック
//!
//! HTTP で roomId とパスワードを受け取り、ルームの存在とパスワードを確認します。
//! リアルタイム側の joinRoom はこのチェックを前提とし、パスワードは見ません。

use std::sync::Arc;

use crate::domain::{RoomGate, RoomId};

use super::error::CheckRoomAccessError;

pub struct CheckRoomAccessUseCase {
    room_gate: Arc<dyn RoomGate>,
}

impl CheckRoomAccessUseCase {
    pub fn new(room_gate: Arc<dyn RoomGate>) -> Self {
        Self { room_gate }
    }

    /// 入室前チェックを実行し、確認できたルームの ID を返す
    pub async fn execute(
        &self,
        room_id: Option<String>,
        password: Option<String>,
    ) -> Result<RoomId, CheckRoomAccessError> {
        let (Some(room_id), Some(password)) = (room_id, password) else {
            return Err(CheckRoomAccessError::MissingFields);
        };
        if password.is_empty() {
            return Err(CheckRoomAccessError::MissingFields);
        }
        let room_id = RoomId::new(room_id).map_err(|_| CheckRoomAccessError::MissingFields)?;

        self.room_gate.check_access(&room_id, &password).await?;
        tracing::info!("Room access granted for '{}'", room_id);
        Ok(room_id)
    }
}
