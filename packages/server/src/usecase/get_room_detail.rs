//! UseCase: ルーム詳細の取得

use std::sync::Arc;

use crate::domain::{PresenceRepository, Room, RoomId};

use super::error::GetRoomDetailError;

pub struct GetRoomDetailUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// パスパラメータの room_id からルームを取得
    ///
    /// 不正な room_id は存在しないルームとして扱う。
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
