//! UseCase: ルーム一覧の取得

use std::sync::Arc;

use crate::domain::{PresenceRepository, Room};

pub struct GetRoomsUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// 一度でも使われたルームを room_id 順に返す（参加者 0 人のルームも含む）
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = self.repository.get_rooms().await;
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
