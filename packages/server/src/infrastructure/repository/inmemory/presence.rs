//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! 全ルームを 1 つの `Mutex` で保護し、変更とスナップショットの読み取りを同じ排他区間で行います。
//!
//! ## 既知の特性
//!
//! 参加者が 0 人になったルームは削除しません。大量のルームが作られて再訪されない場合、
//! メモリ使用量は増え続けます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    Participant, Position, PresenceRepository, RepositoryError, Room, RoomId, SessionId,
    Timestamp, UserId,
};

/// インメモリ Presence Repository 実装
pub struct InMemoryPresenceRepository {
    /// room_id → Room
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// ルーム作成時刻の取得に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryPresenceRepository {
    /// 新しい InMemoryPresenceRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn upsert_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<(Participant, Vec<Participant>), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created", room_id);
            Room::new(room_id.clone(), Timestamp::new(self.clock.now_millis()))
        });
        let stored = room.upsert_participant(participant);
        Ok((stored, room.participants_sorted()))
    }

    async fn update_position(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        session_id: &SessionId,
        position: Position,
    ) -> Result<Option<Vec<Participant>>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return Ok(None);
        };
        if room.update_position(user_id, session_id, position).is_none() {
            return Ok(None);
        }
        Ok(Some(room.participants_sorted()))
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<Vec<Participant>>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return Ok(None);
        };
        if room.remove_participant_owned_by(user_id, session_id).is_none() {
            return Ok(None);
        }
        Ok(Some(room.participants_sorted()))
    }

    async fn find_participant(&self, room_id: &RoomId, user_id: &UserId) -> Option<Participant> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .and_then(|room| room.participant(user_id))
            .cloned()
    }

    async fn find_owned_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Option<Participant> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .and_then(|room| room.participant_owned_by(user_id, session_id))
            .cloned()
    }

    async fn get_participants(&self, room_id: &RoomId) -> Vec<Participant> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(Room::participants_sorted)
            .unwrap_or_default()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut all: Vec<Room> = rooms.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
