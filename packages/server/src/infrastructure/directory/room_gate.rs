//! インメモリ RoomGate 実装
//!
//! ルームのパスワードは argon2 の PHC 文字列として保持し、平文は保持しません。

use std::{collections::HashMap, path::Path};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{RoomAccessError, RoomGate, RoomId};

use super::{DirectoryLoadError, read_json_file};

/// ルームファイルの 1 エントリ
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub room_id: String,
    pub password_hash: String,
}

/// room_id → パスワードハッシュのインメモリディレクトリ
#[derive(Debug, Default)]
pub struct InMemoryRoomGate {
    rooms: HashMap<RoomId, String>,
}

impl InMemoryRoomGate {
    pub fn new(records: Vec<RoomRecord>) -> Result<Self, DirectoryLoadError> {
        let mut rooms = HashMap::with_capacity(records.len());
        for record in records {
            let room_id = RoomId::new(record.room_id)
                .map_err(|e| DirectoryLoadError::InvalidEntry(e.to_string()))?;
            PasswordHash::new(&record.password_hash).map_err(|e| {
                DirectoryLoadError::InvalidEntry(format!(
                    "room '{}' has an invalid password hash: {}",
                    room_id, e
                ))
            })?;
            rooms.insert(room_id, record.password_hash);
        }
        Ok(Self { rooms })
    }

    /// `[{"roomId": "...", "passwordHash": "$argon2id$..."}]` 形式の JSON ファイルから読み込む
    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryLoadError> {
        Self::new(read_json_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }
}

#[async_trait]
impl RoomGate for InMemoryRoomGate {
    async fn check_access(&self, room_id: &RoomId, password: &str) -> Result<(), RoomAccessError> {
        let hash = self
            .rooms
            .get(room_id)
            .ok_or(RoomAccessError::RoomNotFound)?;
        let parsed =
            PasswordHash::new(hash).map_err(|e| RoomAccessError::Unavailable(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| RoomAccessError::IncorrectPassword)
    }
}
