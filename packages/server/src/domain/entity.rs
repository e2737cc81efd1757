//! Entity 定義
//!
//! - `Participant`: あるルームにおける 1 ユーザーの在室情報
//! - `Room`: ルームと参加者のマッピング
//! - `Session`: 1 本の認証済みコネクション

use std::collections::HashMap;

use super::value_object::{AvatarRef, DisplayName, Position, RoomId, SessionId, Timestamp, UserId};

/// ルーム参加者
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub avatar: AvatarRef,
    pub position: Position,
    /// この参加者を所有するセッション
    pub session_id: SessionId,
    pub joined_at: Timestamp,
}

impl Participant {
    /// 初期位置に配置された参加者を作成
    pub fn new(
        user_id: UserId,
        display_name: DisplayName,
        avatar: AvatarRef,
        session_id: SessionId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            display_name,
            avatar,
            position: Position::SPAWN,
            session_id,
            joined_at,
        }
    }
}

/// ルーム
///
/// 同じ `UserId` の参加者は常に 1 件まで。再入室は既存エントリを置き換える。
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub participants: HashMap<UserId, Participant>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: HashMap::new(),
            created_at,
        }
    }

    /// 参加者を追加、または既存エントリを更新して、格納後の参加者を返す
    ///
    /// 再入室では表示名・アバター・所有セッションを更新し、位置と入室時刻は維持する。
    pub fn upsert_participant(&mut self, participant: Participant) -> Participant {
        match self.participants.get_mut(&participant.user_id) {
            Some(existing) => {
                existing.display_name = participant.display_name;
                existing.avatar = participant.avatar;
                existing.session_id = participant.session_id;
                existing.clone()
            }
            None => {
                self.participants
                    .insert(participant.user_id.clone(), participant.clone());
                participant
            }
        }
    }

    /// 指定セッションが所有する参加者の位置を更新
    ///
    /// 参加者がいない、または別セッションの所有なら `None`。
    pub fn update_position(
        &mut self,
        user_id: &UserId,
        session_id: &SessionId,
        position: Position,
    ) -> Option<&Participant> {
        let participant = self
            .participants
            .get_mut(user_id)
            .filter(|p| &p.session_id == session_id)?;
        participant.position = position;
        Some(participant)
    }

    /// 指定セッションが所有している場合に限り参加者を返す
    pub fn participant_owned_by(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Option<&Participant> {
        self.participants
            .get(user_id)
            .filter(|p| &p.session_id == session_id)
    }

    /// 指定セッションが所有する参加者のみ削除する
    pub fn remove_participant_owned_by(
        &mut self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Option<Participant> {
        match self.participants.get(user_id) {
            Some(p) if &p.session_id == session_id => self.participants.remove(user_id),
            _ => None,
        }
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.get(user_id)
    }

    /// user_id 順にソートした参加者リスト
    pub fn participants_sorted(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// 参加者リストから配信対象のセッションを取り出す（`exclude` のセッションは除く）
pub fn session_targets(participants: &[Participant], exclude: Option<&SessionId>) -> Vec<SessionId> {
    participants
        .iter()
        .filter(|p| Some(&p.session_id) != exclude)
        .map(|p| p.session_id.clone())
        .collect()
}

/// 認証済みコネクションのセッション
///
/// ルーム状態への参照は持たず、入室中のルーム ID だけを入室順に保持する。
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    joined_rooms: Vec<RoomId>,
    torn_down: bool,
}

impl Session {
    pub fn new(id: SessionId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            joined_rooms: Vec::new(),
            torn_down: false,
        }
    }

    /// 入室済みとして記録（再入室なら最新の入室として並べ直す）
    pub fn mark_joined(&mut self, room_id: RoomId) {
        self.joined_rooms.retain(|id| id != &room_id);
        self.joined_rooms.push(room_id);
    }

    /// 退室済みとして記録し、入室していたかどうかを返す
    pub fn mark_left(&mut self, room_id: &RoomId) -> bool {
        let before = self.joined_rooms.len();
        self.joined_rooms.retain(|id| id != room_id);
        before != self.joined_rooms.len()
    }

    pub fn has_joined(&self, room_id: &RoomId) -> bool {
        self.joined_rooms.contains(room_id)
    }

    pub fn joined_rooms(&self) -> &[RoomId] {
        &self.joined_rooms
    }

    /// 最後に入室したルーム（明示的な room_id がないイベントの既定コンテキスト）
    pub fn current_room(&self) -> Option<&RoomId> {
        self.joined_rooms.last()
    }

    /// 明示された room_id を優先し、なければ現在のルームを返す
    ///
    /// 明示された room_id に入室していなければ `None`。
    pub fn resolve_room(&self, explicit: Option<&RoomId>) -> Option<&RoomId> {
        match explicit {
            Some(room_id) => self.joined_rooms.iter().find(|id| *id == room_id),
            None => self.current_room(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.torn_down
    }

    /// 切断処理を開始し、処理すべきルームのスナップショットを返す
    ///
    /// 2 回目以降の呼び出しは `None` を返す。
    pub fn begin_teardown(&mut self) -> Option<Vec<RoomId>> {
        if self.torn_down {
            return None;
        }
        self.torn_down = true;
        Some(self.joined_rooms.clone())
    }
}
