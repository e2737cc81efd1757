//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Participant, Position, RepositoryError, Room, RoomId, SessionId, UserId};

/// Presence Repository trait
///
/// ルームと参加者の在室状態を保持するストアへのインターフェース。
///
/// ## 一貫性
///
/// 変更系のメソッドは、変更を適用した直後のスナップショットを同じ排他区間の中で読み取って返す。
/// UseCase 層はこのスナップショットから配信内容を組み立てるため、古い状態を配信することはない。
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// 参加者を追加または置き換え（ルームがなければ作成）
    ///
    /// 格納後の参加者と、変更後のルーム参加者リスト（user_id 順）を返す。
    async fn upsert_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<(Participant, Vec<Participant>), RepositoryError>;

    /// 指定セッションが所有する参加者の位置を更新
    ///
    /// 該当する参加者がいなければ `Ok(None)`、更新できれば変更後の参加者リストを返す。
    async fn update_position(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        session_id: &SessionId,
        position: Position,
    ) -> Result<Option<Vec<Participant>>, RepositoryError>;

    /// 指定セッションが所有する参加者を削除
    ///
    /// 削除した場合は残りの参加者リストを返す。該当する参加者がいなければ `Ok(None)`。
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<Vec<Participant>>, RepositoryError>;

    /// 参加者を 1 件取得
    async fn find_participant(&self, room_id: &RoomId, user_id: &UserId) -> Option<Participant>;

    /// 指定セッションが所有する参加者を 1 件取得
    async fn find_owned_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Option<Participant>;

    /// ルームの参加者リストを取得（ルームがなければ空）
    async fn get_participants(&self, room_id: &RoomId) -> Vec<Participant>;

    /// ルームを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ルームを取得（room_id 順）
    async fn get_rooms(&self) -> Vec<Room>;
}
