//! UseCase 層
//!
//! 1 ファイル 1 ユースケースです。UI 層のハンドラーから呼ばれ、
//! Domain 層の trait（Repository, MessagePusher, 外部コラボレーター）だけに依存します。

pub mod check_room_access;
pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod move_participant;
pub mod relay_signal;
pub mod send_chat;
pub mod toggle_video;

#[cfg(test)]
pub(crate) mod test_support;

pub use check_room_access::CheckRoomAccessUseCase;
pub use connect_session::{ConnectSessionUseCase, HandshakeCredentials};
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{CheckRoomAccessError, GetRoomDetailError, JoinRoomError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use move_participant::MoveParticipantUseCase;
pub use relay_signal::RelaySignalUseCase;
pub use send_chat::SendChatUseCase;
pub use toggle_video::ToggleVideoUseCase;
