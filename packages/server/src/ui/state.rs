//! Server state shared by every handler.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    domain::{MessagePusher, PresenceRepository, ProfileLookup, RoomGate, TokenVerifier},
    usecase::{
        CheckRoomAccessUseCase, ConnectSessionUseCase, DisconnectSessionUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        MoveParticipantUseCase, RelaySignalUseCase, SendChatUseCase, ToggleVideoUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（ハンドシェイク認証）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（切断処理）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub move_participant_usecase: Arc<MoveParticipantUseCase>,
    pub toggle_video_usecase: Arc<ToggleVideoUseCase>,
    pub send_chat_usecase: Arc<SendChatUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub check_room_access_usecase: Arc<CheckRoomAccessUseCase>,
    /// 各セッションの送信キューの容量
    pub outbound_queue_capacity: usize,
}

impl AppState {
    /// Repository・MessagePusher・外部コラボレーターから全ユースケースを組み立てる
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        token_verifier: Arc<dyn TokenVerifier>,
        profile_lookup: Arc<dyn ProfileLookup>,
        room_gate: Arc<dyn RoomGate>,
        clock: Arc<dyn Clock>,
        outbound_queue_capacity: usize,
    ) -> Self {
        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_session_usecase: Arc::new(ConnectSessionUseCase::new(
                token_verifier,
                message_pusher.clone(),
            )),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
                leave_room_usecase.clone(),
                message_pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                profile_lookup,
                clock,
            )),
            move_participant_usecase: Arc::new(MoveParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            toggle_video_usecase: Arc::new(ToggleVideoUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            send_chat_usecase: Arc::new(SendChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(
                repository.clone(),
                message_pusher,
            )),
            leave_room_usecase,
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            check_room_access_usecase: Arc::new(CheckRoomAccessUseCase::new(room_gate)),
            outbound_queue_capacity,
        }
    }
}
