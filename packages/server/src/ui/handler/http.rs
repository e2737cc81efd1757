//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header},
};

use crate::{
    infrastructure::dto::http::{
        JoinRoomRequest, JoinRoomResponse, RoomDetailDto, RoomRefDto, RoomSummaryDto,
    },
    ui::{error::ApiError, state::AppState},
    usecase::HandshakeCredentials,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, ApiError> {
    let room = state.get_room_detail_usecase.execute(room_id).await?;
    Ok(Json(RoomDetailDto::from(&room)))
}

/// Check a room's password before entering it over the WebSocket
pub async fn check_room_access(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let user_id = state
        .connect_session_usecase
        .identify(&credentials_from_headers(&headers, None))
        .await?;

    let room_id = state
        .check_room_access_usecase
        .execute(request.room_id, request.password)
        .await?;
    tracing::info!("User '{}' may enter room '{}'", user_id, room_id);

    Ok(Json(JoinRoomResponse {
        success_msg: "Joined room successfully".to_string(),
        room: RoomRefDto {
            room_id: room_id.into_string(),
        },
    }))
}

/// `Authorization: Bearer` と `Cookie` ヘッダーから認証情報を集める
///
/// `explicit_token`（クエリの token）があれば Bearer より優先する。
pub(super) fn credentials_from_headers(
    headers: &HeaderMap,
    explicit_token: Option<String>,
) -> HandshakeCredentials {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).to_string());
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    HandshakeCredentials {
        explicit_token: explicit_token.or(bearer),
        cookie_header,
    }
}
