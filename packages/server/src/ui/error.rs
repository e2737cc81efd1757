//! Structured JSON errors for the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{AuthError, RoomAccessError},
    infrastructure::dto::http::ErrorResponse,
    usecase::{CheckRoomAccessError, GetRoomDetailError},
};

/// `{"error_code": "...", "error_msg": "..."}` with an HTTP status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error_code: self.code.to_string(),
            error_msg: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingToken => {
                Self::new(StatusCode::UNAUTHORIZED, "AUTH_MISSING_TOKEN", "No token provided")
            }
            AuthError::InvalidToken(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "AUTH_INVALID_TOKEN", "Invalid token")
            }
        }
    }
}

impl From<CheckRoomAccessError> for ApiError {
    fn from(error: CheckRoomAccessError) -> Self {
        match error {
            CheckRoomAccessError::MissingFields => Self::new(
                StatusCode::BAD_REQUEST,
                "ROOM_FIELDS_REQUIRED",
                error.to_string(),
            ),
            CheckRoomAccessError::Denied(RoomAccessError::RoomNotFound) => {
                Self::new(StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", "Room not found")
            }
            CheckRoomAccessError::Denied(RoomAccessError::IncorrectPassword) => Self::new(
                StatusCode::UNAUTHORIZED,
                "ROOM_INCORRECT_PASSWORD",
                "Incorrect password",
            ),
            CheckRoomAccessError::Denied(RoomAccessError::Unavailable(_)) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Server error",
            ),
        }
    }
}

impl From<GetRoomDetailError> for ApiError {
    fn from(error: GetRoomDetailError) -> Self {
        match error {
            GetRoomDetailError::RoomNotFound => {
                Self::new(StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", "Room not found")
            }
        }
    }
}
