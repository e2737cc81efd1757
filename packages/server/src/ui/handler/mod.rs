//! Request handlers.

mod event_router;
mod http;
mod websocket;

pub use http::{check_room_access, get_room_detail, get_rooms, health_check};
pub use websocket::websocket_handler;
