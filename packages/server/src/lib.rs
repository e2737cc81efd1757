//! Multi-room presence and real-time relay server.
//!
//! Authenticated WebSocket sessions join named rooms, publish their 2D position,
//! and exchange chat, video-state and peer-to-peer negotiation messages with the
//! other participants of the same room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
