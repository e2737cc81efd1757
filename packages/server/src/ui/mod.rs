//! HTTP / WebSocket front end of the presence server.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::Server;
pub use state::AppState;
