//! Multi-room presence and real-time relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, error::Error, sync::Arc};

use clap::Parser;
use hiroba_server::{
    config::ServerConfig,
    infrastructure::{
        auth::JwtTokenVerifier,
        directory::{InMemoryProfileDirectory, InMemoryRoomGate},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryPresenceRepository,
    },
    ui::{AppState, Server},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Multi-room presence and signaling relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let server = match build_server() {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize dependencies in order:
/// 1. Config
/// 2. Repository
/// 3. MessagePusher
/// 4. External collaborators (token verifier, profiles, rooms)
/// 5. AppState (UseCases)
fn build_server() -> Result<Server, Box<dyn Error>> {
    // 1. Config
    let config = ServerConfig::from_env()?;
    if config.is_dev_jwt_secret() {
        tracing::warn!("HIROBA_JWT_SECRET is not set; using the development-only secret");
    }

    // 2. Repository (in-memory presence store)
    let clock = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryPresenceRepository::new(clock.clone()));

    // 3. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 4. External collaborators
    let token_verifier = Arc::new(JwtTokenVerifier::new(&config.jwt_secret, clock.clone())?);
    let profiles = match &config.profiles_file {
        Some(path) => InMemoryProfileDirectory::from_json_file(path)?,
        None => {
            tracing::warn!("HIROBA_PROFILES_FILE is not set; every join will be rejected");
            InMemoryProfileDirectory::new(Vec::new())?
        }
    };
    tracing::info!("Loaded {} profile(s)", profiles.len());
    let rooms = match &config.rooms_file {
        Some(path) => InMemoryRoomGate::from_json_file(path)?,
        None => InMemoryRoomGate::new(Vec::new())?,
    };
    tracing::info!("Loaded {} password-protected room(s)", rooms.len());

    // 5. AppState
    let state = AppState::new(
        repository,
        message_pusher,
        token_verifier,
        Arc::new(profiles),
        Arc::new(rooms),
        clock,
        config.outbound_queue_capacity,
    );

    Ok(Server::new(state))
}
