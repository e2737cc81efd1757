//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::Session,
    ui::{error::ApiError, state::AppState},
};

use super::{event_router::RoomEventRouter, http::credentials_from_headers};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Authenticates the handshake, then upgrades.
///
/// 認証に失敗した接続はアップグレードせず、401 を返す。
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Response {
    let credentials = credentials_from_headers(&headers, query.token);

    let session = match state
        .connect_session_usecase
        .authenticate(&credentials)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Rejecting WebSocket handshake: {}", e);
            return ApiError::from(e).into_response();
        }
    };

    tracing::info!(
        "User '{}' authenticated as session '{}'",
        session.user_id,
        session.id
    );
    ws.on_upgrade(move |socket| handle_socket(socket, state, session))
}

/// Spawns a task that drains the session's outbound queue into the WebSocket sink.
///
/// The task ends when the queue is closed or the socket write fails.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Reads frames in order and hands each text frame to the router.
async fn receive_loop(
    router: &RoomEventRouter,
    session: &mut Session,
    receiver: &mut SplitStream<WebSocket>,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("WebSocket error on session '{}': {}", session.id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received from '{}': {}", session.user_id, text.as_str());
                router.dispatch(session, text.as_str()).await;
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
            }
            Message::Close(_) => {
                tracing::info!("Session '{}' requested close", session.id);
                break;
            }
            _ => {}
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mut session: Session) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::channel(state.outbound_queue_capacity);
    state.connect_session_usecase.attach(&session, tx).await;
    let mut send_task = pusher_loop(rx, sender);

    let router = RoomEventRouter::new(state.clone());

    // どちらかが終わったら接続は終わり
    tokio::select! {
        _ = receive_loop(&router, &mut session, &mut receiver) => {}
        _ = &mut send_task => {}
    }
    send_task.abort();

    let rooms = state
        .disconnect_session_usecase
        .execute(&mut session)
        .await;
    tracing::info!(
        "Session '{}' disconnected, left {} room(s)",
        session.id,
        rooms.len()
    );
}
