//! Integration tests: the full router served in-process on an ephemeral port,
//! driven by real WebSocket and HTTP clients.

use std::{collections::HashMap, sync::Arc, time::Duration};

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::UserId,
    infrastructure::{
        auth::JwtTokenVerifier,
        directory::{
            InMemoryProfileDirectory, InMemoryRoomGate, profile::ProfileRecord,
            room_gate::RoomRecord,
        },
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryPresenceRepository,
    },
    ui::{AppState, Server},
};
use hiroba_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{net::TcpStream, sync::Mutex};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, client::IntoClientRequest},
};

const SECRET: &str = "integration_test_secret_at_least_32_chars";
const ROOM_PASSWORD: &str = "open-sesame";
const FIXED_SALT: &str = "c2FsdHNhbHRzYWx0c2FsdA";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: std::net::SocketAddr,
    tokens: JwtTokenVerifier,
}

impl TestServer {
    async fn start() -> Self {
        let clock = Arc::new(SystemClock);
        let tokens = JwtTokenVerifier::new(SECRET, clock.clone()).unwrap();
        let profiles = InMemoryProfileDirectory::new(
            ["u1", "u2", "u3"]
                .into_iter()
                .map(|id| ProfileRecord {
                    id: id.to_string(),
                    name: format!("{} name", id),
                    avatar: format!("{}-avatar", id),
                })
                .collect(),
        )
        .unwrap();
        let salt = SaltString::from_b64(FIXED_SALT).unwrap();
        let hash = Argon2::default()
            .hash_password(ROOM_PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();
        let rooms = InMemoryRoomGate::new(vec![RoomRecord {
            room_id: "r1".to_string(),
            password_hash: hash,
        }])
        .unwrap();

        let state = AppState::new(
            Arc::new(InMemoryPresenceRepository::new(clock.clone())),
            Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
                HashMap::new(),
            )))),
            Arc::new(tokens.clone()),
            Arc::new(profiles),
            Arc::new(rooms),
            clock,
            64,
        );
        let app = Server::new(state).router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, tokens }
    }

    fn token(&self, user: &str) -> String {
        self.tokens
            .issue_token(&UserId::new(user.to_string()).unwrap(), 3600)
            .unwrap()
    }

    fn http(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self, user: &str) -> Socket {
        let url = format!("ws://{}/ws?token={}", self.addr, self.token(user));
        let (socket, _) = connect_async(url).await.unwrap();
        socket
    }
}

async fn send(socket: &mut Socket, event: Value) {
    socket
        .send(Message::text(event.to_string()))
        .await
        .unwrap();
}

/// 次のテキストフレームを JSON として受け取る
async fn recv(socket: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// 指定した type のフレームが来るまで読み進める
async fn recv_type(socket: &mut Socket, event_type: &str) -> Value {
    loop {
        let value = recv(socket).await;
        if value["type"] == event_type {
            return value;
        }
    }
}

/// 短い時間待ってもフレームが届かないことを確認する
async fn assert_silent(socket: &mut Socket) {
    let result = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(result.is_err(), "unexpected frame: {:?}", result);
}

async fn join(socket: &mut Socket, room: &str) {
    send(socket, json!({"type": "joinRoom", "roomId": room})).await;
    recv_type(socket, "currentPositions").await;
    recv_type(socket, "onlineUsers").await;
}

#[tokio::test]
async fn test_handshake_without_token_is_rejected() {
    // テスト項目: トークンのないハンドシェイクはアップグレードされず 401 になる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = connect_async(format!("ws://{}/ws", server.addr)).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected 401, got {:?}", other.map(|(_, r)| r.status())),
    }
}

#[tokio::test]
async fn test_handshake_with_forged_token_is_rejected() {
    // テスト項目: 別の鍵で署名されたトークンは拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let forger = JwtTokenVerifier::new(
        "another_secret_that_is_also_32_chars_long",
        Arc::new(SystemClock),
    )
    .unwrap();
    let forged = forger
        .issue_token(&UserId::new("u1".to_string()).unwrap(), 3600)
        .unwrap();

    // when (操作):
    let result = connect_async(format!("ws://{}/ws?token={}", server.addr, forged)).await;

    // then (期待する結果):
    assert!(matches!(result, Err(tungstenite::Error::Http(r)) if r.status() == 401));
}

#[tokio::test]
async fn test_handshake_with_cookie_token() {
    // テスト項目: jwt_token Cookie でも認証できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut request = format!("ws://{}/ws", server.addr)
        .into_client_request()
        .unwrap();
    request.headers_mut().insert(
        "Cookie",
        format!("jwt_token={}", server.token("u1")).parse().unwrap(),
    );

    // when (操作):
    let (mut socket, _) = connect_async(request).await.unwrap();
    send(&mut socket, json!({"type": "joinRoom", "roomId": "r1"})).await;

    // then (期待する結果):
    let snapshot = recv_type(&mut socket, "currentPositions").await;
    assert_eq!(snapshot["participants"]["u1"]["userId"], "u1");
}

#[tokio::test]
async fn test_join_and_move_delta() {
    // テスト項目: u1 入室 → u2 入室 → u1 移動で、u2 には差分だけが届き u1 には何も返らない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;
    let mut u2 = server.connect("u2").await;

    // when (操作):
    send(&mut u1, json!({"type": "joinRoom", "roomId": "r1"})).await;
    let first = recv(&mut u1).await;
    let online_for_u1 = recv(&mut u1).await;

    send(&mut u2, json!({"type": "joinRoom", "roomId": "r1", "avatar": "cat"})).await;
    let second = recv(&mut u2).await;
    let joined = recv(&mut u1).await;
    let online_after_u2 = recv(&mut u1).await;
    recv_type(&mut u2, "onlineUsers").await;

    send(&mut u1, json!({"type": "move", "roomId": "r1", "x": 150, "y": 80})).await;
    let moved = recv(&mut u2).await;

    // then (期待する結果):
    assert_eq!(first["type"], "currentPositions");
    assert_eq!(
        first["participants"]["u1"],
        json!({"userId": "u1", "username": "u1 name", "avatar": "u1-avatar",
               "x": 100.0, "y": 100.0, "sessionId": first["participants"]["u1"]["sessionId"]})
    );
    assert_eq!(online_for_u1["type"], "onlineUsers");
    assert_eq!(second["participants"].as_object().unwrap().len(), 2);
    assert_eq!(joined["type"], "userJoined");
    assert_eq!(joined["participant"]["avatar"], "cat");
    assert_eq!(online_after_u2["participants"].as_array().unwrap().len(), 2);
    assert_eq!(
        moved,
        json!({"type": "userMoved", "userId": "u1", "x": 150.0, "y": 80.0})
    );
    assert_silent(&mut u1).await;
}

#[tokio::test]
async fn test_disconnect_broadcasts_user_left() {
    // テスト項目: u2 の切断で u1 に userLeft と u1 だけの onlineUsers が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;
    let mut u2 = server.connect("u2").await;
    join(&mut u1, "r1").await;
    join(&mut u2, "r1").await;
    recv_type(&mut u1, "onlineUsers").await;

    // when (操作):
    u2.close(None).await.unwrap();

    // then (期待する結果):
    let left = recv(&mut u1).await;
    let online = recv(&mut u1).await;
    assert_eq!(left, json!({"type": "userLeft", "userId": "u2"}));
    assert_eq!(online["type"], "onlineUsers");
    let participants = online["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["userId"], "u1");

    let detail: Value = reqwest::get(server.http("/api/rooms/r1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["participants"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_leave_room_keeps_socket_open() {
    // テスト項目: leaveRoom で相手に userLeft が届き、退室した側のソケットは開いたまま再入室できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;
    let mut u2 = server.connect("u2").await;
    join(&mut u1, "r1").await;
    join(&mut u2, "r1").await;
    recv_type(&mut u1, "onlineUsers").await;

    // when (操作):
    send(&mut u1, json!({"type": "leaveRoom", "roomId": "r1"})).await;

    // then (期待する結果):
    let left = recv(&mut u2).await;
    let online = recv(&mut u2).await;
    assert_eq!(left, json!({"type": "userLeft", "userId": "u1"}));
    assert_eq!(online["type"], "onlineUsers");
    let participants = online["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["userId"], "u2");
    assert_silent(&mut u1).await;

    send(&mut u1, json!({"type": "joinRoom", "roomId": "r1"})).await;
    let positions = recv_type(&mut u1, "currentPositions").await;
    assert!(positions.to_string().contains("u2"));
    let online = recv_type(&mut u2, "onlineUsers").await;
    assert_eq!(online["participants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_chat_is_not_echoed_to_sender() {
    // テスト項目: チャットは u2, u3 にだけ届き、u1 には返らない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;
    let mut u2 = server.connect("u2").await;
    let mut u3 = server.connect("u3").await;
    join(&mut u1, "r1").await;
    join(&mut u2, "r1").await;
    join(&mut u3, "r1").await;
    recv_type(&mut u1, "onlineUsers").await;
    recv_type(&mut u1, "onlineUsers").await;
    recv_type(&mut u2, "onlineUsers").await;

    // when (操作):
    send(&mut u1, json!({"type": "chat", "roomId": "r1", "message": "hello"})).await;

    // then (期待する結果):
    let expected = json!({"type": "chat", "from": "u1", "message": "hello"});
    assert_eq!(recv(&mut u2).await, expected);
    assert_eq!(recv(&mut u3).await, expected);
    assert_silent(&mut u1).await;
}

#[tokio::test]
async fn test_signal_is_point_to_point() {
    // テスト項目: シグナルは宛先の u2 にだけ from 付きで届き、u3 には届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;
    let mut u2 = server.connect("u2").await;
    let mut u3 = server.connect("u3").await;
    join(&mut u1, "r1").await;
    join(&mut u2, "r1").await;
    join(&mut u3, "r1").await;
    recv_type(&mut u2, "onlineUsers").await;

    // when (操作):
    send(&mut u1, json!({"type": "signal", "to": "u2", "sdp": "v=0"})).await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut u2).await,
        json!({"type": "signal", "sdp": "v=0", "from": "u1"})
    );
    assert_silent(&mut u3).await;
}

#[tokio::test]
async fn test_malformed_frame_is_dropped_and_session_survives() {
    // テスト項目: 解釈できないフレームは破棄され、接続はそのまま使える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;

    // when (操作):
    u1.send(Message::text("not json")).await.unwrap();
    send(&mut u1, json!({"type": "move", "x": 1, "y": 2})).await;
    send(&mut u1, json!({"type": "joinRoom", "roomId": "r1"})).await;

    // then (期待する結果):
    let snapshot = recv(&mut u1).await;
    assert_eq!(snapshot["type"], "currentPositions");
}

#[tokio::test]
async fn test_http_introspection() {
    // テスト項目: health, ルーム一覧が参加状況を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.connect("u1").await;
    join(&mut u1, "lobby").await;

    // when (操作):
    let health: Value = reqwest::get(server.http("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rooms: Value = reqwest::get(server.http("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let missing = reqwest::get(server.http("/api/rooms/nowhere")).await.unwrap();

    // then (期待する結果):
    assert_eq!(health, json!({"status": "ok"}));
    assert_eq!(rooms[0]["id"], "lobby");
    assert_eq!(rooms[0]["participants"], json!(["u1"]));
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_room_access_check() {
    // テスト項目: 入室前チェックは正しいパスワードで 200、誤りで 401、未知のルームで 404
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let token = server.token("u1");
    let post = |body: Value| {
        client
            .post(server.http("/api/rooms/join"))
            .bearer_auth(&token)
            .json(&body)
            .send()
    };

    // when (操作):
    let ok = post(json!({"roomId": "r1", "password": ROOM_PASSWORD}))
        .await
        .unwrap();
    let wrong = post(json!({"roomId": "r1", "password": "nope"})).await.unwrap();
    let unknown = post(json!({"roomId": "r9", "password": "nope"})).await.unwrap();
    let incomplete = post(json!({"roomId": "r1"})).await.unwrap();
    let anonymous = client
        .post(server.http("/api/rooms/join"))
        .json(&json!({"roomId": "r1", "password": ROOM_PASSWORD}))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(ok.status(), 200);
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["room"]["roomId"], "r1");
    assert_eq!(wrong.status(), 401);
    let error: Value = wrong.json().await.unwrap();
    assert_eq!(error["error_msg"], "Incorrect password");
    assert_eq!(unknown.status(), 404);
    assert_eq!(incomplete.status(), 400);
    assert_eq!(anonymous.status(), 401);
}
