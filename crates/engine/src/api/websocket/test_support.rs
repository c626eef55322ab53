use super::*;

use std::{net::SocketAddr, time::Duration};

use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use uuid::Uuid;

use tablerelay_shared::{RequestPayload, ResponseResult};

use crate::infrastructure::app_settings::EngineSettings;

pub(crate) type TestWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

pub(crate) const RECV_TIMEOUT: Duration = Duration::from_secs(2);
pub(crate) const QUIET_PERIOD: Duration = Duration::from_millis(200);

pub(crate) fn build_test_state(settings: EngineSettings) -> Arc<WsState> {
    let connections = Arc::new(ConnectionManager::new());
    let app = Arc::new(App::new(settings, connections));
    Arc::new(WsState::new(app))
}

pub(crate) async fn spawn_ws_server(
    state: Arc<WsState>,
) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let router = axum::Router::new().route("/ws", get(ws_handler).with_state(state));

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, handle)
}

pub(crate) async fn ws_connect(addr: SocketAddr) -> TestWs {
    let url = format!("ws://{}/ws", addr);
    let (ws, _resp) = connect_async(url).await.unwrap();
    ws
}

/// Connect and consume the handshake; returns the socket and its
/// connection id.
pub(crate) async fn ws_connect_client(addr: SocketAddr) -> (TestWs, Uuid) {
    let mut ws = ws_connect(addr).await;
    let handshake = ws_expect_message(&mut ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::VersionCheck { .. })
    })
    .await;
    let ServerMessage::VersionCheck { connection_id, .. } = handshake else {
        unreachable!()
    };
    (ws, connection_id)
}

pub(crate) async fn ws_send_client(ws: &mut TestWs, msg: &ClientMessage) {
    let json = serde_json::to_string(msg).unwrap();
    ws.send(WsMessage::Text(json.into())).await.unwrap();
}

pub(crate) async fn ws_recv_server(ws: &mut TestWs) -> ServerMessage {
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        match msg {
            WsMessage::Text(text) => {
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            WsMessage::Binary(bin) => {
                let text = String::from_utf8(bin).unwrap();
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            _ => {}
        }
    }
}

pub(crate) async fn ws_expect_message<F>(
    ws: &mut TestWs,
    timeout: Duration,
    mut predicate: F,
) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                return msg;
            }
        }
    })
    .await
    .unwrap()
}

pub(crate) async fn ws_expect_no_message_matching<F>(
    ws: &mut TestWs,
    timeout: Duration,
    mut predicate: F,
) where
    F: FnMut(&ServerMessage) -> bool,
{
    let result = tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                panic!("unexpected message: {:?}", msg);
            }
        }
    })
    .await;

    // We only succeed if we timed out without seeing a matching message.
    assert!(result.is_err());
}

/// Send a request and wait for its response.
pub(crate) async fn ws_request(
    ws: &mut TestWs,
    request_id: &str,
    payload: RequestPayload,
) -> ResponseResult {
    ws_send_client(
        ws,
        &ClientMessage::Request {
            request_id: request_id.to_string(),
            payload,
        },
    )
    .await;

    let response = ws_expect_message(ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::Response { request_id: id, .. } if id == request_id)
    })
    .await;
    let ServerMessage::Response { result, .. } = response else {
        unreachable!()
    };
    result
}
