//! WebSocket 연결 handler.
//!
//! Axum WebSocket 엔드포인트 및 세션별 메시지 처리.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockcast_core::ClientId;

use crate::messages::ClientMessage;
use crate::registry::{SharedRegistry, OUTBOUND_QUEUE_CAPACITY};

/// WebSocket 서버 상태.
#[derive(Clone)]
pub struct WsState {
    /// 구독 레지스트리
    pub registry: SharedRegistry,
    /// 서비스 종료 토큰
    pub shutdown: CancellationToken,
}

impl WsState {
    /// 새로운 WebSocket 상태 생성.
    pub fn new(registry: SharedRegistry, shutdown: CancellationToken) -> Self {
        Self { registry, shutdown }
    }
}

/// WebSocket 업그레이드 핸들러.
///
/// HTTP 연결을 WebSocket으로 업그레이드합니다.
///
/// # 엔드포인트
///
/// `GET /ws`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<WsState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// WebSocket 연결 처리.
///
/// 세션을 레지스트리에 등록한 뒤 수신 태스크(구독 명령 처리)와 송신
/// 태스크(갱신 메시지 전달)를 함께 실행합니다. 어느 한쪽이 끝나면 세션을
/// 정리합니다.
async fn handle_socket(socket: WebSocket, state: WsState) {
    let client_id = ClientId::generate();
    let (update_tx, mut update_rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

    if let Err(e) = state.registry.register(client_id, update_tx) {
        warn!(client_id = %client_id, error = %e, "Failed to register session, closing");
        return;
    }
    info!(client_id = %client_id, "Client connected");

    let (mut sender, mut receiver) = socket.split();

    // 클라이언트 메시지 수신 태스크
    let recv_registry = state.registry.clone();
    let recv_shutdown = state.shutdown.clone();
    let receive_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = recv_shutdown.cancelled() => break,
                msg = receiver.next() => match msg {
                    Some(Ok(msg)) => {
                        if !handle_client_message(client_id, msg, &recv_registry) {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(client_id = %client_id, error = %e, "WebSocket receive error");
                        break;
                    }
                    None => break,
                }
            }
        }
    });

    // 갱신 메시지 송신 태스크
    let send_shutdown = state.shutdown.clone();
    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = send_shutdown.cancelled() => break,
                update = update_rx.recv() => {
                    // 채널이 닫혔다면 갱신 루프가 이미 이 세션을 제거한 것
                    let Some(update) = update else { break };
                    match update.to_json() {
                        Ok(json) => {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(client_id = %client_id, error = %e, "Failed to serialize update");
                        }
                    }
                }
            }
        }
    });

    // 하나의 태스크가 종료되면 다른 쪽도 함께 정리된다
    tokio::select! {
        _ = receive_task => {
            debug!(client_id = %client_id, "Receive task ended");
        }
        _ = send_task => {
            debug!(client_id = %client_id, "Send task ended");
        }
    }

    // 갱신 루프의 전송 실패 정리와 경합할 수 있으므로 멱등 제거에 의존한다
    state.registry.remove(client_id);
    info!(client_id = %client_id, "Client disconnected");
}

/// 클라이언트 메시지 처리.
///
/// # Returns
///
/// `true`면 연결 유지, `false`면 연결 종료
fn handle_client_message(client_id: ClientId, msg: Message, registry: &SharedRegistry) -> bool {
    match msg {
        Message::Text(text) => {
            match ClientMessage::from_json(&text) {
                Ok(ClientMessage::Subscribe { symbol }) => {
                    // 무효 심볼과 한도 초과는 프로토콜상 조용히 무시된다
                    if let Err(e) = registry.subscribe(client_id, &symbol) {
                        debug!(client_id = %client_id, symbol = %symbol, error = %e, "Subscribe rejected");
                    }
                }
                Ok(ClientMessage::Unsubscribe { symbol }) => {
                    registry.unsubscribe(client_id, &symbol);
                }
                Err(e) => {
                    // 잘못된 메시지는 무시하고 연결은 유지한다
                    debug!(client_id = %client_id, error = %e, "Ignoring malformed message");
                }
            }
            true
        }
        Message::Binary(_) => true,
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            debug!(client_id = %client_id, "Close frame received");
            false
        }
    }
}

/// WebSocket 라우터 생성.
pub fn websocket_router(state: WsState) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .with_state(state)
}
