//! 실시간 가격 배포 서버.
//!
//! 추적 심볼의 가격을 주기적으로 갱신하여 구독 중인 WebSocket 클라이언트에게
//! 배포합니다. 데모 모드에서는 랜덤워크로 가격을 생성하고, 라이브 모드에서는
//! 외부 시세 제공자를 조회합니다.

use std::path::Path;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use stockcast_api::{create_registry, websocket_router, PriceBroadcaster, PriceStore, WsState};
use stockcast_core::{init_logging, AppConfig, TrackedSymbols};

/// 설정 로드.
///
/// 우선순위: `STOCKCAST_CONFIG`가 가리키는 파일 → `config/default.toml`
/// (존재하는 경우) → 기본값. 어느 경우든 환경 변수가 파일 값을 덮어씁니다.
fn load_config() -> Result<AppConfig, config::ConfigError> {
    if let Ok(path) = std::env::var("STOCKCAST_CONFIG") {
        return AppConfig::load(path);
    }
    if Path::new("config/default.toml").exists() {
        return AppConfig::load_default();
    }
    AppConfig::from_env()
}

/// /health 엔드포인트 핸들러.
async fn health_handler() -> &'static str {
    "OK"
}

/// CORS 미들웨어 구성.
///
/// 브라우저 프런트엔드가 다른 포트에서 접속하는 개발 구성을 가정하고 모든
/// origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = load_config()?;
    init_logging(&config.logging)?;
    config.validate()?;

    info!(
        mode = %config.feed.mode,
        symbols = config.feed.symbols.len(),
        interval_secs = config.feed.refresh_interval_secs,
        "Starting stockcast server"
    );

    let tracked = TrackedSymbols::new(config.feed.symbols.iter().cloned());
    let registry = create_registry(tracked.clone(), config.feed.max_subscriptions_per_client);
    let store = PriceStore::seed(&tracked);
    let source = stockcast_quote::build_source(&config)?;

    // 전역 종료 토큰: 갱신 루프와 모든 세션에 전파된다
    let shutdown = CancellationToken::new();

    // 가격 갱신 루프 시작
    let broadcaster = PriceBroadcaster::new(
        registry.clone(),
        store,
        source,
        config.feed.mode,
        Duration::from_secs(config.feed.refresh_interval_secs),
    );
    let broadcaster_task = tokio::spawn(broadcaster.run(shutdown.clone()));

    // 라우터 구성
    let ws_state = WsState::new(registry, shutdown.clone());
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/ws", websocket_router(ws_state))
        .layer(cors_layer());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");
    info!("WebSocket available at ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    // 종료 순서: 신규 연결 수락 중단(위의 drain) → 루프/세션 취소 → 정리 대기
    shutdown.cancel();
    if tokio::time::timeout(Duration::from_secs(5), broadcaster_task)
        .await
        .is_err()
    {
        warn!("Broadcaster did not stop in time");
    }

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // 갱신 루프와 모든 세션에 종료 시그널 전파
    shutdown.cancel();
    info!("Shutdown signal propagated to background tasks");
}
