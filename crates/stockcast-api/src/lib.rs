//! 실시간 가격 배포를 위한 WebSocket 서버.
//!
//! 추적 심볼의 가격을 주기적으로 갱신하여 해당 심볼을 구독한 클라이언트에게
//! 전달합니다.
//!
//! # 메시지 형식
//!
//! 모든 메시지는 JSON 형식으로 교환됩니다.
//!
//! ## 클라이언트 → 서버
//!
//! ```json
//! {"action": "subscribe", "symbol": "AAPL"}
//! {"action": "unsubscribe", "symbol": "AAPL"}
//! ```
//!
//! ## 서버 → 클라이언트
//!
//! ```json
//! {"ticker": "AAPL", "price": 151.23, "change": -0.42, "mode": "demo"}
//! ```
//!
//! 구독/구독 해제에 대한 응답 메시지는 없습니다.

pub mod broadcaster;
pub mod handler;
pub mod messages;
pub mod registry;
pub mod store;

pub use broadcaster::PriceBroadcaster;
pub use handler::{websocket_handler, websocket_router, WsState};
pub use messages::{ClientMessage, PriceUpdate};
pub use registry::{
    create_registry, SharedRegistry, SubscriptionRegistry, OUTBOUND_QUEUE_CAPACITY,
};
pub use store::PriceStore;
