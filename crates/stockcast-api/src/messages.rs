//! WebSocket 메시지 타입.
//!
//! 클라이언트-서버 간 교환되는 메시지 정의.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockcast_core::{FeedError, FeedMode};

// ==================== 클라이언트 → 서버 메시지 ====================

/// 클라이언트에서 서버로 보내는 메시지.
///
/// 알 수 없는 action과 잘못된 JSON은 파싱 에러가 되며, 호출 측은 이를
/// 무시하고 연결을 유지합니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    /// 심볼 구독
    Subscribe {
        /// 구독할 심볼
        symbol: String,
    },
    /// 심볼 구독 해제
    Unsubscribe {
        /// 구독 해제할 심볼
        symbol: String,
    },
}

impl ClientMessage {
    /// JSON 문자열에서 파싱.
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        serde_json::from_str(json).map_err(|e| FeedError::MalformedMessage(e.to_string()))
    }
}

// ==================== 서버 → 클라이언트 메시지 ====================

/// 심볼별 가격 갱신 메시지.
///
/// 클라이언트가 최상위 필드를 직접 읽는 평면 구조이며, 가격과 변화량은
/// JSON 숫자로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// 심볼
    pub ticker: String,
    /// 현재 가격
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// 직전 틱 대비 변화량
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
    /// 시세 소스 모드
    pub mode: FeedMode,
}

impl PriceUpdate {
    /// JSON 문자열로 직렬화.
    pub fn to_json(&self) -> Result<String, FeedError> {
        serde_json::to_string(self).map_err(FeedError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_client_message_subscribe() {
        let json = r#"{"action": "subscribe", "symbol": "AAPL"}"#;
        let msg = ClientMessage::from_json(json).unwrap();

        match msg {
            ClientMessage::Subscribe { symbol } => assert_eq!(symbol, "AAPL"),
            _ => panic!("Expected Subscribe message"),
        }
    }

    #[test]
    fn test_client_message_unsubscribe() {
        let json = r#"{"action": "unsubscribe", "symbol": "MSFT"}"#;
        let msg = ClientMessage::from_json(json).unwrap();

        assert!(matches!(msg, ClientMessage::Unsubscribe { .. }));
    }

    #[test]
    fn test_client_message_unknown_action() {
        let json = r#"{"action": "ping"}"#;
        let result = ClientMessage::from_json(json);

        assert!(matches!(result, Err(FeedError::MalformedMessage(_))));
    }

    #[test]
    fn test_client_message_invalid_json() {
        let result = ClientMessage::from_json("not json");

        assert!(matches!(result, Err(FeedError::MalformedMessage(_))));
    }

    #[test]
    fn test_price_update_serialization() {
        let update = PriceUpdate {
            ticker: "AAPL".to_string(),
            price: dec!(151.23),
            change: dec!(-0.42),
            mode: FeedMode::Demo,
        };
        let json = update.to_json().unwrap();

        // 가격은 문자열이 아닌 JSON 숫자로 나가야 한다
        assert!(json.contains(r#""ticker":"AAPL""#));
        assert!(json.contains(r#""price":151.23"#));
        assert!(json.contains(r#""change":-0.42"#));
        assert!(json.contains(r#""mode":"demo""#));
        assert!(!json.contains(r#""151.23""#));
    }

    #[test]
    fn test_price_update_roundtrip() {
        let update = PriceUpdate {
            ticker: "MSFT".to_string(),
            price: dec!(310.5),
            change: dec!(1.0),
            mode: FeedMode::Live,
        };

        let json = update.to_json().unwrap();
        let parsed: PriceUpdate = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.ticker, "MSFT");
        assert_eq!(parsed.mode, FeedMode::Live);
    }
}
