//! 시세 조회 에러 타입.

use thiserror::Error;

/// 시세 제공자 관련 에러.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// HTTP 상태 에러
    #[error("Provider returned status {status} for {symbol}")]
    Status {
        /// 요청한 심볼
        symbol: String,
        /// 응답 상태 코드
        status: u16,
    },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 시세 필드가 없거나 0인 응답
    #[error("Missing quote for symbol: {0}")]
    MissingQuote(String),

    /// 제공자 설정 에러
    #[error("Provider misconfigured: {0}")]
    Misconfigured(String),
}

impl QuoteError {
    /// 재시도 가능한 에러인지 확인.
    ///
    /// 갱신 루프는 재시도하지 않고 해당 틱에서 심볼을 건너뛰지만, 일시적
    /// 에러와 설정 문제를 로그에서 구분할 수 있어야 합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QuoteError::Network(_) | QuoteError::Timeout(_) | QuoteError::Status { .. }
        )
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuoteError::Timeout(err.to_string())
        } else if err.is_decode() {
            QuoteError::Parse(err.to_string())
        } else {
            QuoteError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let network = QuoteError::Network("connection refused".to_string());
        assert!(network.is_retryable());

        let status = QuoteError::Status {
            symbol: "AAPL".to_string(),
            status: 503,
        };
        assert!(status.is_retryable());

        let missing = QuoteError::MissingQuote("AAPL".to_string());
        assert!(!missing.is_retryable());

        let misconfigured = QuoteError::Misconfigured("no token".to_string());
        assert!(!misconfigured.is_retryable());
    }
}
