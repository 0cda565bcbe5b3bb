//! Finnhub 실시간 시세 제공자.
//!
//! 틱마다 심볼별로 `/quote` 엔드포인트를 한 번씩 호출하여 현재 가격을
//! 조회합니다. 응답의 `c` 필드가 없거나 0이면 조회 실패로 처리합니다
//! (Finnhub는 알 수 없는 심볼에 대해 0을 반환).
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use stockcast_quote::{FinnhubProvider, QuoteSource};
//!
//! let provider = FinnhubProvider::new(&config.provider)?;
//! let price = provider.fetch_price("AAPL", previous).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use stockcast_core::ProviderConfig;

use crate::{QuoteError, QuoteResult, QuoteSource};

/// Finnhub `/quote` 응답.
///
/// 응답에는 고가/저가 등의 필드도 포함되지만 현재 가격만 사용합니다.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// 현재 가격
    #[serde(default)]
    c: f64,
}

/// Finnhub 시세 제공자.
pub struct FinnhubProvider {
    client: Client,
    base_url: String,
    token: String,
}

impl FinnhubProvider {
    /// 설정으로부터 새 제공자를 생성합니다.
    ///
    /// # Errors
    /// 토큰이 비어 있으면 `Misconfigured`를 반환합니다.
    pub fn new(config: &ProviderConfig) -> QuoteResult<Self> {
        if config.token.is_empty() {
            return Err(QuoteError::Misconfigured(
                "provider token is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl QuoteSource for FinnhubProvider {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch_price(&self, symbol: &str, _previous: Decimal) -> QuoteResult<Decimal> {
        let url = format!("{}/quote", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|e| QuoteError::Parse(e.to_string()))?;

        if quote.c <= 0.0 {
            return Err(QuoteError::MissingQuote(symbol.to_string()));
        }

        let price = Decimal::try_from(quote.c)
            .map_err(|e| QuoteError::Parse(e.to_string()))?
            .round_dp(2);

        debug!(symbol = %symbol, price = %price, "Quote fetched");

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider_for(server: &mockito::ServerGuard) -> FinnhubProvider {
        let config = ProviderConfig {
            base_url: server.url(),
            token: "test-token".to_string(),
            timeout_secs: 5,
        };
        FinnhubProvider::new(&config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let config = ProviderConfig::default();
        let result = FinnhubProvider::new(&config);

        assert!(matches!(result, Err(QuoteError::Misconfigured(_))));
    }

    #[tokio::test]
    async fn test_fetch_price() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("symbol".into(), "AAPL".into()),
                mockito::Matcher::UrlEncoded("token".into(), "test-token".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"c": 151.237, "h": 152.0, "l": 150.1, "o": 150.5, "pc": 150.9}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let price = provider.fetch_price("AAPL", dec!(150)).await.unwrap();

        // 소수점 둘째 자리로 반올림
        assert_eq!(price, dec!(151.24));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_price_zero_quote_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"c": 0}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let result = provider.fetch_price("UNKNOWN", dec!(150)).await;

        assert!(matches!(result, Err(QuoteError::MissingQuote(_))));
    }

    #[tokio::test]
    async fn test_fetch_price_missing_field_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"h": 152.0}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let result = provider.fetch_price("AAPL", dec!(150)).await;

        assert!(matches!(result, Err(QuoteError::MissingQuote(_))));
    }

    #[tokio::test]
    async fn test_fetch_price_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let result = provider.fetch_price("AAPL", dec!(150)).await;

        assert!(matches!(
            result,
            Err(QuoteError::Status { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_price_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let result = provider.fetch_price("AAPL", dec!(150)).await;

        assert!(matches!(result, Err(QuoteError::Parse(_))));
    }
}
