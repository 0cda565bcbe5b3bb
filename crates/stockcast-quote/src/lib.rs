//! 시세 소스 구현.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - `QuoteSource` trait: 통합 시세 조회 인터페이스
//! - Finnhub 제공자 (라이브 모드)
//! - 랜덤워크 생성기 (데모 모드)
//! - 시세 조회 에러 처리

pub mod error;
pub mod finnhub;
pub mod simulated;
pub mod traits;

pub use error::QuoteError;
pub use finnhub::FinnhubProvider;
pub use simulated::SimulatedSource;
pub use traits::{QuoteResult, QuoteSource};

use stockcast_core::{AppConfig, FeedMode};

/// 설정된 모드에 맞는 시세 소스를 생성합니다.
///
/// 라이브 모드는 제공자 토큰이 설정되어 있어야 합니다. 데모 모드의
/// 시뮬레이티드 소스는 설정이 필요 없고 실패하지 않습니다.
pub fn build_source(config: &AppConfig) -> QuoteResult<Box<dyn QuoteSource>> {
    match config.feed.mode {
        FeedMode::Live => Ok(Box::new(FinnhubProvider::new(&config.provider)?)),
        FeedMode::Demo => Ok(Box::new(SimulatedSource::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_source_demo() {
        let config = AppConfig::default();
        let source = build_source(&config).unwrap();

        assert_eq!(source.name(), "simulated");
    }

    #[test]
    fn test_build_source_live_requires_token() {
        let mut config = AppConfig::default();
        config.feed.mode = FeedMode::Live;

        assert!(build_source(&config).is_err());

        config.provider.token = "test-token".to_string();
        let source = build_source(&config).unwrap();
        assert_eq!(source.name(), "finnhub");
    }
}
