//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::FeedError;
use crate::types::FeedMode;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 피드 설정
    #[serde(default)]
    pub feed: FeedConfig,
    /// 시세 제공자 설정
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 피드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// 추적 심볼 목록
    pub symbols: Vec<String>,
    /// 클라이언트당 최대 구독 수
    pub max_subscriptions_per_client: usize,
    /// 가격 갱신 주기 (초)
    pub refresh_interval_secs: u64,
    /// 시세 소스 모드
    pub mode: FeedMode,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbols: vec![
                "AAPL".to_string(),
                "GOOGL".to_string(),
                "AMZN".to_string(),
                "MSFT".to_string(),
            ],
            max_subscriptions_per_client: 5,
            refresh_interval_secs: 1,
            mode: FeedMode::Demo,
        }
    }
}

/// 시세 제공자 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 액세스 토큰 (라이브 모드에서 필수)
    #[serde(default)]
    pub token: String,
    /// 심볼당 조회 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finnhub.io/api/v1".to_string(),
            token: String::new(),
            timeout_secs: 5,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;
        let builder = config::Config::builder()
            // 기본값으로 시작
            .add_source(defaults)
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(Self::env_source());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 설정 파일 없이 기본값과 환경 변수만으로 로드합니다.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;
        let config = config::Config::builder()
            .add_source(defaults)
            .add_source(Self::env_source())
            .build()?;
        config.try_deserialize()
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("STOCKCAST")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("feed.symbols")
    }

    /// 설정의 유효성을 검사합니다.
    ///
    /// 라이브 모드에서는 제공자 토큰이 설정되어 있어야 합니다.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.feed.symbols.is_empty() {
            return Err(FeedError::Config(
                "feed.symbols must not be empty".to_string(),
            ));
        }
        if self.feed.refresh_interval_secs == 0 {
            return Err(FeedError::Config(
                "feed.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.feed.mode == FeedMode::Live && self.provider.token.is_empty() {
            return Err(FeedError::Config(
                "provider.token is required in live mode".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.feed.symbols.len(), 4);
        assert_eq!(config.feed.max_subscriptions_per_client, 5);
        assert_eq!(config.feed.refresh_interval_secs, 1);
        assert_eq!(config.feed.mode, FeedMode::Demo);
        assert_eq!(config.provider.timeout_secs, 5);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        let addr = server.socket_addr().unwrap();

        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_validate_demo_without_token() {
        // 데모 모드는 토큰 없이도 유효하다
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_live_requires_token() {
        let mut config = AppConfig::default();
        config.feed.mode = FeedMode::Live;
        assert!(config.validate().is_err());

        config.provider.token = "test-token".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_symbols() {
        let mut config = AppConfig::default();
        config.feed.symbols.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.feed.refresh_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
