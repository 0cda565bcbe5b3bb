//! 피드 도메인 타입 정의.
//!
//! 이 모듈은 피드 관련 기본 타입을 정의합니다:
//! - `FeedMode` - 시세 소스 모드 (라이브/데모)
//! - `TrackedSymbols` - 추적 대상 심볼 allowlist
//! - `ClientId` - WebSocket 세션 식별자

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 시세 소스 모드.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    /// 외부 시세 제공자에서 실시간 조회
    Live,
    /// 로컬 랜덤워크로 가격 생성
    #[default]
    Demo,
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedMode::Live => write!(f, "live"),
            FeedMode::Demo => write!(f, "demo"),
        }
    }
}

impl std::str::FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "demo" => Ok(Self::Demo),
            _ => Err(format!("Unknown feed mode: {}", s)),
        }
    }
}

/// 추적 대상 심볼 allowlist.
///
/// 서비스가 가격을 유지하는 고정된 심볼 집합입니다. 구독과 가격 갱신은
/// 이 집합에 포함된 심볼에 대해서만 허용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSymbols(Vec<String>);

impl TrackedSymbols {
    /// 새 allowlist를 생성합니다.
    ///
    /// 심볼은 대문자로 정규화되며 공백 항목과 중복은 제거됩니다.
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut seen: Vec<String> = Vec::new();
        for symbol in symbols {
            let upper = symbol.into().trim().to_uppercase();
            if !upper.is_empty() && !seen.contains(&upper) {
                seen.push(upper);
            }
        }
        Self(seen)
    }

    /// 심볼이 추적 대상인지 확인합니다. 심볼은 이미 정규화되어 있어야 합니다.
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    /// 추적 중인 심볼을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// 추적 중인 심볼 수.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 추적 심볼이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TrackedSymbols {
    fn default() -> Self {
        Self::new(["AAPL", "GOOGL", "AMZN", "MSFT"])
    }
}

/// WebSocket 세션 식별자.
///
/// 연결 수락 시점에 생성되며 세션 수명 동안만 유효합니다. 메모리 주소가
/// 아닌 명시적 식별자이므로 세션 수명 밖에서 재사용될 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    /// 새 세션 식별자를 생성합니다.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
