//! 피드 서비스의 에러 타입.
//!
//! 이 모듈은 피드 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

use crate::types::ClientId;

/// 피드 서비스 에러.
#[derive(Debug, Error)]
pub enum FeedError {
    /// 추적 대상이 아닌 심볼
    #[error("추적하지 않는 심볼: {0}")]
    InvalidSymbol(String),

    /// 클라이언트당 구독 한도 초과
    #[error("구독 한도 초과 (최대 {limit}개)")]
    SubscriptionLimit {
        /// 허용되는 최대 구독 수
        limit: usize,
    },

    /// 이미 등록된 클라이언트
    #[error("이미 등록된 클라이언트: {0}")]
    ClientAlreadyRegistered(ClientId),

    /// 등록되지 않은 클라이언트
    #[error("등록되지 않은 클라이언트: {0}")]
    UnknownClient(ClientId),

    /// 클라이언트 전송 실패
    #[error("클라이언트 전송 실패: {0}")]
    ClientSend(ClientId),

    /// 프로토콜에 맞지 않는 클라이언트 메시지
    #[error("잘못된 메시지 형식: {0}")]
    MalformedMessage(String),

    /// 직렬화 에러
    #[error("직렬화 실패: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 피드 작업을 위한 Result 타입.
pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    /// 프로토콜 경계에서 조용히 무시되는 에러인지 확인합니다.
    ///
    /// 무효 심볼, 구독 한도 초과, 잘못된 메시지는 클라이언트에게 에러로
    /// 통보되지 않고 연결도 유지됩니다.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            FeedError::InvalidSymbol(_)
                | FeedError::SubscriptionLimit { .. }
                | FeedError::MalformedMessage(_)
        )
    }

    /// 클라이언트 정리로 이어지는 에러인지 확인합니다.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, FeedError::ClientSend(_))
    }
}
