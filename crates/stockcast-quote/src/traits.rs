//! 시세 소스 trait 정의.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::QuoteError;

/// 시세 조회 작업을 위한 Result 타입.
pub type QuoteResult<T> = Result<T, QuoteError>;

/// 심볼의 새 가격을 제공하는 시세 소스.
///
/// 라이브 제공자는 외부 API를 조회하고, 시뮬레이티드 소스는 직전 가격을
/// 기준으로 랜덤워크를 생성합니다. `previous`는 워크의 기준값으로만 쓰이며
/// 라이브 제공자는 무시합니다. 소스는 가격 저장소를 직접 변경하지 않습니다.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 소스 이름 반환.
    fn name(&self) -> &'static str;

    /// 심볼의 새 가격을 조회합니다.
    ///
    /// 반환되는 가격은 소수점 둘째 자리로 반올림되어 있습니다.
    async fn fetch_price(&self, symbol: &str, previous: Decimal) -> QuoteResult<Decimal>;
}
