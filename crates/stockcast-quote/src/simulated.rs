//! 시뮬레이티드 시세 소스.
//!
//! 외부 API 없이 직전 가격에 [-1.00, 1.00] 범위의 랜덤 델타를 더해 새
//! 가격을 생성합니다. 데모 모드와 테스트에서 사용하며 실패하지 않습니다.

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{QuoteResult, QuoteSource};

/// 랜덤워크 시세 생성기.
///
/// 직전 가격 외의 상태를 갖지 않으므로 심볼 간에 공유해도 안전합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedSource;

impl SimulatedSource {
    /// 새 시뮬레이티드 소스를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 직전 가격에서 한 스텝 이동한 가격을 생성합니다.
    fn step(previous: Decimal) -> Decimal {
        let mut rng = rand::thread_rng();
        let delta = Decimal::try_from(rng.gen_range(-1.0..=1.0))
            .unwrap_or(dec!(0))
            .round_dp(2);
        (previous + delta).round_dp(2)
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn fetch_price(&self, _symbol: &str, previous: Decimal) -> QuoteResult<Decimal> {
        Ok(Self::step(previous))
    }
}
