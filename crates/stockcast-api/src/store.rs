//! 가격 저장소.
//!
//! 추적 심볼별 마지막 가격을 유지합니다. 갱신 루프가 단독으로 소유하며
//! 틱마다 심볼당 최대 한 번 갱신됩니다. 외부 읽기 경로가 없으므로 lock이
//! 필요하지 않습니다.

use std::collections::HashMap;

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stockcast_core::TrackedSymbols;

/// 기준 가격. 시드 시점에 심볼마다 ±5 범위의 지터가 더해집니다.
const BASELINE_PRICE: Decimal = dec!(150);

/// 심볼별 마지막 가격 저장소.
#[derive(Debug)]
pub struct PriceStore {
    prices: HashMap<String, Decimal>,
}

impl PriceStore {
    /// 모든 추적 심볼을 기준 가격으로 시드하여 저장소를 생성합니다.
    ///
    /// 갱신 루프의 첫 틱 이전에 호출되며, 이후 추적 심볼에 대한 항목이
    /// 없는 상태는 존재하지 않습니다.
    pub fn seed(tracked: &TrackedSymbols) -> Self {
        let mut rng = rand::thread_rng();
        let prices = tracked
            .iter()
            .map(|symbol| {
                let jitter = Decimal::try_from(rng.gen_range(-5.0..=5.0)).unwrap_or(dec!(0));
                (symbol.to_string(), (BASELINE_PRICE + jitter).round_dp(2))
            })
            .collect();
        Self { prices }
    }

    /// 지터 없이 모든 심볼을 고정 가격으로 시드합니다. 결정적 테스트용.
    pub fn seed_fixed(tracked: &TrackedSymbols, price: Decimal) -> Self {
        let prices = tracked
            .iter()
            .map(|symbol| (symbol.to_string(), price.round_dp(2)))
            .collect();
        Self { prices }
    }

    /// 새 가격을 저장하고 직전 가격 대비 델타를 반환합니다.
    ///
    /// 가격과 델타 모두 소수점 둘째 자리로 반올림됩니다.
    pub fn update(&mut self, symbol: &str, new_price: Decimal) -> Decimal {
        let new_price = new_price.round_dp(2);
        let old = self.prices.get(symbol).copied().unwrap_or(new_price);
        let delta = (new_price - old).round_dp(2);
        self.prices.insert(symbol.to_string(), new_price);
        delta
    }

    /// 심볼의 마지막 가격.
    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }

    /// 저장된 심볼 목록.
    pub fn symbols(&self) -> Vec<String> {
        self.prices.keys().cloned().collect()
    }

    /// 저장된 심볼 수.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
