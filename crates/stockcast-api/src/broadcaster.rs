//! 가격 갱신 루프.
//!
//! 주기 타이머에 맞춰 추적 심볼의 새 가격을 얻고, 저장소를 갱신한 뒤 해당
//! 심볼 구독자에게 갱신 메시지를 전달합니다. 개별 심볼의 조회 실패나
//! 클라이언트 전송 실패는 루프를 중단시키지 않으며, 루프는 취소 토큰으로만
//! 종료됩니다.

use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockcast_core::{FeedError, FeedMode};
use stockcast_quote::QuoteSource;

use crate::messages::PriceUpdate;
use crate::registry::SharedRegistry;
use crate::store::PriceStore;

/// 가격 갱신 루프.
pub struct PriceBroadcaster {
    registry: SharedRegistry,
    store: PriceStore,
    source: Box<dyn QuoteSource>,
    mode: FeedMode,
    period: Duration,
}

impl PriceBroadcaster {
    /// 새 갱신 루프를 생성합니다.
    ///
    /// `store`는 모든 추적 심볼이 시드된 상태여야 합니다.
    pub fn new(
        registry: SharedRegistry,
        store: PriceStore,
        source: Box<dyn QuoteSource>,
        mode: FeedMode,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            source,
            mode,
            period,
        }
    }

    /// 가격 저장소에 대한 읽기 접근.
    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    /// 루프 실행.
    ///
    /// 취소 토큰이 취소될 때까지 주기마다 한 틱을 수행합니다. 취소되면
    /// 진행 중인 전송을 기다리지 않고 즉시 종료합니다.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            source = self.source.name(),
            mode = %self.mode,
            period_secs = self.period.as_secs(),
            "Price broadcaster started"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Price broadcaster stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// 한 틱 수행: 심볼별 시세 조회, 저장소 갱신, 구독자 전달.
    ///
    /// 심볼별 조회는 독립적인 I/O이므로 동시에 실행하여 틱 전체 지연을
    /// 한 번의 조회 시간으로 묶습니다.
    pub async fn tick(&mut self) {
        let symbols = self.store.symbols();

        let fetches = symbols.iter().map(|symbol| {
            let previous = self.store.get(symbol).unwrap_or_default();
            let source = &self.source;
            async move { (symbol.clone(), source.fetch_price(symbol, previous).await) }
        });
        let results = join_all(fetches).await;

        for (symbol, result) in results {
            match result {
                Ok(price) => self.publish(&symbol, price),
                Err(e) => {
                    // 조회에 실패한 심볼은 이번 틱에서 건너뛴다. 저장소도
                    // 구독자도 건드리지 않는다.
                    warn!(
                        symbol = %symbol,
                        error = %e,
                        retryable = e.is_retryable(),
                        "Quote fetch failed, skipping symbol this tick"
                    );
                }
            }
        }
    }

    /// 저장소를 갱신하고 해당 심볼의 구독자에게 전달합니다.
    fn publish(&mut self, symbol: &str, new_price: Decimal) {
        let new_price = new_price.round_dp(2);
        let change = self.store.update(symbol, new_price);

        let update = PriceUpdate {
            ticker: symbol.to_string(),
            price: new_price,
            change,
            mode: self.mode,
        };

        let subscribers = self.registry.subscribers_of(symbol);
        if subscribers.is_empty() {
            return;
        }

        debug!(
            symbol = %symbol,
            price = %new_price,
            change = %change,
            subscribers = subscribers.len(),
            "Publishing update"
        );

        for (client_id, sender) in subscribers {
            // 가득 찬 큐는 느린 클라이언트, 닫힌 큐는 끊긴 클라이언트.
            // 어느 쪽이든 해당 클라이언트만 정리하고 나머지 전송은 계속한다.
            if sender.try_send(update.clone()).is_err() {
                let err = FeedError::ClientSend(client_id);
                warn!(symbol = %symbol, error = %err, "Removing client after send failure");
                self.registry.remove(client_id);
            }
        }
    }
}
