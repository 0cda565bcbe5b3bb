//! 구독 레지스트리.
//!
//! 클라이언트와 심볼 간 양방향 구독 매핑 및 클라이언트별 송신 채널 관리.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use stockcast_core::{ClientId, FeedError, TrackedSymbols};

use crate::messages::PriceUpdate;

/// 클라이언트별 갱신 메시지 송신 큐 용량.
///
/// 가득 찬 큐는 느리거나 끊긴 클라이언트로 간주되어 연결이 정리됩니다.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 32;

/// 클라이언트 세션 항목.
#[derive(Debug)]
struct ClientEntry {
    /// 구독 중인 심볼 집합
    symbols: HashSet<String>,
    /// 갱신 메시지 송신 채널
    sender: mpsc::Sender<PriceUpdate>,
}

/// 양방향 구독 매핑.
///
/// 두 맵은 항상 쌍으로 갱신됩니다: (symbol, client) 멤버십이 한쪽에만
/// 존재하는 상태는 관찰될 수 없습니다.
#[derive(Debug, Default)]
struct RegistryInner {
    by_symbol: HashMap<String, HashSet<ClientId>>,
    clients: HashMap<ClientId, ClientEntry>,
}

/// 구독 레지스트리.
///
/// 연결 세션과 가격 갱신 루프가 공유하는 유일한 가변 상태입니다. 모든
/// 변경은 내부 mutex로 직렬화되며, lock은 await를 가로지르지 않습니다.
pub struct SubscriptionRegistry {
    tracked: TrackedSymbols,
    max_subscriptions: usize,
    inner: Mutex<RegistryInner>,
}

impl SubscriptionRegistry {
    /// 새 레지스트리를 생성합니다.
    pub fn new(tracked: TrackedSymbols, max_subscriptions: usize) -> Self {
        Self {
            tracked,
            max_subscriptions,
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// 새 클라이언트 세션 등록.
    ///
    /// 빈 관심 집합과 송신 채널을 기록합니다. 이미 등록된 ClientId면
    /// 실패합니다.
    pub fn register(
        &self,
        client_id: ClientId,
        sender: mpsc::Sender<PriceUpdate>,
    ) -> Result<(), FeedError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.clients.contains_key(&client_id) {
            return Err(FeedError::ClientAlreadyRegistered(client_id));
        }
        inner.clients.insert(
            client_id,
            ClientEntry {
                symbols: HashSet::new(),
                sender,
            },
        );
        Ok(())
    }

    /// 클라이언트 세션 제거.
    ///
    /// 양쪽 매핑과 송신 채널을 함께 제거합니다. 세션 종료 경로와 갱신
    /// 루프의 전송 실패 경로가 모두 호출할 수 있으므로 멱등합니다.
    /// 실제로 제거가 일어났는지 여부를 반환합니다.
    pub fn remove(&self, client_id: ClientId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.clients.remove(&client_id) else {
            return false;
        };
        for symbol in &entry.symbols {
            if let Some(subscribers) = inner.by_symbol.get_mut(symbol) {
                subscribers.remove(&client_id);
                if subscribers.is_empty() {
                    inner.by_symbol.remove(symbol);
                }
            }
        }
        true
    }

    /// 심볼 구독.
    ///
    /// 추적하지 않는 심볼, 중복 구독, 한도 초과는 모두 거부됩니다. 호출
    /// 측은 이 에러를 클라이언트에 노출하지 않습니다. 심볼은 대문자로
    /// 정규화됩니다.
    pub fn subscribe(&self, client_id: ClientId, symbol: &str) -> Result<(), FeedError> {
        let symbol = symbol.trim().to_uppercase();
        if !self.tracked.contains(&symbol) {
            return Err(FeedError::InvalidSymbol(symbol));
        }

        let mut inner = self.inner.lock().unwrap();
        {
            let Some(entry) = inner.clients.get_mut(&client_id) else {
                return Err(FeedError::UnknownClient(client_id));
            };
            if entry.symbols.contains(&symbol) {
                // 중복 구독은 멱등 no-op
                return Ok(());
            }
            if entry.symbols.len() >= self.max_subscriptions {
                return Err(FeedError::SubscriptionLimit {
                    limit: self.max_subscriptions,
                });
            }
            entry.symbols.insert(symbol.clone());
        }
        inner.by_symbol.entry(symbol).or_default().insert(client_id);
        Ok(())
    }

    /// 심볼 구독 해제.
    ///
    /// 구독 중이 아니면 no-op입니다.
    pub fn unsubscribe(&self, client_id: ClientId, symbol: &str) {
        let symbol = symbol.trim().to_uppercase();
        let mut inner = self.inner.lock().unwrap();
        let removed = inner
            .clients
            .get_mut(&client_id)
            .map(|entry| entry.symbols.remove(&symbol))
            .unwrap_or(false);
        if removed {
            if let Some(subscribers) = inner.by_symbol.get_mut(&symbol) {
                subscribers.remove(&client_id);
                if subscribers.is_empty() {
                    inner.by_symbol.remove(&symbol);
                }
            }
        }
    }

    /// 심볼 구독자의 시점 스냅샷.
    ///
    /// 전송은 느릴 수 있으므로 lock 밖에서 순회할 수 있도록 송신 채널을
    /// 복제해 반환합니다. 스냅샷 이후의 구독 변경/제거는 반환된 목록에
    /// 반영되지 않습니다.
    pub fn subscribers_of(&self, symbol: &str) -> Vec<(ClientId, mpsc::Sender<PriceUpdate>)> {
        let inner = self.inner.lock().unwrap();
        let Some(subscribers) = inner.by_symbol.get(symbol) else {
            return Vec::new();
        };
        subscribers
            .iter()
            .filter_map(|id| inner.clients.get(id).map(|entry| (*id, entry.sender.clone())))
            .collect()
    }

    /// 등록된 클라이언트 수.
    pub fn client_count(&self) -> usize {
        self.inner.lock().unwrap().clients.len()
    }

    /// 클라이언트의 구독 수.
    pub fn subscription_count(&self, client_id: ClientId) -> usize {
        self.inner
            .lock()
            .unwrap()
            .clients
            .get(&client_id)
            .map(|entry| entry.symbols.len())
            .unwrap_or(0)
    }

    /// 클라이언트가 심볼을 구독 중인지 확인.
    pub fn is_subscribed(&self, client_id: ClientId, symbol: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .clients
            .get(&client_id)
            .map(|entry| entry.symbols.contains(symbol))
            .unwrap_or(false)
    }
}

/// 공유 가능한 레지스트리 타입.
pub type SharedRegistry = Arc<SubscriptionRegistry>;

/// 새로운 공유 레지스트리 생성.
pub fn create_registry(tracked: TrackedSymbols, max_subscriptions: usize) -> SharedRegistry {
    Arc::new(SubscriptionRegistry::new(tracked, max_subscriptions))
}
