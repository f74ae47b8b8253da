//! Read-through cache for values that rarely change while a beacon node is running.

use core::{future::Future, time::Duration};
use std::sync::Arc;

use anyhow::Result;
use tokio::{sync::RwLock, time::Instant};
use types::phase0::containers::Fork;

use crate::responses::{ChainSpec, DepositContract, Genesis, NodeVersion};

/// A single cached value that goes stale after a fixed time.
///
/// Concurrent callers that find the value missing or stale queue up on the write lock.
/// The first one fetches. The rest find the fresh value once they acquire the lock.
pub struct Cached<T> {
    entry: RwLock<Option<Entry<T>>>,
    ttl: Duration,
}

struct Entry<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

impl<T> Entry<T> {
    fn fresh(&self, ttl: Duration) -> Option<Arc<T>> {
        (self.fetched_at.elapsed() < ttl).then(|| Arc::clone(&self.value))
    }
}

impl<T> Cached<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.peek().await {
            return Ok(value);
        }

        let mut entry = self.entry.write().await;

        if let Some(value) = entry.as_ref().and_then(|entry| entry.fresh(self.ttl)) {
            return Ok(value);
        }

        let value = Arc::new(fetch().await?);

        *entry = Some(Entry {
            value: Arc::clone(&value),
            fetched_at: Instant::now(),
        });

        Ok(value)
    }

    /// Returns the value if it is cached and fresh.
    pub async fn peek(&self) -> Option<Arc<T>> {
        self.entry
            .read()
            .await
            .as_ref()
            .and_then(|entry| entry.fresh(self.ttl))
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}

/// Values served by `/eth/v1/config`, `/eth/v1/beacon/genesis` and `/eth/v1/node/version`.
///
/// Each value has its own lock.
pub struct StaticCache {
    pub genesis: Cached<Genesis>,
    pub spec: Cached<ChainSpec>,
    pub fork_schedule: Cached<Vec<Fork>>,
    pub node_version: Cached<NodeVersion>,
    pub deposit_contract: Cached<DepositContract>,
}

impl StaticCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            genesis: Cached::new(ttl),
            spec: Cached::new(ttl),
            fork_schedule: Cached::new(ttl),
            node_version: Cached::new(ttl),
            deposit_contract: Cached::new(ttl),
        }
    }

    pub async fn invalidate_all(&self) {
        self.genesis.invalidate().await;
        self.spec.invalidate().await;
        self.fork_schedule.invalidate().await;
        self.node_version.invalidate().await;
        self.deposit_contract.invalidate().await;
    }
}
