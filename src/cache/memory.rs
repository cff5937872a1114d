//! In-memory TTL cache over `DashMap`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::LinkCache;
use crate::storage::Link;

struct CacheEntry {
    link: Link,
    /// Entry deadline: insertion time + TTL. Independent of the link's own
    /// `expires_at`.
    deadline: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Shared in-memory cache with per-entry TTL.
///
/// Expired entries are evicted lazily on `get`; the background sweeper
/// bounds memory growth for keys that are never re-accessed. The sweeper is
/// best-effort housekeeping; correctness comes from the expiry check in
/// `get` alone.
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Remove every expired entry. Runs per-shard under DashMap's internal
    /// locks, so concurrent `get`/`insert` calls are only briefly blocked.
    pub fn sweep(&self) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            debug!("MemoryCache: swept {} expired entries", evicted);
        }
    }

    /// Spawn the periodic sweep task. The caller owns the handle and aborts
    /// it at shutdown.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.sweep();
            }
        })
    }
}

#[async_trait]
impl LinkCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Link> {
        // Evict-then-read keeps the shard lock scope small and avoids
        // holding a read guard across the removal.
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        self.entries.get(key).map(|entry| entry.link.clone())
    }

    async fn insert(&self, key: &str, value: Link, ttl: Option<Duration>) {
        let deadline = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                link: value,
                deadline,
            },
        );
    }

    async fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    async fn clear(&self) {
        self.entries.clear();
    }

    async fn size(&self) -> usize {
        self.entries.len()
    }
}
