//! Read-through cache for resolved links.
//!
//! A pure performance layer: the store stays authoritative, and the whole
//! cache can be cleared at any time without affecting correctness.

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::storage::Link;

/// Cache over link snapshots, keyed by `"link:" + slug`.
///
/// Implementations must be safe under concurrent access from many in-flight
/// requests; each operation is atomic with respect to itself, but there are
/// no cross-operation transactions.
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Fetch a snapshot. An expired entry behaves as a miss and is evicted
    /// lazily on access.
    async fn get(&self, key: &str) -> Option<Link>;

    /// Insert a snapshot. `ttl` overrides the default per insertion.
    async fn insert(&self, key: &str, value: Link, ttl: Option<Duration>);

    /// Drop one entry.
    async fn remove(&self, key: &str);

    /// Drop everything.
    async fn clear(&self);

    /// Number of entries currently held, including not-yet-swept expired
    /// ones.
    async fn size(&self) -> usize;
}

pub use memory::MemoryCache;
