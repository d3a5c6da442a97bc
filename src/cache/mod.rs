// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-network TTL cache for search results, token metadata and health checks
//!
//! Entries are keyed by [`CacheKey`]: the operation, the network and the
//! keccak-256 hash of the operation arguments. Each entry carries its own TTL
//! and is treated as absent (and dropped) once the TTL has elapsed. When the
//! cache is full the oldest inserted entry is evicted.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crossscan::cache::{CacheKey, CacheOperation, ResultCache};
//!
//! let cache = ResultCache::new(1024);
//! let key = CacheKey::new(CacheOperation::Search, Network::Mainnet, query.as_bytes());
//! let result = cache
//!     .get_or_compute(key, || resolve(query), CacheOperation::Search.default_ttl())
//!     .await?;
//! ```

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy_primitives::{keccak256, B256};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::constants::{HEALTH_TTL, SEARCH_RESULT_TTL, TOKEN_METADATA_TTL};
use crate::types::network::Network;

/// What a cached value is the result of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Search,
    TokenMetadata,
    Health,
}

impl CacheOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            CacheOperation::Search => "search",
            CacheOperation::TokenMetadata => "token_metadata",
            CacheOperation::Health => "health",
        }
    }

    /// TTL class of the operation
    pub const fn default_ttl(self) -> Duration {
        match self {
            CacheOperation::Search => SEARCH_RESULT_TTL,
            CacheOperation::TokenMetadata => TOKEN_METADATA_TTL,
            CacheOperation::Health => HEALTH_TTL,
        }
    }
}

/// Deterministic cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: CacheOperation,
    pub network: Network,
    /// keccak-256 of the operation arguments
    pub args_hash: B256,
}

impl CacheKey {
    pub fn new(operation: CacheOperation, network: Network, args: impl AsRef<[u8]>) -> Self {
        Self {
            operation,
            network,
            args_hash: keccak256(args),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.operation.as_str(),
            self.network,
            self.args_hash
        )
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits (fresh entry returned)
    pub hits: u64,
    /// Number of cache misses (absent or expired)
    pub misses: u64,
    /// Number of entries evicted due to size limits
    pub evictions: u64,
    /// Number of entries expired due to TTL
    pub expirations: u64,
    /// Current number of entries in the cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, expirations={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.expirations,
            self.entries,
            self.hit_rate()
        )
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
    /// Insertion order, for deterministic eviction
    seq: u64,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    stats: CacheStats,
    next_seq: u64,
}

impl<V> Default for CacheState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
            next_seq: 0,
        }
    }
}

/// Bounded TTL cache shared by the orchestrator
#[derive(Debug)]
pub struct ResultCache<V> {
    clock: Arc<dyn Clock>,
    max_entries: usize,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> ResultCache<V> {
    /// Creates a cache holding at most `max_entries` values (at least one)
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            max_entries: max_entries.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Returns a fresh value, dropping it if it has expired
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let fresh = state
            .entries
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        match fresh {
            Some(Some(value)) => {
                state.stats.hits += 1;
                debug!(key = %key, "Cache hit");
                Some(value)
            }
            Some(None) => {
                debug!(key = %key, "Cache entry expired");
                state.entries.remove(key);
                state.stats.expirations += 1;
                state.stats.misses += 1;
                state.stats.entries = state.entries.len();
                None
            }
            None => {
                state.stats.misses += 1;
                debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    /// Stores a value, evicting the oldest entries when full
    pub async fn insert(&self, key: CacheKey, value: V, ttl: Duration) {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        if !state.entries.contains_key(&key) {
            while state.entries.len() >= self.max_entries {
                Self::evict_oldest(&mut state);
            }
        }

        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Inserting cache entry");
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                ttl,
                seq,
            },
        );
        state.stats.entries = state.entries.len();
    }

    /// Returns the cached value or runs `compute`, caching only successes.
    ///
    /// The lock is not held while `compute` runs, so two concurrent misses
    /// on the same key both compute.
    pub async fn get_or_compute<E, F, Fut>(
        &self,
        key: CacheKey,
        compute: F,
        ttl: Duration,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }
        let value = compute().await?;
        self.insert(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Drops every entry, or only those of one network. Returns how many were removed.
    pub async fn clear(&self, network: Option<Network>) -> usize {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        match network {
            None => state.entries.clear(),
            Some(network) => state.entries.retain(|key, _| key.network != network),
        }
        state.stats.entries = state.entries.len();
        let removed = before - state.entries.len();
        debug!(?network, removed, "Cleared result cache");
        removed
    }

    /// Number of stored entries, including ones that expired but were not yet accessed
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        self.state.lock().await.stats.clone()
    }

    fn evict_oldest(state: &mut CacheState<V>) {
        let oldest = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.seq)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            debug!(key = %key, "Evicting oldest cache entry");
            state.entries.remove(&key);
            state.stats.evictions += 1;
        }
    }
}
