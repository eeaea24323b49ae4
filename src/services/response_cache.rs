//! Time-boxed in-memory response cache.
//!
//! Each gateway read-by-key operation consults one of these before touching
//! the network. Entries are only ever superseded by a newer successful
//! fetch. There is no eviction; expired entries simply stop being
//! served until overwritten. The key space (search queries × usernames) is
//! small relative to an app session, so unbounded growth is accepted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// How long a cached payload stays valid, in milliseconds.
pub const CACHE_TTL_MS: i64 = 300_000;

/// Clock used to stamp and validate entries. Injected so tests control
/// freshness deterministically.
pub type CacheClock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Returns a clock reading the system time in epoch milliseconds.
pub fn system_clock() -> CacheClock {
    Arc::new(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    })
}

/// A memoized query result with its fetch timestamp.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    fetched_at_ms: i64,
}

/// A per-payload-type cache map guarded by a mutex.
///
/// The gateway instance is shared between search screens and the assistant,
/// so the maps need the lock even though each call site issues its requests
/// sequentially.
pub struct ResponseCache<T: Clone> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl_ms: i64,
    clock: CacheClock,
}

impl<T: Clone> ResponseCache<T> {
    /// Creates a cache with the given TTL, stamped by the system clock.
    pub fn new(ttl_ms: i64) -> Self {
        Self::with_clock(ttl_ms, system_clock())
    }

    /// Creates a cache with an injected clock (tests).
    pub fn with_clock(ttl_ms: i64, clock: CacheClock) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_ms,
            clock,
        }
    }

    /// Returns the payload for `key` if a valid (unexpired) entry exists.
    ///
    /// An entry is valid iff `now - fetched_at < ttl`. Expired entries are
    /// left in place; they are superseded by the next `insert`.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = (self.clock)();
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|e| now - e.fetched_at_ms < self.ttl_ms)
            .map(|e| e.payload.clone())
    }

    /// Stores `payload` under `key`, stamped with the current clock value.
    /// Overwrites any prior entry for the key.
    pub fn insert(&self, key: &str, payload: T) {
        let now = (self.clock)();
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                CacheEntry {
                    payload,
                    fetched_at_ms: now,
                },
            );
        }
    }

    /// Number of entries held, valid or expired.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
