use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::clock::{Clock, SystemClock};

/// One hour, shared by every cached operation
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

/// Get-or-compute memo table with a fixed time-to-live.
///
/// Keys compare structurally, so the key should be the full argument tuple of
/// the wrapped call. Expired entries are replaced lazily on the next access;
/// there is no other eviction.
///
/// `compute` runs while the table lock is held. Concurrent callers wait, so
/// at most one computation per cache is ever in flight.
pub struct TtlCache<K, V> {
    name: &'static str,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self::with_clock(name, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));

        Self {
            name,
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the live value for `key`, or run `compute` and store its result.
    ///
    /// Whatever `compute` returns is cached, empty results included.
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();

        if let Some(entry) = entries.get(&key) {
            if now < entry.expires_at {
                debug!(cache = self.name, ?key, "cache hit");
                return entry.value.clone();
            }
            debug!(cache = self.name, ?key, "cache entry expired");
        } else {
            debug!(cache = self.name, ?key, "cache miss");
        }

        let value = compute();
        entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
        value
    }

    /// Number of stored entries, expired ones included until next touched
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
