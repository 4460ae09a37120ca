//! Generic in-memory cache with per-entry expiry.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Time source consulted for entry expiry.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed_millis: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_millis: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = Duration::from_millis(self.elapsed_millis.load(Ordering::SeqCst));
        self.origin.checked_add(elapsed).unwrap_or(self.origin)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Read-mostly map whose entries expire after their TTL.
///
/// Expired entries are evicted lazily on read.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock> {
    /// Creates an empty cache on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K, V> Default for TtlCache<K, V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TtlCache<K, V, C> {
    /// Creates an empty cache on the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the clock driving expiry.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Returns a live entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > self.clock.now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= self.clock.now())
        {
            entries.remove(key);
        }

        None
    }

    /// Stores an entry for `ttl`. A zero TTL stores nothing.
    pub async fn insert(&self, key: K, value: V, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let now = self.clock.now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.entries
            .write()
            .await
            .insert(key, CacheEntry { value, expires_at });
    }

    /// Drops one entry.
    pub async fn remove(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ManualClock, TtlCache};

    fn cache() -> TtlCache<&'static str, u32, ManualClock> {
        TtlCache::with_clock(ManualClock::new())
    }

    #[tokio::test]
    async fn entry_is_served_until_it_expires() {
        let cache = cache();
        cache.insert("answer", 42, Duration::from_secs(60)).await;

        cache.clock().advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"answer").await, Some(42));

        cache.clock().advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"answer").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let cache = cache();
        cache.insert("answer", 42, Duration::ZERO).await;
        assert_eq!(cache.get(&"answer").await, None);
    }

    #[tokio::test]
    async fn remove_and_clear_drop_entries() {
        let cache = cache();
        cache.insert("a", 1, Duration::from_secs(60)).await;
        cache.insert("b", 2, Duration::from_secs(60)).await;

        cache.remove(&"a").await;
        assert_eq!(cache.get(&"a").await, None);
        assert_eq!(cache.get(&"b").await, Some(2));

        cache.clear().await;
        assert_eq!(cache.get(&"b").await, None);
    }
}
