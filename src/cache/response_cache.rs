use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::damage::{AngleType, DamageType};

use super::fingerprint::cache_key;

/// Time source for entry stamping and expiry checks. Injected so tests can
/// advance time without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub const DEFAULT_TTL_HOURS: i64 = 24;

/// A memoized generation result. Callers receive clones; the cache keeps
/// exclusive ownership of the stored entry.
#[derive(Debug, Clone)]
pub struct CachedGeneration {
    pub image: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory, TTL-bounded memoization of generation results.
///
/// Keys combine a weak structural fingerprint of the source image with the
/// damage type, instruction text, and angle. Entries live for the TTL and are
/// evicted lazily on lookup or by [`sweep_expired`](Self::sweep_expired).
/// Nothing is persisted; the table vanishes with the process.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CachedGeneration>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_clock(Duration::hours(DEFAULT_TTL_HOURS), Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Looks up a prior result for the given request fields. An expired entry
    /// is removed as a side effect and reported as a miss.
    pub fn get(
        &self,
        image: &str,
        damage: DamageType,
        instruction: &str,
        angle: Option<AngleType>,
    ) -> Option<CachedGeneration> {
        let key = cache_key(image, damage, instruction, angle);
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(&key) {
            Some(entry) if now.signed_duration_since(entry.created_at) < self.ttl => {
                Some(entry.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Inserts or overwrites the entry for the given request fields, stamped
    /// with the current time.
    pub fn set(
        &self,
        image: &str,
        damage: DamageType,
        instruction: &str,
        angle: Option<AngleType>,
        generated_image: &str,
        prompt: &str,
    ) {
        let key = cache_key(image, damage, instruction, angle);
        let entry = CachedGeneration {
            image: generated_image.to_string(),
            prompt: prompt.to_string(),
            created_at: self.clock.now(),
        };
        self.lock().insert(key, entry);
    }

    /// Removes every entry older than the TTL. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.signed_duration_since(entry.created_at) < self.ttl);
        before - entries.len()
    }

    /// Drops all entries (full state reset).
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedGeneration>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs [`ResponseCache::sweep_expired`] on a recurring interval for the
/// lifetime of the process. The sweep shares only the map lock with request
/// handling and never blocks a concurrent `get`/`set` beyond it.
pub fn spawn_sweeper(
    cache: Arc<ResponseCache>,
    period: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.sweep_expired();
            if removed > 0 {
                debug!(removed, "swept expired cache entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct ManualClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: StdMutex::new(Utc::now()),
            })
        }

        fn advance(&self, delta: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn cache_with_clock() -> (Arc<ManualClock>, ResponseCache) {
        let clock = ManualClock::new();
        let cache = ResponseCache::with_clock(Duration::hours(DEFAULT_TTL_HOURS), clock.clone());
        (clock, cache)
    }

    #[test]
    fn hit_within_ttl() {
        let (clock, cache) = cache_with_clock();
        cache.set(IMAGE, DamageType::Rust, "", None, "data:image/png;base64,OUT", "prompt");

        clock.advance(Duration::hours(23));
        let hit = cache.get(IMAGE, DamageType::Rust, "", None).unwrap();
        assert_eq!(hit.image, "data:image/png;base64,OUT");
        assert_eq!(hit.prompt, "prompt");
    }

    #[test]
    fn expired_lookup_misses_and_evicts() {
        let (clock, cache) = cache_with_clock();
        cache.set(IMAGE, DamageType::Rust, "", None, "out", "prompt");

        clock.advance(Duration::hours(24));
        assert!(cache.get(IMAGE, DamageType::Rust, "", None).is_none());
        // Eviction happened as a side effect of the lookup.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn differing_fields_do_not_collide() {
        let (_clock, cache) = cache_with_clock();
        cache.set(IMAGE, DamageType::Rust, "", None, "rust-out", "p1");
        cache.set(IMAGE, DamageType::Scratches, "", None, "scratch-out", "p2");

        assert_eq!(cache.len(), 2);
        let hit = cache.get(IMAGE, DamageType::Scratches, "", None).unwrap();
        assert_eq!(hit.image, "scratch-out");
    }

    #[test]
    fn set_overwrites_and_restamps() {
        let (clock, cache) = cache_with_clock();
        cache.set(IMAGE, DamageType::Rust, "", None, "first", "p");

        clock.advance(Duration::hours(23));
        cache.set(IMAGE, DamageType::Rust, "", None, "second", "p");

        // 23h after the overwrite the entry is still fresh.
        clock.advance(Duration::hours(23));
        let hit = cache.get(IMAGE, DamageType::Rust, "", None).unwrap();
        assert_eq!(hit.image, "second");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let (clock, cache) = cache_with_clock();
        cache.set(IMAGE, DamageType::Rust, "", None, "old", "p");

        clock.advance(Duration::hours(20));
        cache.set(IMAGE, DamageType::Scratches, "", None, "fresh", "p");

        clock.advance(Duration::hours(5));
        let removed = cache.sweep_expired();
        assert_eq!(removed, 1);
        assert!(cache.get(IMAGE, DamageType::Rust, "", None).is_none());
        assert!(cache.get(IMAGE, DamageType::Scratches, "", None).is_some());
    }

    #[test]
    fn clear_drops_everything() {
        let (_clock, cache) = cache_with_clock();
        cache.set(IMAGE, DamageType::Rust, "", None, "out", "p");
        cache.set(IMAGE, DamageType::Corrosion, "", None, "out", "p");

        cache.clear();
        assert!(cache.is_empty());
    }
}
