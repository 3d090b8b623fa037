//! TTL cache for assembled scan responses.

use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Entry<V> {
    payload: V,
    expires_at: Instant,
}

/// Concurrent response cache keyed by the canonical parameter string of a
/// scan request. Expired entries are evicted lazily on lookup.
pub struct ScanCache<V> {
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
}

impl<V: Clone> ScanCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let hit = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.payload.clone()),
            Some(_) => None,
            None => return None,
        };
        if hit.is_none() {
            self.entries.remove(key);
        }
        hit
    }

    pub fn put(&self, key: String, payload: V) {
        self.entries.insert(
            key,
            Entry {
                payload,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = ScanCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), 42);
        assert_eq!(cache.get("k"), Some(42));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn expired_entries_are_evicted_on_lookup() {
        let cache = ScanCache::new(Duration::ZERO);
        cache.put("k".to_string(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn put_overwrites() {
        let cache = ScanCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), 1);
        cache.put("k".to_string(), 2);
        assert_eq!(cache.get("k"), Some(2));
    }
}
