use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use hpl_types::ContentRef;

struct CacheEntry {
    bytes: Vec<u8>,
    fetched_at: Instant,
}

/// Concurrent TTL cache keyed by content reference.
///
/// Purely an optimization: an expired or missing entry always falls through
/// to a real fetch, and entries are never a correctness source. Concurrent
/// writers race benignly (last writer wins); content addressing makes the
/// competing values identical anyway.
pub struct TtlCache {
    entries: RwLock<HashMap<ContentRef, CacheEntry>>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh bytes for the reference, or `None` on miss/expiry.
    pub fn get(&self, reference: &ContentRef) -> Option<Vec<u8>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(reference)?;
        if entry.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.bytes.clone())
    }

    pub fn insert(&self, reference: ContentRef, bytes: Vec<u8>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                reference,
                CacheEntry {
                    bytes,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    /// Drop one entry, forcing the next fetch to hit the network.
    pub fn invalidate(&self, reference: &ContentRef) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(reference);
        }
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
