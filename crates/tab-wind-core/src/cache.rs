//! Per-tab embedding cache.
//!
//! Maps a tab id to the vector computed for it and the fingerprint of the
//! text that produced the vector. A lookup only hits when the stored
//! fingerprint equals the tab's current one; a mismatch is a miss and the
//! caller overwrites the entry with a fresh embedding.
//!
//! The cache is unbounded by default. Callers that know when tabs close
//! should call [`EmbeddingCache::evict`] or [`EmbeddingCache::retain`];
//! callers that do not can set a capacity, in which case the least
//! recently used entry is dropped on overflow.
//!
//! The lock is never held across an `.await`. Overlapping ranking calls
//! may race on the same tab id; the last writer wins.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use crate::models::TabId;

struct CacheEntry {
    vector: Arc<[f32]>,
    fingerprint: String,
}

pub struct EmbeddingCache {
    entries: Mutex<LruCache<TabId, CacheEntry>>,
}

impl EmbeddingCache {
    /// Create a cache. `None` means no capacity limit.
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        let entries = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<TabId, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached vector if its fingerprint matches.
    pub fn lookup(&self, tab_id: TabId, fingerprint: &str) -> Option<Arc<[f32]>> {
        let mut entries = self.lock();
        match entries.get(&tab_id) {
            Some(entry) if entry.fingerprint == fingerprint => Some(entry.vector.clone()),
            _ => None,
        }
    }

    /// Insert or overwrite the entry for `tab_id`.
    pub fn store(&self, tab_id: TabId, vector: Arc<[f32]>, fingerprint: String) {
        self.lock().put(
            tab_id,
            CacheEntry {
                vector,
                fingerprint,
            },
        );
    }

    /// Drop the entry for a closed tab. Returns `true` if one existed.
    pub fn evict(&self, tab_id: TabId) -> bool {
        self.lock().pop(&tab_id).is_some()
    }

    /// Keep only entries whose tab id is in `live`. Returns how many were dropped.
    pub fn retain(&self, live: &HashSet<TabId>) -> usize {
        let mut entries = self.lock();
        let stale: Vec<TabId> = entries
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !live.contains(id))
            .collect();
        for id in &stale {
            entries.pop(id);
        }
        stale.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.lock().contains(&tab_id)
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(None)
    }
}
