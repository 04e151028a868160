//! Process-lifetime subtitle cache
//!
//! Keyed by `<title>-<episode>`. Entries are never evicted; only non-empty
//! results are stored so a failed resolution is retried on the next request.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::SubtitleTrack;

/// Backing storage for [`SubtitleCache`]
pub trait SubtitleStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<SubtitleTrack>>;
    fn set(&self, key: String, tracks: Vec<SubtitleTrack>);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory map
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<SubtitleTrack>>>,
}

// A panic mid-insert leaves the map itself intact, so poisoning is ignored
impl SubtitleStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<SubtitleTrack>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: String, tracks: Vec<SubtitleTrack>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, tracks);
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Shared handle to a subtitle store; clones see the same entries
#[derive(Clone)]
pub struct SubtitleCache {
    store: Arc<dyn SubtitleStore>,
}

impl SubtitleCache {
    /// Cache over an in-memory map
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    /// Cache over custom storage
    pub fn with_store(store: impl SubtitleStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<SubtitleTrack>> {
        self.store.get(key)
    }

    /// Store tracks for a key; empty lists are ignored
    pub fn set(&self, key: impl Into<String>, tracks: Vec<SubtitleTrack>) {
        if !tracks.is_empty() {
            self.store.set(key.into(), tracks);
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for SubtitleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> SubtitleTrack {
        SubtitleTrack {
            id: id.to_string(),
            url: id.to_string(),
            language_code: "spa".to_string(),
            label: "Spanish (KissKH)".to_string(),
        }
    }

    #[test]
    fn test_get_after_set() {
        let cache = SubtitleCache::new();
        assert!(cache.get("Show A-1").is_none());

        cache.set("Show A-1", vec![track("a"), track("b")]);
        let cached = cache.get("Show A-1").unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].id, "a");
        assert_eq!(cached[1].id, "b");
    }

    #[test]
    fn test_empty_lists_not_cached() {
        let cache = SubtitleCache::new();
        cache.set("Show A-2", Vec::new());
        assert!(cache.get("Show A-2").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = SubtitleCache::new();
        let other = cache.clone();
        other.set("Show B-3", vec![track("c")]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("Show B-3").is_some());
    }

    #[test]
    fn test_poisoned_store_still_writes() {
        let store = Arc::new(MemoryStore::default());
        let holder = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = holder.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(store.entries.is_poisoned());
        store.set("Show A-4".to_string(), vec![track("d")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Show A-4").unwrap()[0].id, "d");
    }

    #[test]
    fn test_keys_are_distinct_per_episode() {
        let cache = SubtitleCache::new();
        cache.set("Show A-1", vec![track("one")]);
        assert!(cache.get("Show A-10").is_none());
    }
}
