//! Per-accessor result cache.
//!
//! Holds translated results of zero-argument operations. The cache is
//! bounded: once full, the oldest entry is dropped to make room. A dropped
//! entry looks exactly like one never computed, so callers simply
//! recompute it.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::core::contract::OperationId;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum CacheEntry {
    Value(Value),
    /// The operation translated to null.
    Null,
}

/// Bounded, insertion-ordered memo of operation results.
#[derive(Debug)]
pub struct ResultCache {
    entries: RwLock<IndexMap<OperationId, CacheEntry>>,
    capacity: usize,
}

impl ResultCache {
    /// A cache holding at most `capacity` entries. A capacity of zero
    /// disables caching.
    pub fn new(capacity: usize) -> Self {
        ResultCache {
            entries: RwLock::new(IndexMap::new()),
            capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// The cached result. The outer `None` means "not cached"; `Some(None)`
    /// is a cached null.
    pub fn get(&self, id: &OperationId) -> Option<Option<Value>> {
        self.read().get(id).map(|entry| match entry {
            CacheEntry::Value(v) => Some(v.clone()),
            CacheEntry::Null => None,
        })
    }

    /// Store a result unless one is already present. Returns the result
    /// that ends up cached.
    pub fn insert(&self, id: OperationId, result: Option<Value>) -> Option<Value> {
        if !self.is_enabled() {
            return result;
        }

        let mut entries = self.write();
        if let Some(existing) = entries.get(&id) {
            // Lost the race; both results come from the same inputs.
            return match existing {
                CacheEntry::Value(v) => Some(v.clone()),
                CacheEntry::Null => None,
            };
        }

        while entries.len() >= self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                tracing::trace!(operation = %evicted, "evicted cached result");
            }
        }

        let entry = match &result {
            Some(v) => CacheEntry::Value(v.clone()),
            None => CacheEntry::Null,
        };
        entries.insert(id, entry);
        result
    }

    /// Drop one entry. Returns whether it was cached.
    pub fn invalidate(&self, id: &OperationId) -> bool {
        self.write().shift_remove(id).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<OperationId, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<OperationId, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(name: &str) -> OperationId {
        OperationId::new("Test", name)
    }

    #[test]
    fn test_absent_vs_cached_null() {
        let cache = ResultCache::new(4);
        assert_eq!(cache.get(&id("a")), None);

        cache.insert(id("a"), None);
        assert_eq!(cache.get(&id("a")), Some(None));

        cache.insert(id("b"), Some(Value::I32(1)));
        assert_eq!(cache.get(&id("b")), Some(Some(Value::I32(1))));
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = ResultCache::new(4);
        cache.insert(id("a"), Some(Value::from("first")));
        let kept = cache.insert(id("a"), Some(Value::from("second")));
        assert_eq!(kept, Some(Value::from("first")));
        assert_eq!(cache.get(&id("a")), Some(Some(Value::from("first"))));
    }

    #[test]
    fn test_oldest_entry_is_evicted() {
        let cache = ResultCache::new(2);
        cache.insert(id("a"), Some(Value::I32(1)));
        cache.insert(id("b"), Some(Value::I32(2)));
        cache.insert(id("c"), Some(Value::I32(3)));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&id("a")), None);
        assert!(cache.get(&id("c")).is_some());
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = ResultCache::new(0);
        assert!(!cache.is_enabled());
        cache.insert(id("a"), Some(Value::I32(1)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ResultCache::new(4);
        cache.insert(id("a"), Some(Value::I32(1)));
        cache.insert(id("b"), None);

        assert!(cache.invalidate(&id("a")));
        assert!(!cache.invalidate(&id("a")));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_population() {
        let cache = Arc::new(ResultCache::new(64));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..32 {
                        cache.insert(id(&format!("op{}", i)), Some(Value::I32(t)));
                        assert!(cache.get(&id(&format!("op{}", i))).is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 32);
    }
}
