use std::collections::{HashMap, VecDeque};

use eraline_protocol::SharedStr;

/// Bounded per-entity lookup store (e.g. resolved portrait URLs).
///
/// Owned by whoever performs the lookups and passed explicitly to them.
/// Negative results (`None`) are cached too so failed lookups are not
/// retried. When full, the oldest inserted key is evicted.
#[derive(Debug)]
pub struct LookupStore<V> {
    capacity: usize,
    values: HashMap<SharedStr, Option<V>>,
    order: VecDeque<SharedStr>,
}

impl<V> LookupStore<V> {
    /// A store holding at most `capacity` keys (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// `None` if the key was never resolved, `Some(None)` for a cached miss.
    pub fn get(&self, id: &str) -> Option<Option<&V>> {
        self.values.get(id).map(Option::as_ref)
    }

    pub fn insert(&mut self, id: SharedStr, value: Option<V>) {
        if self.values.insert(id.clone(), value).is_some() {
            return;
        }
        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.values.remove(&oldest);
            }
        }
    }

    /// Forget one key, e.g. after the entity's record was edited.
    pub fn invalidate(&mut self, id: &str) -> bool {
        if self.values.remove(id).is_none() {
            return false;
        }
        self.order.retain(|key| key != &id);
        true
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_hits_and_misses() {
        let mut store = LookupStore::new(4);
        store.insert("curie".into(), Some("https://img/curie.jpg"));
        store.insert("anon".into(), None);
        assert_eq!(store.get("curie"), Some(Some(&"https://img/curie.jpg")));
        assert_eq!(store.get("anon"), Some(None));
        assert_eq!(store.get("kant"), None);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut store = LookupStore::new(2);
        store.insert("a".into(), Some(1));
        store.insert("b".into(), Some(2));
        store.insert("a".into(), Some(10));
        store.insert("c".into(), Some(3));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), Some(Some(&2)));
        assert_eq!(store.get("c"), Some(Some(&3)));
    }

    #[test]
    fn invalidate_and_clear() {
        let mut store = LookupStore::new(3);
        store.insert("a".into(), Some(1));
        store.insert("b".into(), Some(2));
        assert!(store.invalidate("a"));
        assert!(!store.invalidate("a"));
        assert_eq!(store.len(), 1);
        store.insert("c".into(), Some(3));
        store.insert("d".into(), Some(4));
        assert_eq!(store.get("b"), Some(Some(&2)));
        store.clear();
        assert!(store.is_empty());
    }
}
