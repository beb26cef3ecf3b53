use std::collections::{hash_map, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// HashMap which refuses to silently replace or silently miss. Inserting an
/// occupied key or removing a vacant one is a caller bug and panics; use
/// `contains_key` first when the outcome is not known.
pub struct CheckedMap<K: Eq + Hash + Debug, V> {
    inner: HashMap<K, V>,
}

impl<K: Eq + Hash + Debug, V> CheckedMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.inner.get_mut(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.inner.contains_key(&key) {
            panic!(
                "Cannot insert and replace value for key {:?}. Check first.",
                key
            );
        }

        self.inner.insert(key, value);
    }

    pub fn remove(&mut self, key: &K) -> V {
        match self.inner.remove(key) {
            Some(value) => value,
            None => panic!(
                "Cannot remove value for non-existent key {:?}. Check whether map contains key first.",
                key
            ),
        }
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.inner.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Eq + Hash + Debug, V> Default for CheckedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
