//! Insertion-ordered map with tombstone removal.
//!
//! The [`OrderedMap`] keeps entries in the order they were inserted, which is
//! what lets a merged dictionary serialize in the same layout as the original
//! file. Removal leaves a tombstone slot behind instead of shifting the
//! surviving entries, so indices held by the lookup table stay valid.
//! Re-inserting a removed key appends a fresh slot at the end.

use std::collections::HashMap;
use std::hash::Hash;

/// An insertion-ordered key/value map with O(1) lookup, append, in-place
/// update, and removal.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    /// Entries in insertion order. `None` marks a removed slot.
    slots: Vec<Option<(K, V)>>,
    /// Key to slot index.
    index: HashMap<K, usize>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the map has no live entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Append a new entry at the end.
    ///
    /// Returns false (and leaves the map unchanged) if the key is already
    /// present; this map never overwrites on insert.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.slots.push(Some((key.clone(), value)));
        self.index.insert(key, self.slots.len() - 1);
        true
    }

    /// Replace the value of an existing entry in place, preserving its
    /// position. Returns false if the key is not present.
    pub fn set(&mut self, key: &K, value: V) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.slots[i] = Some((key.clone(), value));
                true
            }
            None => false,
        }
    }

    /// Remove an entry, leaving a tombstone so later entries keep their
    /// positions. Returns false if the key is not present.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(i) => {
                self.slots[i] = None;
                true
            }
            None => false,
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &K) -> Option<&V> {
        let &i = self.index.get(key)?;
        self.slots[i].as_ref().map(|(_, v)| v)
    }

    /// Returns true if the key has a live entry.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Iterate live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(k, v)| (k, v)))
    }

    /// Iterate live values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let mut map = OrderedMap::new();
        assert!(map.insert(3, "c"));
        assert!(map.insert(1, "a"));
        assert!(map.insert(2, "b"));

        let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 1, 2]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let mut map = OrderedMap::new();
        assert!(map.insert(1, "a"));
        assert!(!map.insert(1, "z"));
        assert_eq!(map.get(&1), Some(&"a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_set_preserves_position() {
        let mut map = OrderedMap::new();
        map.insert(1, "a");
        map.insert(2, "b");
        map.insert(3, "c");

        assert!(map.set(&2, "B"));
        let entries: Vec<(i32, &str)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, vec![(1, "a"), (2, "B"), (3, "c")]);

        assert!(!map.set(&9, "x"));
    }

    #[test]
    fn test_remove_keeps_order_of_survivors() {
        let mut map = OrderedMap::new();
        map.insert(1, "a");
        map.insert(2, "b");
        map.insert(3, "c");

        assert!(map.remove(&2));
        assert!(!map.remove(&2));
        assert!(!map.contains_key(&2));
        assert_eq!(map.get(&2), None);
        assert_eq!(map.len(), 2);

        let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 3]);
    }

    #[test]
    fn test_reinsert_after_remove_appends_at_end() {
        let mut map = OrderedMap::new();
        map.insert(1, "a");
        map.insert(2, "b");
        map.insert(3, "c");
        map.remove(&1);

        assert!(map.insert(1, "A"));
        let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![2, 3, 1]);
        assert_eq!(map.get(&1), Some(&"A"));
    }
}
