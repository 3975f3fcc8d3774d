use fnv::FnvHashMap;
use std::{collections::hash_map::Entry, hash::Hash};

/// Map keyed by an unordered pair: `(a, b)` and `(b, a)` are the same key.
pub struct SymmetricMap<K, T> {
    map: FnvHashMap<(K, K), T>,
}

impl<K: Copy + Eq + Hash + Ord, T> Default for SymmetricMap<K, T> {
    fn default() -> Self {
        SymmetricMap {
            map: FnvHashMap::default(),
        }
    }
}

impl<K: Copy + Eq + Hash + Ord, T> SymmetricMap<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn order_keys(k1: K, k2: K) -> (K, K) {
        if k1 > k2 {
            (k2, k1)
        } else {
            (k1, k2)
        }
    }

    pub fn get(&self, k1: K, k2: K) -> Option<&T> {
        self.map.get(&Self::order_keys(k1, k2))
    }

    /// Keeps the smaller of the existing and the new value.
    pub fn insert_min(&mut self, k1: K, k2: K, value: T)
    where
        T: Ord,
    {
        match self.map.entry(Self::order_keys(k1, k2)) {
            Entry::Occupied(mut e) => {
                if value < *e.get() {
                    e.insert(value);
                }
            }
            Entry::Vacant(e) => {
                e.insert(value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, K, &T)> {
        self.map.iter().map(|((k1, k2), v)| (*k1, *k2, v))
    }
}
