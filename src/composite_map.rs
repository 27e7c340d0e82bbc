//! A generic map keyed by an ordered tuple of sub-keys.
//!
//! Built as a trie of nested single-key maps, one level per tuple position.
//! The leaf-vs-submap distinction is an explicit node enum, so no runtime
//! type inspection is involved. All keys stored in one map are expected to
//! share a tuple length; `set` replaces a leaf with a branch (or vice versa)
//! if a caller mixes lengths.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// One trie node: either an intermediate level or a stored value.
#[derive(Clone, Debug)]
enum Slot<K, V> {
    Branch(FxHashMap<K, Slot<K, V>>),
    Leaf(V),
}

/// Map from an ordered tuple of sub-keys to a value.
#[derive(Clone, Debug)]
pub struct CompositeMap<K, V> {
    root: FxHashMap<K, Slot<K, V>>,
}

impl<K: Eq + Hash + Copy, V> CompositeMap<K, V> {
    pub fn new() -> Self {
        Self {
            root: FxHashMap::default(),
        }
    }

    /// Look up the value stored at the full tuple.
    /// Absent prefixes resolve to None without creating levels.
    pub fn get(&self, key: &[K]) -> Option<&V> {
        let (last, prefix) = key.split_last()?;
        let mut cursor = &self.root;
        for subkey in prefix {
            match cursor.get(subkey) {
                Some(Slot::Branch(next)) => cursor = next,
                _ => return None,
            }
        }
        match cursor.get(last) {
            Some(Slot::Leaf(value)) => Some(value),
            _ => None,
        }
    }

    /// Mutable lookup, same resolution rules as `get`.
    pub fn get_mut(&mut self, key: &[K]) -> Option<&mut V> {
        let (last, prefix) = key.split_last()?;
        let mut cursor = &mut self.root;
        for subkey in prefix {
            match cursor.get_mut(subkey) {
                Some(Slot::Branch(next)) => cursor = next,
                _ => return None,
            }
        }
        match cursor.get_mut(last) {
            Some(Slot::Leaf(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether a value is stored at the full tuple.
    pub fn has(&self, key: &[K]) -> bool {
        self.get(key).is_some()
    }

    /// Store a value at the tuple, creating intermediate levels on demand.
    ///
    /// Panics on an empty key.
    pub fn set(&mut self, key: &[K], value: V) {
        let (last, prefix) = key
            .split_last()
            .expect("composite key must have at least one sub-key");
        let mut cursor = &mut self.root;
        for subkey in prefix {
            let slot = cursor
                .entry(*subkey)
                .or_insert_with(|| Slot::Branch(FxHashMap::default()));
            if !matches!(slot, Slot::Branch(_)) {
                *slot = Slot::Branch(FxHashMap::default());
            }
            match slot {
                Slot::Branch(next) => cursor = next,
                Slot::Leaf(_) => unreachable!("slot was just made a branch"),
            }
        }
        cursor.insert(*last, Slot::Leaf(value));
    }

    /// Remove and return the value stored at the tuple.
    ///
    /// Only the leaf is removed; intermediate levels emptied by the removal
    /// are left in place.
    pub fn remove(&mut self, key: &[K]) -> Option<V> {
        let (last, prefix) = key.split_last()?;
        let mut cursor = &mut self.root;
        for subkey in prefix {
            match cursor.get_mut(subkey) {
                Some(Slot::Branch(next)) => cursor = next,
                _ => return None,
            }
        }
        if !matches!(cursor.get(last), Some(Slot::Leaf(_))) {
            return None;
        }
        match cursor.remove(last) {
            Some(Slot::Leaf(value)) => Some(value),
            _ => None,
        }
    }

    /// Depth-first iterator over every full tuple paired with its value.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            stack: vec![self.root.iter()],
            prefix: Vec::new(),
        }
    }

    /// Number of stored values. Walks the whole trie.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn clear(&mut self) {
        self.root.clear();
    }
}

impl<K: Eq + Hash + Copy, V> Default for CompositeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator state for `CompositeMap::entries`.
pub struct Entries<'a, K, V> {
    stack: Vec<std::collections::hash_map::Iter<'a, K, Slot<K, V>>>,
    prefix: Vec<K>,
}

impl<'a, K: Copy, V> Iterator for Entries<'a, K, V> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some((subkey, Slot::Leaf(value))) => {
                    let mut key = self.prefix.clone();
                    key.push(*subkey);
                    return Some((key, value));
                }
                Some((subkey, Slot::Branch(next))) => {
                    self.prefix.push(*subkey);
                    self.stack.push(next.iter());
                }
                None => {
                    self.stack.pop();
                    self.prefix.pop();
                }
            }
        }
    }
}
