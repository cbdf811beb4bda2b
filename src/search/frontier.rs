//! Open and closed sets
//!
//! The open list is a plain vector scanned in full on every pop. Entries are
//! never re-sorted: relaxing an entry rewrites it where it stands, and the
//! next scan picks up the new cost.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use super::node::NodeId;

/// A frontier entry
#[derive(Debug, Clone)]
pub struct OpenEntry<K> {
    /// Node in the arena
    pub node: NodeId,
    /// Fingerprint of the node's state
    pub key: K,
    /// Cost copied from the node
    pub cost: f32,
}

/// Where a candidate with a given fingerprint would go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Fingerprint not open yet
    Vacant,
    /// Fingerprint open at this index with a higher cost
    Cheaper(usize),
    /// Fingerprint open at equal or lower cost
    NotCheaper,
}

/// Unordered list of frontier nodes
#[derive(Debug)]
pub struct OpenList<K> {
    entries: Vec<OpenEntry<K>>,
}

impl<K: Eq> OpenList<K> {
    /// Create an empty open list
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry without any duplicate check
    pub fn push(&mut self, node: NodeId, key: K, cost: f32) {
        self.entries.push(OpenEntry { node, key, cost });
    }

    /// Remove and return the cheapest entry.
    ///
    /// Ties go to the lowest index. Removal keeps the remaining entries in
    /// order.
    pub fn pop_min(&mut self) -> Option<OpenEntry<K>> {
        let first = self.entries.first()?;
        let mut best = 0;
        let mut best_cost = first.cost;

        for (i, entry) in self.entries.iter().enumerate().skip(1) {
            if entry.cost < best_cost {
                best_cost = entry.cost;
                best = i;
            }
        }

        Some(self.entries.remove(best))
    }

    /// Position of the entry with the given fingerprint
    #[must_use]
    pub fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|e| &e.key == key)
    }

    /// Look up where a candidate of this cost would land
    #[must_use]
    pub fn slot_for(&self, key: &K, cost: f32) -> Slot {
        match self.position(key) {
            Some(i) if cost < self.entries[i].cost => Slot::Cheaper(i),
            Some(_) => Slot::NotCheaper,
            None => Slot::Vacant,
        }
    }

    /// Point the entry at `index` to a cheaper node, leaving it in place
    pub fn replace(&mut self, index: usize, node: NodeId, cost: f32) {
        let entry = &mut self.entries[index];
        entry.node = node;
        entry.cost = cost;
    }

    /// Entry at a position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OpenEntry<K>> {
        self.entries.get(index)
    }

    /// Number of open entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the open list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq> Default for OpenList<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprints of fully expanded states
#[derive(Debug)]
pub struct ClosedSet<K> {
    visited: FxHashSet<K>,
}

impl<K: Eq + Hash> ClosedSet<K> {
    /// Create an empty closed set
    #[must_use]
    pub fn new() -> Self {
        Self {
            visited: FxHashSet::default(),
        }
    }

    /// Mark a fingerprint as expanded. Returns `false` if it already was.
    pub fn close(&mut self, key: K) -> bool {
        self.visited.insert(key)
    }

    /// Check if a fingerprint has been expanded
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.visited.contains(key)
    }

    /// Number of expanded fingerprints
    #[must_use]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Check if nothing has been expanded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

impl<K: Eq + Hash> Default for ClosedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
