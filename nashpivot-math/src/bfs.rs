//! Sparse basic feasible solutions keyed by signed label.

use crate::basis::Label;
use rustc_hash::FxHashMap;

/// A basic feasible solution, recorded label by label.
///
/// Equality compares the key sets only: two solutions reached along
/// different search branches are considered the same whenever the same
/// set of variables is basic, which is the deduplication rule of the
/// all-equilibria search.
#[derive(Debug, Clone, Default)]
pub struct Bfs<V> {
    values: FxHashMap<Label, V>,
}

impl<V> Bfs<V> {
    /// Empty solution.
    pub fn new() -> Self {
        Self {
            values: FxHashMap::default(),
        }
    }

    /// Record `label` at `value`.
    pub fn insert(&mut self, label: Label, value: V) {
        self.values.insert(label, value);
    }

    /// Value of `label`, if basic.
    pub fn get(&self, label: Label) -> Option<&V> {
        self.values.get(&label)
    }

    /// Whether `label` is recorded.
    pub fn contains(&self, label: Label) -> bool {
        self.values.contains_key(&label)
    }

    /// Number of recorded labels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no label is recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(label, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &V)> {
        self.values.iter().map(|(&label, value)| (label, value))
    }
}

impl<V> PartialEq for Bfs<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self.values.keys().all(|k| other.values.contains_key(k))
    }
}

impl<V> Eq for Bfs<V> {}
