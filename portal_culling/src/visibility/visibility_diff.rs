/// Double-buffered visibility sets.
///
/// Each pass fills `current`, then `commit` reports the difference with the
/// previous pass and swaps the buffers. Both sets keep their allocations.

use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashSet;

/// Previous/current pair of visible sets for one class of item
#[derive(Debug, Clone)]
pub struct VisibilityDiff<K> {
    previous: FxHashSet<K>,
    current: FxHashSet<K>,
}

impl<K: Copy + Eq + Hash> VisibilityDiff<K> {
    pub fn new() -> Self {
        Self { previous: FxHashSet::default(), current: FxHashSet::default() }
    }

    /// Items visible after the last commit
    pub fn visible(&self) -> &FxHashSet<K> {
        &self.previous
    }

    /// Whether `key` was visible after the last commit
    pub fn is_visible(&self, key: &K) -> bool {
        self.previous.contains(key)
    }

    /// Record `key` as visible without a pass (e.g. newly tracked items)
    pub fn mark_visible(&mut self, key: K) {
        self.previous.insert(key);
    }

    /// Stop tracking `key`
    pub fn forget(&mut self, key: &K) {
        self.previous.remove(key);
        self.current.remove(key);
    }

    /// Start a pass: clear and return the current set for filling.
    pub fn begin_pass(&mut self) -> &mut FxHashSet<K> {
        self.current.clear();
        &mut self.current
    }

    /// Report transitions and swap.
    ///
    /// `on_change(key, false)` for items only in the previous set,
    /// `on_change(key, true)` for items only in the current set. Items in
    /// both are not reported. Returns (shown, hidden) counts.
    pub fn commit<F>(&mut self, mut on_change: F) -> (usize, usize)
    where
        F: FnMut(K, bool),
    {
        let mut hidden = 0;
        for key in self.previous.iter().filter(|k| !self.current.contains(*k)) {
            on_change(*key, false);
            hidden += 1;
        }
        let mut shown = 0;
        for key in self.current.iter().filter(|k| !self.previous.contains(*k)) {
            on_change(*key, true);
            shown += 1;
        }
        mem::swap(&mut self.previous, &mut self.current);
        (shown, hidden)
    }

    /// Forget both sets
    pub fn clear(&mut self) {
        self.previous.clear();
        self.current.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for VisibilityDiff<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "visibility_diff_tests.rs"]
mod tests;
