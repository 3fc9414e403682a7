//! Deferred list with two-phase add/remove
//!
//! Systems iterate these lists by index while other systems stage changes
//! to the same lists. Nothing structural happens until `commit`, which the
//! world runs exactly once per frame:
//! 1. Destroyed items are compacted out (survivors keep their order)
//! 2. Staged items are appended in submission order
//!
//! Until then a removed item stays physically present with its
//! `destroyed` flag set, and every system skips it explicitly.

use std::ops::{Index, IndexMut};

/// An item that can be marked for removal from a [`DeferredList`]
pub trait Deferred {
    fn is_destroyed(&self) -> bool;
    /// Mark pending removal. Never undone.
    fn mark_destroyed(&mut self);
}

/// Outcome of a single commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub removed: usize,
    pub added: usize,
}

/// Ordered container with delayed structural mutation
#[derive(Debug, Clone)]
pub struct DeferredList<T> {
    items: Vec<T>,
    staged: Vec<T>,
    remove_dirty: bool,
}

impl<T> Default for DeferredList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            staged: Vec::new(),
            remove_dirty: false,
        }
    }
}

impl<T: Deferred> DeferredList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an item. Invisible to iteration until the next commit.
    pub fn delay_add(&mut self, item: T) {
        self.staged.push(item);
    }

    /// Mark the item at `index` destroyed. Calling it again is harmless.
    pub fn delay_remove(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.mark_destroyed();
            self.remove_dirty = true;
        }
    }

    /// Mark every committed item matching `pred`. Returns how many matched.
    pub fn delay_remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut marked = 0;
        for item in self.items.iter_mut() {
            if pred(&*item) {
                item.mark_destroyed();
                marked += 1;
            }
        }
        if marked > 0 {
            self.remove_dirty = true;
        }
        marked
    }

    /// Apply staged removals then staged additions
    pub fn commit(&mut self) -> CommitStats {
        let mut stats = CommitStats::default();

        if self.remove_dirty {
            let before = self.items.len();
            // Stable partition: survivors move left in order, the tail is dropped
            self.items.retain(|item| !item.is_destroyed());
            stats.removed = before - self.items.len();
            self.remove_dirty = false;
        }

        if !self.staged.is_empty() {
            stats.added = self.staged.len();
            self.items.append(&mut self.staged);
        }

        stats
    }

    /// Committed items that are not pending removal
    pub fn iter_live(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| !item.is_destroyed())
    }
}

impl<T> DeferredList<T> {
    /// Number of committed items, destroyed ones included
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items waiting for the next commit
    #[inline]
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Two disjoint mutable borrows. `None` if `a == b` or either is out of range.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        if a == b || a >= self.items.len() || b >= self.items.len() {
            return None;
        }
        if a < b {
            let (left, right) = self.items.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.items.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }
}

impl<T> Index<usize> for DeferredList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for DeferredList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T: Deferred> FromIterator<T> for DeferredList<T> {
    /// Collects straight into the committed items
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            staged: Vec::new(),
            remove_dirty: false,
        }
    }
}
