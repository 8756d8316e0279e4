//! # Merge Candidate Queue
//!
//! A min-heap of provisional merges with lazy, version-checked invalidation.
//! Stale entries are never scrubbed eagerly; they are dropped when popped.

use crate::encoders::token_list::TokenList;
use crate::types::{MergeRule, Rank, TokenType};
use core::cmp::{Ordering, Reverse};
use dary_heap::OctonaryHeap;

/// A proposal to merge the node at `left` with its successor `right`.
#[derive(Debug, Clone, Copy)]
pub struct MergeCandidate<T: TokenType> {
    /// Merge priority; lower first.
    pub rank: Rank,

    /// Left slot.
    pub left: u32,

    /// Right slot; the successor of `left` when the candidate was made.
    pub right: u32,

    /// The token the merge produces.
    pub token: T,

    /// Snapshot of the left slot's version.
    pub left_version: u32,

    /// Snapshot of the right slot's version.
    pub right_version: u32,
}

impl<T: TokenType> MergeCandidate<T> {
    /// The heap key.
    ///
    /// Min-heap by rank; ties go to the leftmost slot.
    #[inline(always)]
    pub fn heap_key(&self) -> (Rank, u32) {
        (self.rank, self.left)
    }

    /// Is this candidate still consistent with `list`?
    #[inline(always)]
    pub fn is_valid(
        &self,
        list: &TokenList<T>,
    ) -> bool {
        list.version(self.left) == self.left_version
            && list.version(self.right) == self.right_version
    }
}

impl<T: TokenType> PartialEq for MergeCandidate<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType> Eq for MergeCandidate<T> {}

impl<T: TokenType> PartialOrd for MergeCandidate<T> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType> Ord for MergeCandidate<T> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// Priority queue of [`MergeCandidate`]s.
#[derive(Debug, Clone)]
pub struct MergeQueue<T: TokenType> {
    heap: OctonaryHeap<Reverse<MergeCandidate<T>>>,

    /// Count of popped entries discarded as stale, over the queue's lifetime.
    stale_pops: usize,
}

impl<T: TokenType> Default for MergeQueue<T> {
    fn default() -> Self {
        Self {
            heap: OctonaryHeap::new(),
            stale_pops: 0,
        }
    }
}

impl<T: TokenType> MergeQueue<T> {
    /// Create an empty queue with room for `capacity` candidates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
            stale_pops: 0,
        }
    }

    /// Number of queued entries, including stale ones.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no entries are queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Allocated entry capacity.
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// Total stale entries discarded by [`Self::pop_best`].
    pub fn stale_pops(&self) -> usize {
        self.stale_pops
    }

    /// Drop all entries, keeping the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Reserve room for `additional` more entries.
    pub fn reserve(
        &mut self,
        additional: usize,
    ) {
        self.heap.reserve(additional);
    }

    /// Queue a merge of `left` with `right`, snapshotting both versions.
    #[inline]
    pub fn push(
        &mut self,
        list: &TokenList<T>,
        left: u32,
        right: u32,
        rule: MergeRule<T>,
    ) {
        self.heap.push(Reverse(MergeCandidate {
            rank: rule.rank,
            left,
            right,
            token: rule.token,
            left_version: list.version(left),
            right_version: list.version(right),
        }));
    }

    /// Pop the lowest-rank valid candidate.
    ///
    /// Stale entries encountered on the way are discarded.
    #[inline]
    pub fn pop_best(
        &mut self,
        list: &TokenList<T>,
    ) -> Option<MergeCandidate<T>> {
        while let Some(Reverse(candidate)) = self.heap.pop() {
            if candidate.is_valid(list) {
                return Some(candidate);
            }
            self.stale_pops += 1;
        }
        None
    }
}
