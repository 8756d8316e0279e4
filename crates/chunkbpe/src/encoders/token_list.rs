//! # Versioned Token List
//!
//! An index-based doubly linked list over one chunk's tokens.
//! Node slots are indexed by the byte offset they started at; a merged node
//! keeps the left slot, so slot order is always chain order.

use crate::types::TokenType;

/// Null link.
pub const NONE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Node<T> {
    value: T,
    prev: u32,
    next: u32,
    version: u32,
}

/// A reusable, versioned, index-linked token chain.
///
/// Every mutation of a node bumps its `version`; observers holding an
/// older version can detect that their view of the node is stale.
#[derive(Debug, Clone)]
pub struct TokenList<T: TokenType> {
    nodes: Vec<Node<T>>,
    head: u32,
    tail: u32,
    len: usize,

    /// Bumped on every [`TokenList::reset`].
    chunk_version: u32,
}

impl<T: TokenType> Default for TokenList<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            head: NONE,
            tail: NONE,
            len: 0,
            chunk_version: 0,
        }
    }
}

impl<T: TokenType> TokenList<T> {
    /// Create an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Rebuild the chain from `tokens`.
    ///
    /// Existing node storage is reused; it only grows when `tokens` is
    /// longer than any previous chunk.
    ///
    /// # Panics
    /// If the chain would not be addressable by `u32` indices.
    pub fn reset<I>(
        &mut self,
        tokens: I,
    ) where
        I: IntoIterator<Item = T>,
    {
        self.chunk_version = self.chunk_version.wrapping_add(1);
        let version = self.chunk_version;

        self.nodes.clear();
        self.nodes.extend(tokens.into_iter().enumerate().map(|(idx, value)| {
            let idx = idx as u32;
            Node {
                value,
                prev: idx.wrapping_sub(1),
                next: idx + 1,
                version,
            }
        }));

        let n = self.nodes.len();
        assert!(n < NONE as usize, "chunk too large for u32 node indices");
        self.len = n;
        if n == 0 {
            self.head = NONE;
            self.tail = NONE;
        } else {
            // The first node's `prev` wrapped to NONE already.
            self.nodes[n - 1].next = NONE;
            self.head = 0;
            self.tail = (n - 1) as u32;
        }
    }

    /// Number of live nodes in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node slots, live or dead.
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Allocated slot capacity.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// The head slot, or [`NONE`].
    pub fn head(&self) -> u32 {
        self.head
    }

    /// The tail slot, or [`NONE`].
    pub fn tail(&self) -> u32 {
        self.tail
    }

    /// The current token at a slot.
    #[inline(always)]
    pub fn value(
        &self,
        idx: u32,
    ) -> T {
        self.nodes[idx as usize].value
    }

    /// The predecessor of a slot, or [`NONE`].
    #[inline(always)]
    pub fn prev(
        &self,
        idx: u32,
    ) -> u32 {
        self.nodes[idx as usize].prev
    }

    /// The successor of a slot, or [`NONE`].
    #[inline(always)]
    pub fn next(
        &self,
        idx: u32,
    ) -> u32 {
        self.nodes[idx as usize].next
    }

    /// The current version of a slot.
    #[inline(always)]
    pub fn version(
        &self,
        idx: u32,
    ) -> u32 {
        self.nodes[idx as usize].version
    }

    /// Is the slot still part of the chain?
    pub fn is_live(
        &self,
        idx: u32,
    ) -> bool {
        let Some(node) = self.nodes.get(idx as usize) else {
            return false;
        };
        if node.prev == NONE {
            self.head == idx
        } else {
            self.nodes[node.prev as usize].next == idx
        }
    }

    /// Merge `right` into `left`, giving `left` the token `value`.
    ///
    /// `right` leaves the chain; both slots get a new version so that any
    /// outstanding references to either become detectably stale.
    ///
    /// # Panics
    /// If `right` is not the live successor of `left`.
    #[inline]
    pub fn merge_at(
        &mut self,
        left: u32,
        right: u32,
        value: T,
    ) {
        assert!(
            right != NONE && self.nodes[left as usize].next == right && self.prev(right) == left,
            "merge_at({left}, {right}): slots are not adjacent"
        );

        let right_next = self.nodes[right as usize].next;

        let l = &mut self.nodes[left as usize];
        l.value = value;
        l.next = right_next;
        l.version = l.version.wrapping_add(1);

        if right_next == NONE {
            self.tail = left;
        } else {
            self.nodes[right_next as usize].prev = left;
        }

        let r = &mut self.nodes[right as usize];
        r.prev = NONE;
        r.next = NONE;
        r.version = r.version.wrapping_add(1);

        self.len -= 1;
    }

    /// Walk the chain from head to tail.
    ///
    /// The walk is lazy and restartable; it panics if the chain is longer
    /// than the slot count, which would mean the links are corrupt.
    pub fn walk(&self) -> TokenWalk<'_, T> {
        TokenWalk {
            list: self,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }
}

/// Iterator over the live tokens of a [`TokenList`].
#[derive(Debug, Clone)]
pub struct TokenWalk<'a, T: TokenType> {
    list: &'a TokenList<T>,
    cursor: u32,
    remaining: usize,
}

impl<T: TokenType> Iterator for TokenWalk<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.cursor == NONE {
            return None;
        }
        assert!(self.remaining > 0, "token chain does not terminate");
        self.remaining -= 1;

        let node = &self.list.nodes[self.cursor as usize];
        self.cursor = node.next;
        Some(node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mut list: TokenList<u32> = TokenList::default();
        list.reset([]);
        assert!(list.is_empty());
        assert_eq!(list.head(), NONE);
        assert_eq!(list.tail(), NONE);
        assert_eq!(list.walk().count(), 0);
    }

    #[test]
    fn test_single() {
        let mut list: TokenList<u32> = TokenList::default();
        list.reset([7]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.head(), 0);
        assert_eq!(list.tail(), 0);
        assert_eq!(list.prev(0), NONE);
        assert_eq!(list.next(0), NONE);
        assert!(list.is_live(0));
        assert_eq!(list.walk().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_merge_at() {
        let mut list: TokenList<u32> = TokenList::default();
        list.reset([1, 2, 3, 4]);
        let v = list.version(0);
        assert!((0..4).all(|i| list.version(i) == v));

        // [1, 2, 3, 4] -> [1, 23, 4]
        list.merge_at(1, 2, 23);
        assert_eq!(list.len(), 3);
        assert_eq!(list.walk().collect::<Vec<_>>(), vec![1, 23, 4]);
        assert_eq!(list.next(1), 3);
        assert_eq!(list.prev(3), 1);
        assert!(!list.is_live(2));
        assert_ne!(list.version(1), v);
        assert_ne!(list.version(2), v);
        assert_eq!(list.version(0), v);
        assert_eq!(list.version(3), v);

        // Merge at the tail.
        list.merge_at(1, 3, 234);
        assert_eq!(list.tail(), 1);
        assert_eq!(list.walk().collect::<Vec<_>>(), vec![1, 234]);

        // Merge at the head.
        list.merge_at(0, 1, 1234);
        assert_eq!(list.len(), 1);
        assert_eq!(list.head(), 0);
        assert_eq!(list.tail(), 0);
        assert_eq!(list.walk().collect::<Vec<_>>(), vec![1234]);

        // Walks are restartable.
        assert_eq!(list.walk().collect::<Vec<_>>(), vec![1234]);
    }

    #[test]
    #[should_panic(expected = "slots are not adjacent")]
    fn test_merge_non_adjacent() {
        let mut list: TokenList<u32> = TokenList::default();
        list.reset([1, 2, 3]);
        list.merge_at(0, 2, 9);
    }

    #[test]
    #[should_panic(expected = "slots are not adjacent")]
    fn test_merge_dead_slot() {
        let mut list: TokenList<u32> = TokenList::default();
        list.reset([1, 2, 3]);
        list.merge_at(0, 1, 9);
        list.merge_at(1, 2, 9);
    }

    #[test]
    fn test_reset_reuses_storage() {
        let mut list: TokenList<u16> = TokenList::with_capacity(8);
        list.reset(0..8);
        let first_version = list.version(0);
        let capacity = list.capacity();

        list.reset(10..13);
        assert_eq!(list.capacity(), capacity);
        assert_eq!(list.slots(), 3);
        assert_ne!(list.version(0), first_version);
        assert_eq!(list.walk().collect::<Vec<_>>(), vec![10, 11, 12]);
    }
}
