//! # Chunk Encoder
//!
//! Greedy BPE over a single chunk: seed a [`TokenList`] with byte tokens,
//! queue every applicable adjacent merge, then repeatedly apply the
//! lowest-rank (leftmost on ties) valid merge until none remain.

use crate::encoders::merge_queue::MergeQueue;
use crate::encoders::token_encoder::TokenEncoder;
use crate::encoders::token_list::{NONE, TokenList};
use crate::types::{TokenType, byte_token};
use crate::vocab::{PairLookupIndex, TokenVocabIndex};
use alloc::sync::Arc;

/// A single-chunk [`TokenEncoder`].
///
/// Owns its [`TokenList`] and [`MergeQueue`], which are cleared and reused
/// between calls rather than reallocated.
#[derive(Debug, Clone)]
pub struct ChunkEncoder<T: TokenType> {
    index: Arc<PairLookupIndex<T>>,
    list: TokenList<T>,
    queue: MergeQueue<T>,
}

impl<T: TokenType> ChunkEncoder<T> {
    /// Construct an encoder over a shared lookup index.
    pub fn new(index: Arc<PairLookupIndex<T>>) -> Self {
        Self::with_capacity(index, 0)
    }

    /// Construct an encoder with scratch space for chunks of `chunk_size` bytes.
    pub fn with_capacity(
        index: Arc<PairLookupIndex<T>>,
        chunk_size: usize,
    ) -> Self {
        Self {
            index,
            list: TokenList::with_capacity(chunk_size),
            queue: MergeQueue::with_capacity(chunk_size),
        }
    }

    /// The shared lookup index.
    pub fn index(&self) -> &Arc<PairLookupIndex<T>> {
        &self.index
    }

    /// Node slot capacity of the scratch token list.
    pub fn list_capacity(&self) -> usize {
        self.list.capacity()
    }

    /// Entry capacity of the scratch candidate queue.
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Queue a merge of `left` with its successor, if a rule applies.
    #[inline(always)]
    fn propose(
        &mut self,
        left: u32,
    ) {
        let right = self.list.next(left);
        if right == NONE {
            return;
        }
        if let Some(rule) = self.index.lookup(self.list.value(left), self.list.value(right)) {
            self.queue.push(&self.list, left, right, rule);
        }
    }

    /// Reset the scratch state for `chunk`.
    fn load_chunk(
        &mut self,
        chunk: &[u8],
    ) {
        self.list.reset(chunk.iter().copied().map(byte_token));
        self.queue.clear();
    }

    /// Seed candidates for the given left slots.
    ///
    /// Seeding order does not affect the result; the queue orders by
    /// ``(rank, left)``.
    fn seed<I>(
        &mut self,
        lefts: I,
    ) where
        I: IntoIterator<Item = u32>,
    {
        for left in lefts {
            self.propose(left);
        }
    }

    /// Apply merges until no valid candidate remains.
    ///
    /// # Returns
    /// The number of merges applied.
    fn run_merges(&mut self) -> usize {
        let mut merges = 0;
        while let Some(candidate) = self.queue.pop_best(&self.list) {
            let left = candidate.left;
            self.list.merge_at(left, candidate.right, candidate.token);
            merges += 1;

            let prev = self.list.prev(left);
            if prev != NONE {
                self.propose(prev);
            }
            self.propose(left);
        }
        merges
    }

    /// Append the final chain to `tokens`.
    fn drain_into(
        &mut self,
        tokens: &mut Vec<T>,
    ) {
        tokens.reserve(self.list.len());
        tokens.extend(self.list.walk());
        self.queue.clear();
    }
}

impl<T: TokenType> TokenVocabIndex<T> for ChunkEncoder<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.index.unordered_tokens_iter()
    }
}

impl<T: TokenType> TokenEncoder<T> for ChunkEncoder<T> {
    fn encode_append(
        &mut self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        match bytes.len() {
            0 => {}
            1 => tokens.push(byte_token(bytes[0])),
            n => {
                self.load_chunk(bytes);
                self.seed(0..(n - 1) as u32);
                self.run_merges();
                self.drain_into(tokens);
            }
        }
    }
}
