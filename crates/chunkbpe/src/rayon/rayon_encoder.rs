//! # Parallel Chunk Encoder

use crate::encoders::{ChunkEncoder, EncoderOptions, NaiveStreamEncoder, TokenEncoder};
use crate::types::TokenType;
use crate::vocab::{MergeRankVocab, PairLookupIndex, TokenVocabIndex};
use alloc::sync::Arc;
use rayon::prelude::*;

/// Chunk-Level Parallel Encoder.
///
/// Encodes the chunks of one input on the ``rayon`` pool, each worker with
/// its own [`ChunkEncoder`] scratch state; results are collected by chunk
/// index, so the output equals [`NaiveStreamEncoder::encode_stream`].
#[derive(Debug, Clone)]
pub struct ParallelChunkEncoder<T: TokenType> {
    index: Arc<PairLookupIndex<T>>,
    chunk_size: usize,
}

impl<T: TokenType> ParallelChunkEncoder<T> {
    /// Create a new parallel encoder.
    ///
    /// # Panics
    /// If `chunk_size` is zero.
    pub fn new(
        index: Arc<PairLookupIndex<T>>,
        chunk_size: usize,
    ) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        Self { index, chunk_size }
    }

    /// Build a parallel encoder from [`EncoderOptions`].
    pub fn from_options(
        options: EncoderOptions,
        vocab: &MergeRankVocab<T>,
    ) -> anyhow::Result<Self> {
        let index = options.build_index(vocab)?;
        Ok(Self::new(index, options.chunk_size))
    }

    /// The chunk size, in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The shared lookup index.
    pub fn index(&self) -> &Arc<PairLookupIndex<T>> {
        &self.index
    }

    /// Encode `input`, chunks in parallel, output in chunk order.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, input)))]
    pub fn encode_stream<B: AsRef<[u8]>>(
        &self,
        input: B,
    ) -> Vec<T> {
        let chunks: Vec<Vec<T>> = input
            .as_ref()
            .par_chunks(self.chunk_size)
            .map_init(
                || ChunkEncoder::with_capacity(self.index.clone(), self.chunk_size),
                |encoder, chunk| encoder.encode(chunk),
            )
            .collect();
        chunks.concat()
    }

    /// Encode a batch of inputs in parallel; each input is chunked serially.
    pub fn encode_stream_batch<B: AsRef<[u8]> + Sync>(
        &self,
        batch: &[B],
    ) -> Vec<Vec<T>> {
        batch
            .par_iter()
            .map_init(
                || NaiveStreamEncoder::new(self.index.clone(), self.chunk_size),
                |encoder, input| encoder.encode_stream(input),
            )
            .collect()
    }
}

impl<T: TokenType> TokenVocabIndex<T> for ParallelChunkEncoder<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.index.unordered_tokens_iter()
    }
}

impl<T: TokenType> TokenEncoder<T> for ParallelChunkEncoder<T> {
    fn encode_append(
        &mut self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        tokens.extend(self.encode_stream(bytes));
    }

    fn encode_batch<B: AsRef<[u8]>>(
        &mut self,
        batch: &[B],
    ) -> Vec<Vec<T>> {
        // `B` is not required to be `Sync` here; parallelize over chunks instead.
        batch.iter().map(|b| self.encode_stream(b)).collect()
    }
}
