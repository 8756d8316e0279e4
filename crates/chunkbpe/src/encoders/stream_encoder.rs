//! # Naive Streaming Encoder
//!
//! Splits input into fixed-size chunks and encodes each chunk
//! independently with a [`ChunkEncoder`].
//!
//! No merge is ever attempted across a chunk boundary. For inputs longer
//! than one chunk the output may differ from a whole-input encode near
//! chunk boundaries; inputs that fit in one chunk encode identically.

use crate::encoders::chunk_encoder::ChunkEncoder;
use crate::encoders::token_encoder::TokenEncoder;
use crate::types::TokenType;
use crate::vocab::{PairLookupIndex, TokenVocabIndex};
use alloc::sync::Arc;

/// Chunked [`TokenEncoder`] with pooled scratch and output buffers.
///
/// An instance must be used by one caller at a time (all encoding takes
/// `&mut self`); provision one encoder per worker for parallel use.
#[derive(Debug, Clone)]
pub struct NaiveStreamEncoder<T: TokenType> {
    chunk_size: usize,
    inner: ChunkEncoder<T>,

    /// Pooled output buffer backing [`Self::encode_stream_ref`].
    output: Vec<T>,
}

impl<T: TokenType> NaiveStreamEncoder<T> {
    /// Construct a stream encoder.
    ///
    /// See [`crate::encoders::EncoderOptions`] for a validating constructor.
    ///
    /// # Panics
    /// If `chunk_size` is zero.
    pub fn new(
        index: Arc<PairLookupIndex<T>>,
        chunk_size: usize,
    ) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        Self {
            chunk_size,
            inner: ChunkEncoder::with_capacity(index, chunk_size),
            output: Vec::new(),
        }
    }

    /// The chunk size, in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The shared lookup index.
    pub fn index(&self) -> &Arc<PairLookupIndex<T>> {
        self.inner.index()
    }

    /// The wrapped chunk encoder.
    pub fn chunk_encoder(&self) -> &ChunkEncoder<T> {
        &self.inner
    }

    /// Capacity of the pooled output buffer.
    pub fn output_capacity(&self) -> usize {
        self.output.capacity()
    }

    /// Encode `input` chunk by chunk, appending to `tokens`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, input, tokens)))]
    pub fn encode_stream_append(
        &mut self,
        input: &[u8],
        tokens: &mut Vec<T>,
    ) {
        for chunk in input.chunks(self.chunk_size) {
            self.inner.encode_append(chunk, tokens);
        }
    }

    /// Encode `input` into the pooled output buffer, and borrow the result.
    ///
    /// This is the zero-copy mode: the returned slice is only valid until
    /// the next call on this encoder. Copy it to keep it longer.
    pub fn encode_stream_ref(
        &mut self,
        input: &[u8],
    ) -> &[T] {
        let mut output = core::mem::take(&mut self.output);
        output.clear();
        self.encode_stream_append(input, &mut output);
        self.output = output;
        &self.output
    }

    /// Encode `input` into a freshly allocated token vector.
    pub fn encode_stream<B: AsRef<[u8]>>(
        &mut self,
        input: B,
    ) -> Vec<T> {
        self.encode_stream_ref(input.as_ref()).to_vec()
    }
}

impl<T: TokenType> TokenVocabIndex<T> for NaiveStreamEncoder<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        self.inner.unordered_tokens_iter()
    }
}

impl<T: TokenType> TokenEncoder<T> for NaiveStreamEncoder<T> {
    fn encode_append(
        &mut self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    ) {
        self.encode_stream_append(bytes, tokens)
    }
}
