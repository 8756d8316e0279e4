//! # Encoder Options

use crate::encoders::stream_encoder::NaiveStreamEncoder;
use crate::types::TokenType;
use crate::vocab::{DEFAULT_DENSE_BOUND, MergeRankVocab, PairLookupIndex};
use alloc::sync::Arc;

/// Default chunk size, in bytes, for [`NaiveStreamEncoder`].
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Options for [`NaiveStreamEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Maximum bytes per independently encoded chunk.
    pub chunk_size: usize,

    /// Token bound for the dense lookup table.
    pub dense_bound: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            dense_bound: DEFAULT_DENSE_BOUND,
        }
    }
}

impl EncoderOptions {
    /// Create new options.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }

    /// Sets the chunk size.
    ///
    /// # Arguments
    /// * `chunk_size` - bytes per chunk; must be > 0.
    pub fn with_chunk_size(
        self,
        chunk_size: usize,
    ) -> Self {
        Self { chunk_size, ..self }
    }

    /// Sets the dense lookup bound.
    ///
    /// # Arguments
    /// * `dense_bound` - tokens below this use direct table lookups; must be > 0.
    pub fn with_dense_bound(
        self,
        dense_bound: usize,
    ) -> Self {
        Self {
            dense_bound,
            ..self
        }
    }

    /// Validate the options.
    pub fn try_validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be > 0");
        }
        if self.dense_bound == 0 {
            anyhow::bail!("dense_bound must be > 0");
        }
        Ok(())
    }

    /// Build a [`PairLookupIndex`] for `vocab` with these options.
    pub fn build_index<T: TokenType>(
        &self,
        vocab: &MergeRankVocab<T>,
    ) -> anyhow::Result<Arc<PairLookupIndex<T>>> {
        self.try_validate()?;
        Ok(Arc::new(PairLookupIndex::from_vocab_with_bound(
            vocab,
            self.dense_bound,
        )?))
    }

    /// Initializes a [`NaiveStreamEncoder`] over `vocab`.
    pub fn init<T: TokenType>(
        self,
        vocab: &MergeRankVocab<T>,
    ) -> anyhow::Result<NaiveStreamEncoder<T>> {
        let index = self.build_index(vocab)?;
        self.init_with_index(index)
    }

    /// Initializes a [`NaiveStreamEncoder`] over an existing shared index.
    pub fn init_with_index<T: TokenType>(
        self,
        index: Arc<PairLookupIndex<T>>,
    ) -> anyhow::Result<NaiveStreamEncoder<T>> {
        self.try_validate()?;
        log::debug!("init stream encoder: {self:?}, {index:?}");
        Ok(NaiveStreamEncoder::new(index, self.chunk_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::tooling::testing::toy_abc_vocab;

    #[test]
    fn test_builders() {
        let options = EncoderOptions::default();
        assert_eq!(options.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(options.dense_bound, DEFAULT_DENSE_BOUND);

        let options = EncoderOptions::new(16).with_dense_bound(300);
        assert_eq!(
            options,
            EncoderOptions {
                chunk_size: 16,
                dense_bound: 300,
            }
        );
        assert_eq!(options.with_chunk_size(4).chunk_size, 4);
    }

    #[test]
    fn test_validation() {
        let vocab = toy_abc_vocab::<u32>();

        assert_eq!(
            EncoderOptions::new(0).init(&vocab).unwrap_err().to_string(),
            "chunk_size must be > 0"
        );
        assert_eq!(
            EncoderOptions::default()
                .with_dense_bound(0)
                .init(&vocab)
                .unwrap_err()
                .to_string(),
            "dense_bound must be > 0"
        );

        let encoder = EncoderOptions::new(3).init(&vocab).unwrap();
        assert_eq!(encoder.chunk_size(), 3);
        assert_eq!(encoder.index().dense_bound(), 258);
    }
}
