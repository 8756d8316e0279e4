//! # Vocabulary
//!
//! * [`MergeRankVocab`] - the ``{ (T, T) -> (rank, T) }`` merge table.
//! * [`PairLookupIndex`] - a dense/fallback index over a [`MergeRankVocab`],
//!   used by the encoders in their hot loop.

pub mod lookup_index;
pub mod merge_vocab;
pub mod tooling;
pub mod vocab_index;

pub use lookup_index::{DEFAULT_DENSE_BOUND, PairLookupIndex};
pub use merge_vocab::MergeRankVocab;
pub use vocab_index::TokenVocabIndex;
