//! # Chunked BPE Merge Engine
//!
//! Byte-pair encoding of raw bytes against a fixed, pre-trained merge table,
//! matching a reference left-to-right greedy tokenizer merge for merge.
//!
//! See:
//! * [`vocab`] for the merge table ([`vocab::MergeRankVocab`]) and its
//!   dense/fallback lookup index ([`vocab::PairLookupIndex`]).
//! * [`encoders`] for the single-chunk merge engine and the naive
//!   chunked streaming encoder.
//! * [`decoders`] to expand tokens back into bytes.
//!
//! # Example
//!
//! ```rust
//! use chunkbpe::decoders::{PairExpansionDecoder, TokenDecoder};
//! use chunkbpe::encoders::EncoderOptions;
//! use chunkbpe::vocab::MergeRankVocab;
//!
//! fn example() -> anyhow::Result<()> {
//!     // ('a', 'b') -> 256, then (256, 'c') -> 257.
//!     let vocab = MergeRankVocab::<u32>::from_ordered_merges([(97, 98), (256, 99)])?;
//!
//!     let mut encoder = EncoderOptions::new(4096).init(&vocab)?;
//!     assert_eq!(encoder.encode_stream("abc"), vec![257]);
//!     assert_eq!(encoder.encode_stream_ref(b"ab ab"), &[256, 32, 256]);
//!
//!     let decoder = PairExpansionDecoder::from_vocab(&vocab);
//!     assert_eq!(decoder.try_decode_to_string([257])?, "abc");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
#![warn(missing_docs, unused)]

extern crate alloc;

pub mod decoders;
pub mod encoders;
#[cfg(feature = "rayon")]
pub mod rayon;
pub mod types;
pub mod util;
pub mod vocab;

/// Constant guess for the expected bytes/token ratio.
pub const BYTES_PER_TOKEN_HINT: f64 = 4.0;
