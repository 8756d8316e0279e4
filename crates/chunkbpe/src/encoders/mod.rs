//! # Token Encoders
//!
//! * [`TokenList`] and [`MergeQueue`] - the merge engine's state.
//! * [`ChunkEncoder`] - greedy BPE over one chunk.
//! * [`NaiveStreamEncoder`] - fixed-size chunking over [`ChunkEncoder`].

pub mod chunk_encoder;
pub mod merge_queue;
pub mod options;
pub mod stream_encoder;
pub mod token_encoder;
pub mod token_list;

pub use chunk_encoder::ChunkEncoder;
pub use merge_queue::{MergeCandidate, MergeQueue};
pub use options::{DEFAULT_CHUNK_SIZE, EncoderOptions};
pub use stream_encoder::NaiveStreamEncoder;
pub use token_encoder::TokenEncoder;
pub use token_list::TokenList;
