//! # Token Decoders

pub mod decode_context;
pub mod pair_decoder;
pub mod token_decoder;

pub use decode_context::TokenDecodeContext;
pub use pair_decoder::PairExpansionDecoder;
pub use token_decoder::TokenDecoder;
