//! # Token Encoder Trait

use crate::BYTES_PER_TOKEN_HINT;
use crate::types::TokenType;
use crate::vocab::TokenVocabIndex;

/// A trait for byte-to-token encoders.
///
/// Encoders own reusable scratch memory, so encoding takes `&mut self`;
/// share the vocab, not the encoder, across threads.
pub trait TokenEncoder<T: TokenType>: TokenVocabIndex<T> {
    /// Encode bytes, and append the resulting tokens to the given token buffer.
    fn encode_append(
        &mut self,
        bytes: &[u8],
        tokens: &mut Vec<T>,
    );

    /// Encode bytes into tokens.
    fn encode<B: AsRef<[u8]>>(
        &mut self,
        bytes: B,
    ) -> Vec<T> {
        let bytes = bytes.as_ref();
        let capacity = bytes.len() as f64 / (BYTES_PER_TOKEN_HINT * 0.5);
        let mut tokens = Vec::with_capacity(capacity as usize);

        self.encode_append(bytes, &mut tokens);
        tokens
    }

    /// Encode a batch of byte strings into tokens.
    fn encode_batch<B: AsRef<[u8]>>(
        &mut self,
        batch: &[B],
    ) -> Vec<Vec<T>> {
        batch.iter().map(|b| self.encode(b)).collect()
    }
}
