//! # Token Decoder Trait

use crate::decoders::TokenDecodeContext;
use crate::types::TokenType;
use crate::vocab::TokenVocabIndex;

/// Trait for token decoders.
pub trait TokenDecoder<T: TokenType>: TokenVocabIndex<T> {
    /// Incrementally decodes the context.
    ///
    /// Progresses until `ctx.stack` is empty,
    /// or the top token cannot be decoded by this decoder.
    ///
    /// # Returns
    /// `ctx.stack.is_empty()`
    fn incremental_decode(
        &self,
        ctx: &mut TokenDecodeContext<T>,
    ) -> bool;

    /// Decodes tokens into a decoding context.
    ///
    /// # Arguments
    /// * `tokens` - A slice of tokens to decode.
    fn decode_to_context<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> TokenDecodeContext<T> {
        let mut context = tokens.as_ref().to_vec().into();
        self.incremental_decode(&mut context);
        context
    }

    /// Decode tokens into bytes, returning an error if the decoding fails.
    fn try_decode_to_bytes<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> anyhow::Result<Vec<u8>> {
        self.decode_to_context(tokens).try_result()
    }

    /// Decodes a batch of tokens into a vector of byte vectors, returning an error if the decoding fails.
    fn try_decode_batch_to_bytes(
        &self,
        batch: &[Vec<T>],
    ) -> anyhow::Result<Vec<Vec<u8>>> {
        batch.iter().map(|t| self.try_decode_to_bytes(t)).collect()
    }

    /// Decodes tokens into a string, returning an error if the decoding fails.
    ///
    /// UTF-8 lossy decoding is used to handle invalid UTF-8 sequences.
    fn try_decode_to_string<S: AsRef<[T]>>(
        &self,
        tokens: S,
    ) -> anyhow::Result<String> {
        Ok(String::from_utf8_lossy(&self.try_decode_to_bytes(tokens)?).to_string())
    }
}
