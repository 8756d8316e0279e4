//! # Pair Expansion ``{ T -> (T, T) }`` Token Decoder

use crate::decoders::decode_context::TokenDecodeContext;
use crate::decoders::token_decoder::TokenDecoder;
use crate::types::{TokenToPairMap, TokenType, is_byte_token};
use crate::vocab::vocab_index::byte_tokens_iter;
use crate::vocab::{MergeRankVocab, TokenVocabIndex};

/// A Pair Expansion ``{ T -> (T, T) }``  [`TokenDecoder`].
///
/// Byte tokens decode to their byte; merged tokens expand to the pair
/// they were merged from.
#[derive(Debug, Clone)]
pub struct PairExpansionDecoder<T: TokenType> {
    /// Token to pair mapping.
    token_map: TokenToPairMap<T>,
}

impl<T: TokenType> PairExpansionDecoder<T> {
    /// Creates a new Decoder.
    pub fn new(token_map: TokenToPairMap<T>) -> Self {
        Self { token_map }
    }

    /// Build a [`PairExpansionDecoder`] from a [`MergeRankVocab`].
    pub fn from_vocab(vocab: &MergeRankVocab<T>) -> Self {
        Self::new(vocab.to_token_pair_map())
    }

    /// Get the token to pair map.
    pub fn token_map(&self) -> &TokenToPairMap<T> {
        &self.token_map
    }
}

impl<T: TokenType> TokenVocabIndex<T> for PairExpansionDecoder<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        byte_tokens_iter().chain(self.token_map.keys().copied())
    }
}

impl<T: TokenType> TokenDecoder<T> for PairExpansionDecoder<T> {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, ctx)))]
    fn incremental_decode(
        &self,
        ctx: &mut TokenDecodeContext<T>,
    ) -> bool {
        while let Some(t) = ctx.stack.pop() {
            if is_byte_token(t) {
                // Byte tokens are their own byte value.
                ctx.buf.push(t.to_u8().unwrap_or_default());
            } else if let Some(&(a, b)) = self.token_map.get(&t) {
                ctx.stack.push(b);
                ctx.stack.push(a);
            } else {
                ctx.stack.push(t);
                break;
            }
        }
        ctx.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::{ChunkEncoder, TokenEncoder};
    use crate::types::{check_is_send, check_is_sync};
    use crate::vocab::PairLookupIndex;
    use crate::vocab::tooling::testing::{SAMPLE_TEXTS, sample_merge_vocab, toy_abc_vocab};
    use alloc::sync::Arc;

    #[test]
    fn test_toy_decode() {
        type T = u32;
        let decoder = PairExpansionDecoder::from_vocab(&toy_abc_vocab::<T>());
        check_is_send(&decoder);
        check_is_sync(&decoder);

        assert_eq!(decoder.max_token(), 257);
        assert_eq!(decoder.try_decode_to_bytes([257]).unwrap(), b"abc");
        assert_eq!(
            decoder.try_decode_to_string([256, 32, 256]).unwrap(),
            "ab ab"
        );
        assert_eq!(decoder.try_decode_to_bytes(Vec::<T>::new()).unwrap(), b"");
    }

    #[test]
    fn test_unknown_token() {
        type T = u32;
        let decoder = PairExpansionDecoder::from_vocab(&toy_abc_vocab::<T>());

        let mut ctx = decoder.decode_to_context([b'x' as T, 256, 9000, 257]);
        assert!(!ctx.is_complete());
        assert_eq!(ctx.buf, b"xab");
        assert_eq!(ctx.stack, vec![257, 9000]);

        ctx.stack.pop();
        ctx.stack.pop();
        assert!(decoder.incremental_decode(&mut ctx));

        assert_eq!(
            decoder.try_decode_to_bytes([9000]).unwrap_err().to_string(),
            "Incomplete context: [9000, ...] after 0 decoded bytes"
        );
    }

    #[test]
    fn test_pair_decoder_round_trip() {
        type T = u16;
        let vocab = sample_merge_vocab::<T>();
        let mut encoder = ChunkEncoder::new(Arc::new(PairLookupIndex::from_vocab(&vocab).unwrap()));
        let decoder = PairExpansionDecoder::from_vocab(&vocab);

        for sample in SAMPLE_TEXTS {
            let tokens = encoder.encode(sample);
            assert!(tokens.len() <= sample.len());
            assert_eq!(decoder.try_decode_to_string(&tokens).unwrap(), *sample);
        }

        let batch: Vec<Vec<T>> = encoder.encode_batch(SAMPLE_TEXTS);
        let bytes = decoder.try_decode_batch_to_bytes(&batch).unwrap();
        for (sample, bytes) in SAMPLE_TEXTS.iter().zip(bytes) {
            assert_eq!(bytes, sample.as_bytes());
        }
    }
}
