//! # Vocab Testing Tools
//!
//! Small fixture vocabularies and a brute-force reference encoder.

use crate::types::{Pair, TokenType, byte_token};
use crate::vocab::MergeRankVocab;
use ahash::AHashMap;

/// Sample texts used to train and exercise test vocabularies.
pub const SAMPLE_TEXTS: &[&str] = &[
    "hello world",
    "hello san francisco",
    "it's not the heat, it's the salt",
    "aaaaaaaaaaaaaaaa abababababab",
    "the quick brown fox jumps over the lazy dog",
    "\u{1F980} crab \u{1F980}\u{1F980} crabs",
];

/// The two-rule toy vocabulary.
///
/// * ``('a', 'b') -> 256`` at rank 0.
/// * ``(256, 'c') -> 257`` at rank 1.
pub fn toy_abc_vocab<T: TokenType>() -> MergeRankVocab<T> {
    MergeRankVocab::from_ordered_merges([
        (byte_token(b'a'), byte_token(b'b')),
        (T::from_usize(256).unwrap(), byte_token(b'c')),
    ])
    .unwrap()
}

/// Learn `num_merges` merges from `samples`, most frequent pair first.
///
/// Frequency ties break to the smallest pair. This is a slow
/// quadratic trainer, suitable only for building test fixtures.
pub fn train_sample_merges<T: TokenType>(
    samples: &[&str],
    num_merges: usize,
) -> Vec<Pair<T>> {
    let mut words: Vec<Vec<T>> = samples
        .iter()
        .map(|s| s.bytes().map(byte_token).collect())
        .collect();

    let mut merges = Vec::with_capacity(num_merges);
    for idx in 0..num_merges {
        let mut counts: AHashMap<Pair<T>, usize> = AHashMap::default();
        for word in &words {
            for w in word.windows(2) {
                *counts.entry((w[0], w[1])).or_default() += 1;
            }
        }

        let Some((pair, _)) = counts
            .into_iter()
            .max_by(|(pa, ca), (pb, cb)| ca.cmp(cb).then(pb.cmp(pa)))
        else {
            break;
        };

        let token = T::from_usize(256 + idx).unwrap();
        for word in words.iter_mut() {
            *word = reference_merge_all(word, pair, token);
        }
        merges.push(pair);
    }
    merges
}

fn reference_merge_all<T: TokenType>(
    word: &[T],
    pair: Pair<T>,
    token: T,
) -> Vec<T> {
    let mut out = Vec::with_capacity(word.len());
    let mut i = 0;
    while i < word.len() {
        if i + 1 < word.len() && (word[i], word[i + 1]) == pair {
            out.push(token);
            i += 2;
        } else {
            out.push(word[i]);
            i += 1;
        }
    }
    out
}

/// A vocab trained on [`SAMPLE_TEXTS`].
pub fn sample_merge_vocab<T: TokenType>() -> MergeRankVocab<T> {
    MergeRankVocab::from_ordered_merges(train_sample_merges::<T>(SAMPLE_TEXTS, 64)).unwrap()
}

/// Brute-force reference encoder.
///
/// Repeatedly sweeps the working buffer for the lowest-rank pair,
/// preferring the leftmost on ties, and merges it in place.
pub fn reference_encode<T: TokenType>(
    vocab: &MergeRankVocab<T>,
    bytes: &[u8],
) -> Vec<T> {
    let mut tokens: Vec<T> = bytes.iter().copied().map(byte_token).collect();
    while tokens.len() >= 2 {
        let Some((_, idx, token)) = tokens
            .windows(2)
            .enumerate()
            .filter_map(|(idx, w)| {
                vocab
                    .lookup(w[0], w[1])
                    .map(|rule| (rule.rank, idx, rule.token))
            })
            .min()
        else {
            break;
        };
        tokens[idx] = token;
        tokens.remove(idx + 1);
    }
    tokens
}
