//! # Dense/Fallback Pair Lookup Index
//!
//! Merge candidates overwhelmingly involve low-numbered tokens
//! (bytes and early merges). Pairs where both tokens are below the
//! dense bound ``N`` are answered from an ``N x N`` table with no hashing;
//! all other pairs fall back to a hash map.

use crate::types::{MergeRule, Pair, PairRuleMap, TokenType};
use crate::util::validators::try_packable_token;
use crate::vocab::merge_vocab::MergeRankVocab;
use crate::vocab::vocab_index::{TokenVocabIndex, byte_tokens_iter};
use core::fmt::Debug;

/// Default bound on the token ids covered by the dense table.
pub const DEFAULT_DENSE_BOUND: usize = 2048;

/// Marks a dense slot with no rule.
const EMPTY_SLOT: u64 = u64::MAX;

#[inline(always)]
fn pack_slot(
    rank: u32,
    token: u32,
) -> u64 {
    ((rank as u64) << 32) | token as u64
}

#[inline(always)]
fn unpack_slot(slot: u64) -> (u32, u32) {
    ((slot >> 32) as u32, slot as u32)
}

/// Immutable ``(a, b) -> (rank, token)`` index over a [`MergeRankVocab`].
#[derive(Clone)]
pub struct PairLookupIndex<T: TokenType> {
    /// Effective dense bound; ``min(requested bound, vocab_size)``.
    bound: usize,

    /// Row-major ``bound x bound`` table of packed ``(rank, token)`` slots.
    dense: Vec<u64>,

    /// Rules with at least one token ``>= bound``.
    fallback: PairRuleMap<T>,

    /// Number of rules held in the dense table.
    dense_rules: usize,
}

impl<T: TokenType> Debug for PairLookupIndex<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("PairLookupIndex")
            .field("bound", &self.bound)
            .field("dense_rules", &self.dense_rules)
            .field("fallback_rules", &self.fallback.len())
            .finish()
    }
}

impl<T: TokenType> PairLookupIndex<T> {
    /// Build an index with the [`DEFAULT_DENSE_BOUND`].
    pub fn from_vocab(vocab: &MergeRankVocab<T>) -> anyhow::Result<Self> {
        Self::from_vocab_with_bound(vocab, DEFAULT_DENSE_BOUND)
    }

    /// Build an index over `vocab`.
    ///
    /// # Arguments
    /// * `dense_bound` - tokens below this bound use the dense table;
    ///   clamped to the vocab size. Memory is ``8 * bound^2`` bytes.
    pub fn from_vocab_with_bound(
        vocab: &MergeRankVocab<T>,
        dense_bound: usize,
    ) -> anyhow::Result<Self> {
        if dense_bound == 0 {
            anyhow::bail!("dense_bound must be > 0");
        }
        let bound = dense_bound.min(vocab.vocab_size());
        let cells = bound
            .checked_mul(bound)
            .ok_or_else(|| anyhow::anyhow!("dense_bound {dense_bound} is too large"))?;

        let mut dense = vec![EMPTY_SLOT; cells];
        let mut fallback = PairRuleMap::default();
        let mut dense_rules = 0;

        for (&(a, b), rule) in vocab {
            let token = try_packable_token(rule.token)?;
            match Self::dense_offset(bound, a, b) {
                Some(offset) => {
                    dense[offset] = pack_slot(rule.rank, token);
                    dense_rules += 1;
                }
                None => {
                    fallback.insert((a, b), *rule);
                }
            }
        }
        fallback.shrink_to_fit();

        log::debug!(
            "built pair lookup index: bound {bound}, {dense_rules} dense rules, {} fallback rules, {} table bytes",
            fallback.len(),
            cells * size_of::<u64>()
        );

        Ok(Self {
            bound,
            dense,
            fallback,
            dense_rules,
        })
    }

    #[inline(always)]
    fn dense_offset(
        bound: usize,
        a: T,
        b: T,
    ) -> Option<usize> {
        let a = a.to_usize()?;
        let b = b.to_usize()?;
        if a < bound && b < bound {
            Some(a * bound + b)
        } else {
            None
        }
    }

    /// Look up the merge rule for ``(a, b)``.
    #[inline(always)]
    pub fn lookup(
        &self,
        a: T,
        b: T,
    ) -> Option<MergeRule<T>> {
        match Self::dense_offset(self.bound, a, b) {
            Some(offset) => {
                let slot = self.dense[offset];
                if slot == EMPTY_SLOT {
                    return None;
                }
                let (rank, token) = unpack_slot(slot);
                // Tokens were range-checked by `try_packable_token` at build time.
                T::from_u32(token).map(|token| MergeRule::new(rank, token))
            }
            None => self.fallback.get(&(a, b)).copied(),
        }
    }

    /// Look up the merge rule for a [`Pair<T>`].
    #[inline(always)]
    pub fn lookup_pair(
        &self,
        pair: &Pair<T>,
    ) -> Option<MergeRule<T>> {
        self.lookup(pair.0, pair.1)
    }

    /// The effective dense bound.
    pub fn dense_bound(&self) -> usize {
        self.bound
    }

    /// Number of rules answered by the dense table.
    pub fn dense_rule_count(&self) -> usize {
        self.dense_rules
    }

    /// Number of rules answered by the fallback map.
    pub fn fallback_rule_count(&self) -> usize {
        self.fallback.len()
    }
}

impl<T: TokenType> TokenVocabIndex<T> for PairLookupIndex<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        let dense = self
            .dense
            .iter()
            .filter(|&&slot| slot != EMPTY_SLOT)
            .filter_map(|&slot| T::from_u32(unpack_slot(slot).1));
        byte_tokens_iter()
            .chain(dense)
            .chain(self.fallback.values().map(|rule| rule.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{check_is_send, check_is_sync};
    use crate::vocab::tooling::testing::{sample_merge_vocab, toy_abc_vocab};

    fn check_agrees_with_vocab<T: TokenType>(
        vocab: &MergeRankVocab<T>,
        bound: usize,
    ) {
        let index = PairLookupIndex::from_vocab_with_bound(vocab, bound).unwrap();
        assert_eq!(index.dense_bound(), bound.min(vocab.vocab_size()));
        assert_eq!(
            index.dense_rule_count() + index.fallback_rule_count(),
            vocab.len()
        );

        let max = vocab.vocab_size();
        for a in 0..max {
            for b in 0..max {
                let a = T::from_usize(a).unwrap();
                let b = T::from_usize(b).unwrap();
                assert_eq!(index.lookup(a, b), vocab.lookup(a, b), "pair {:?}", (a, b));
            }
        }
    }

    #[test]
    fn test_toy_index() {
        type T = u32;
        let vocab = toy_abc_vocab::<T>();
        let index = PairLookupIndex::from_vocab(&vocab).unwrap();
        check_is_send(&index);
        check_is_sync(&index);

        assert_eq!(index.dense_bound(), 258);
        assert_eq!(index.fallback_rule_count(), 0);
        assert_eq!(
            index.lookup(b'a' as T, b'b' as T),
            Some(MergeRule::new(0, 256))
        );
        assert_eq!(
            index.lookup_pair(&(256, b'c' as T)),
            Some(MergeRule::new(1, 257))
        );
        assert_eq!(index.lookup(b' ' as T, b'a' as T), None);

        // Out of range of the vocab entirely.
        assert_eq!(index.lookup(5000, 1), None);
    }

    #[test]
    fn test_dense_and_fallback_agree() {
        let vocab = sample_merge_vocab::<u16>();
        for bound in [1, 2, 97, 256, 257, 300, DEFAULT_DENSE_BOUND] {
            check_agrees_with_vocab(&vocab, bound);
        }
    }

    #[test]
    fn test_fallback_only_holds_large_tokens() {
        type T = u32;
        let vocab = toy_abc_vocab::<T>();
        let index = PairLookupIndex::from_vocab_with_bound(&vocab, 257).unwrap();

        // Both rules fit under 257.
        assert_eq!(index.dense_rule_count(), 2);

        let index = PairLookupIndex::from_vocab_with_bound(&vocab, 256).unwrap();
        assert_eq!(index.dense_rule_count(), 1);
        assert_eq!(index.fallback_rule_count(), 1);
        assert_eq!(
            index.lookup(256, b'c' as T),
            Some(MergeRule::new(1, 257))
        );
    }

    #[test]
    fn test_zero_bound_rejected() {
        let vocab = toy_abc_vocab::<u32>();
        assert_eq!(
            PairLookupIndex::from_vocab_with_bound(&vocab, 0)
                .unwrap_err()
                .to_string(),
            "dense_bound must be > 0"
        );
    }
}
