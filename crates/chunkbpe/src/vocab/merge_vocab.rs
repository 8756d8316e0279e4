//! # Merge Rank Table ``{ (T, T) -> (rank, T) }`` Token Vocabulary

use crate::types::{
    MergeRule, Pair, PairRuleMap, PairTokenMap, Rank, TokenToPairMap, TokenType, is_byte_token,
};
use crate::util::validators::{U8_SIZE, try_packable_token, try_vocab_size};
use crate::vocab::vocab_index::{TokenVocabIndex, byte_tokens_iter};
use ahash::{AHashMap, AHashSet};
use anyhow::Context;

/// Token vocabulary as a ranked binary-pair merge table.
///
/// Each rule maps an adjacent ``(a, b)`` token pair to the token it merges
/// into, and to the rank (priority) of that merge; lower ranks merge first.
///
/// Byte tokens ``0..=255`` are implicit and never appear as merge results.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MergeRankVocab<T: TokenType> {
    /// Map of ``{ (T, T) -> (rank, T) }``.
    rules: PairRuleMap<T>,
}

impl<'a, T: TokenType> IntoIterator for &'a MergeRankVocab<T> {
    type Item = (&'a Pair<T>, &'a MergeRule<T>);
    type IntoIter = std::collections::hash_map::Iter<'a, Pair<T>, MergeRule<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl<T: TokenType> MergeRankVocab<T> {
    /// Build a vocab from merges listed in priority order.
    ///
    /// The i-th merge has rank ``i`` and produces token ``256 + i``.
    pub fn from_ordered_merges<I>(merges: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = Pair<T>>,
    {
        let mut vocab = Self::default();
        for (idx, pair) in merges.into_iter().enumerate() {
            let token = T::from_usize(U8_SIZE + idx)
                .with_context(|| format!("merge #{idx} overflows the token type"))?;
            let rank = Rank::try_from(idx).context("merge rank overflows u32")?;
            if vocab.add_rule(pair, rank, token).is_some() {
                anyhow::bail!("duplicate merge pair {pair:?} at rank {rank}");
            }
        }
        vocab.try_validate()?;
        Ok(vocab)
    }

    /// Build a vocab from a ``{ (T, T) -> T }`` pair map.
    ///
    /// The rank of each merge is the value of the token it produces.
    pub fn from_pair_token_map(pairs: &PairTokenMap<T>) -> anyhow::Result<Self> {
        let mut vocab = Self::default();
        for (&pair, &token) in pairs {
            let rank = try_packable_token(token)?;
            vocab.add_rule(pair, rank, token);
        }
        vocab.try_validate()?;
        Ok(vocab)
    }

    /// Build a vocab from explicit ``((a, b), rule)`` entries.
    pub fn from_rules<I>(rules: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (Pair<T>, MergeRule<T>)>,
    {
        let mut vocab = Self::default();
        for (pair, rule) in rules {
            if vocab.add_rule(pair, rule.rank, rule.token).is_some() {
                anyhow::bail!("duplicate merge pair {pair:?}");
            }
        }
        vocab.try_validate()?;
        Ok(vocab)
    }

    /// The number of merge rules in the vocabulary.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the vocabulary contains no merge rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The number of token ids spanned by the vocab; ``max_token + 1``.
    pub fn vocab_size(&self) -> usize {
        self.max_token().to_usize().unwrap_or(usize::MAX - 1) + 1
    }

    /// Get the ``{ (T, T) -> (rank, T) }`` map.
    pub fn rules(&self) -> &PairRuleMap<T> {
        &self.rules
    }

    /// Iterate over the rules in the vocabulary.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a Pair<T>, &'a MergeRule<T>)> + 'a {
        self.rules.iter()
    }

    /// Add a rule to the vocab.
    ///
    /// Does not validate; see [`Self::try_validate`].
    ///
    /// # Returns
    /// The rule previously registered for the pair, if any.
    pub fn add_rule(
        &mut self,
        pair: Pair<T>,
        rank: Rank,
        token: T,
    ) -> Option<MergeRule<T>> {
        self.rules.insert(pair, MergeRule::new(rank, token))
    }

    /// Look up the merge rule for a pair.
    #[inline(always)]
    pub fn lookup(
        &self,
        a: T,
        b: T,
    ) -> Option<MergeRule<T>> {
        self.rules.get(&(a, b)).copied()
    }

    /// The rank of merging ``(a, b)``, if a rule exists.
    pub fn rank_of(
        &self,
        a: T,
        b: T,
    ) -> Option<Rank> {
        self.lookup(a, b).map(|rule| rule.rank)
    }

    /// The token produced by merging ``(a, b)``, if a rule exists.
    pub fn merge_result(
        &self,
        a: T,
        b: T,
    ) -> Option<T> {
        self.lookup(a, b).map(|rule| rule.token)
    }

    /// Build the inverse ``{ T -> (T, T) }`` expansion map.
    pub fn to_token_pair_map(&self) -> TokenToPairMap<T> {
        self.rules
            .iter()
            .map(|(&pair, rule)| (rule.token, pair))
            .collect()
    }

    /// Validate the merge table.
    ///
    /// This is the load-time failure surface; encoders assume a valid table.
    pub fn try_validate(&self) -> anyhow::Result<()> {
        let mut by_token: AHashMap<T, Pair<T>> = AHashMap::with_capacity(self.rules.len());
        let mut ranks: AHashSet<Rank> = AHashSet::with_capacity(self.rules.len());

        for (&pair, rule) in &self.rules {
            if is_byte_token(rule.token) {
                anyhow::bail!(
                    "merge {pair:?} produces byte token {:?}; merge results must be >= {U8_SIZE}",
                    rule.token
                );
            }
            try_packable_token(rule.token)?;
            if let Some(other) = by_token.insert(rule.token, pair) {
                anyhow::bail!(
                    "merges {other:?} and {pair:?} both produce token {:?}",
                    rule.token
                );
            }
            if !ranks.insert(rule.rank) {
                anyhow::bail!("merge {pair:?} reuses rank {}", rule.rank);
            }
        }

        for &(a, b) in self.rules.keys() {
            for operand in [a, b] {
                if !is_byte_token(operand) && !by_token.contains_key(&operand) {
                    anyhow::bail!(
                        "merge {:?} references token {operand:?}, which no merge produces",
                        (a, b)
                    );
                }
            }
        }

        try_vocab_size::<T>(self.vocab_size())?;

        log::debug!(
            "validated merge vocab: {} rules, vocab_size {}",
            self.rules.len(),
            self.vocab_size()
        );
        Ok(())
    }

    /// Shrinks the capacity of the underlying data structures to fit its current size.
    pub fn shrink_to_fit(&mut self) {
        self.rules.shrink_to_fit();
    }
}

impl<T: TokenType> TokenVocabIndex<T> for MergeRankVocab<T> {
    fn unordered_tokens_iter(&self) -> impl Iterator<Item = T> {
        byte_tokens_iter().chain(self.rules.values().map(|rule| rule.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{check_is_send, check_is_sync};

    #[test]
    fn test_ordered_merges() {
        type T = u32;
        let vocab = MergeRankVocab::<T>::from_ordered_merges([
            (b'a' as T, b'b' as T),
            (256, b'c' as T),
            (b'c' as T, b'c' as T),
        ])
        .unwrap();
        check_is_send(&vocab);
        check_is_sync(&vocab);

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.vocab_size(), 259);
        assert_eq!(vocab.max_token(), 258);

        assert_eq!(vocab.rank_of(b'a' as T, b'b' as T), Some(0));
        assert_eq!(vocab.merge_result(b'a' as T, b'b' as T), Some(256));
        assert_eq!(vocab.rank_of(256, b'c' as T), Some(1));
        assert_eq!(vocab.merge_result(256, b'c' as T), Some(257));
        assert_eq!(vocab.lookup(b'c' as T, b'c' as T), Some(MergeRule::new(2, 258)));

        assert_eq!(vocab.rank_of(b'b' as T, b'a' as T), None);
        assert_eq!(vocab.merge_result(b'b' as T, b'a' as T), None);

        let inverse = vocab.to_token_pair_map();
        assert_eq!(inverse.get(&257), Some(&(256, b'c' as T)));
    }

    #[test]
    fn test_tokens_sorted() {
        type T = u16;
        let vocab = MergeRankVocab::<T>::from_ordered_merges([(1, 2), (3, 4), (256, 257)]).unwrap();

        assert_eq!(vocab.sorted_tokens(), (0..=258).collect::<Vec<T>>());
    }

    #[test]
    fn test_pair_token_map() {
        type T = u32;
        let mut pairs: PairTokenMap<T> = Default::default();
        pairs.insert((1, 2), 300);
        pairs.insert((300, 3), 301);

        let vocab = MergeRankVocab::from_pair_token_map(&pairs).unwrap();
        assert_eq!(vocab.lookup(1, 2), Some(MergeRule::new(300, 300)));
        assert_eq!(vocab.lookup(300, 3), Some(MergeRule::new(301, 301)));
        assert_eq!(vocab.vocab_size(), 302);
    }

    #[test]
    fn test_validation_errors() {
        type T = u32;

        assert_eq!(
            MergeRankVocab::<T>::from_ordered_merges([(1, 2), (1, 2)])
                .unwrap_err()
                .to_string(),
            "duplicate merge pair (1, 2) at rank 1"
        );

        assert_eq!(
            MergeRankVocab::<T>::from_rules([((1, 2), MergeRule::new(0, 7))])
                .unwrap_err()
                .to_string(),
            "merge (1, 2) produces byte token 7; merge results must be >= 256"
        );

        assert!(
            MergeRankVocab::<T>::from_rules([
                ((1, 2), MergeRule::new(0, 256)),
                ((3, 4), MergeRule::new(1, 256)),
            ])
            .unwrap_err()
            .to_string()
            .contains("both produce token 256")
        );

        assert!(
            MergeRankVocab::<T>::from_rules([
                ((1, 2), MergeRule::new(5, 256)),
                ((3, 4), MergeRule::new(5, 257)),
            ])
            .unwrap_err()
            .to_string()
            .contains("reuses rank 5")
        );

        assert_eq!(
            MergeRankVocab::<T>::from_rules([((1, 900), MergeRule::new(0, 256))])
                .unwrap_err()
                .to_string(),
            "merge (1, 900) references token 900, which no merge produces"
        );
    }

    #[test]
    fn test_token_type_overflow() {
        type T = u16;
        let merges = (0..65_281_usize).map(|i| ((i % 256) as T, (i / 256) as T));
        let err = MergeRankVocab::<T>::from_ordered_merges(merges).unwrap_err();
        assert_eq!(err.to_string(), "merge #65280 overflows the token type");
    }
}
