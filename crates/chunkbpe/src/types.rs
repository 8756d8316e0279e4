//! # Common Types and Traits
use core::hash::Hash;
use num_traits::{Bounded, FromPrimitive, ToPrimitive, Unsigned};
use std::fmt::Debug;

/// A type that can be used as a token in the BPE encoders.
pub trait TokenType:
    'static
    + Default
    + Debug
    + Clone
    + Copy
    + Hash
    + Send
    + Sync
    + Unsigned
    + Bounded
    + FromPrimitive
    + ToPrimitive
    + Ord
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
{
}

impl<T> TokenType for T where
    T: 'static
        + Default
        + Debug
        + Clone
        + Copy
        + Hash
        + Send
        + Sync
        + Unsigned
        + Bounded
        + FromPrimitive
        + ToPrimitive
        + Ord
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>
{
}

/// Returns true if the token is a byte token.
pub fn is_byte_token<T: TokenType>(token: T) -> bool {
    token.to_usize().is_some_and(|t| t < crate::util::validators::U8_SIZE)
}

/// The initial token for a raw input byte.
///
/// Bytes map directly onto the token ids ``0..=255``.
#[inline(always)]
pub fn byte_token<T: TokenType>(byte: u8) -> T {
    T::from_u8(byte).expect("every TokenType holds u8")
}

/// A pair of tokens.
pub type Pair<T> = (T, T);

/// Merge priority; lower ranks merge first.
pub type Rank = u32;

/// The outcome of merging a [`Pair<T>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRule<T: TokenType> {
    /// Priority of the merge.
    pub rank: Rank,

    /// The token produced by the merge.
    pub token: T,
}

impl<T: TokenType> MergeRule<T> {
    /// Construct a new rule.
    pub fn new(
        rank: Rank,
        token: T,
    ) -> Self {
        Self { rank, token }
    }
}

/// [`Pair<T>`] to [`MergeRule<T>`] map.
pub type PairRuleMap<T> = ahash::AHashMap<Pair<T>, MergeRule<T>>;

/// [`Pair<T>`] to T map.
pub type PairTokenMap<T> = ahash::AHashMap<Pair<T>, T>;

/// T to [`Pair<T>`] map.
pub type TokenToPairMap<T> = ahash::AHashMap<T, Pair<T>>;

/// Check if a type is `Send`.
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: S) {}

#[cfg(test)]
/// Check if a type is `Sync`.
pub(crate) fn check_is_sync<S: Sync>(_: S) {}
