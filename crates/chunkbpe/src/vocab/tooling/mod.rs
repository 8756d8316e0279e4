//! # Vocab Tooling

pub mod permutations;
pub mod testing;
