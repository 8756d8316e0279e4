//! # Validators

use crate::types::TokenType;

/// The size of the u8 space.
pub const U8_SIZE: usize = 256;

/// Checks that a vocab size fits within the token type `T`.
///
/// # Returns
/// The vocab size, or an error.
pub fn try_vocab_size<T: TokenType>(vocab_size: usize) -> anyhow::Result<usize> {
    if vocab_size < U8_SIZE {
        anyhow::bail!("vocab_size ({vocab_size}) must be >= {U8_SIZE}");
    }
    let max = T::max_value().to_usize().unwrap_or(usize::MAX);
    if vocab_size - 1 > max {
        anyhow::bail!(
            "vocab_size ({vocab_size}) exceeds the token type range (max token {max})"
        );
    }
    Ok(vocab_size)
}

/// Checks that a token can be packed into the 32-bit lookup table slots.
pub fn try_packable_token<T: TokenType>(token: T) -> anyhow::Result<u32> {
    match token.to_u32() {
        Some(t) if t != u32::MAX => Ok(t),
        _ => anyhow::bail!("token {token:?} does not fit in a packed u32 slot"),
    }
}
