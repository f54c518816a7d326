//! Token estimation (1 token ≈ 4 characters).
//!
//! Only ever used to compare sizes against a budget.

const CHARS_PER_TOKEN: usize = 4;

/// Estimate token count from a string.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
