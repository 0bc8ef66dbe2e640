const SEED: u32 = 7;
const MULTIPLIER: u32 = 31;

/// Polynomial hash over the bytes of `word`.
///
/// The accumulator is a `u32` and wraps on overflow, so the same word
/// always yields the same value whatever the host word size.
#[inline(always)]
pub fn polynomial_hash(word: &[u8]) -> u32 {
    word.iter().fold(SEED, |acc, &b| {
        acc.wrapping_mul(MULTIPLIER).wrapping_add(u32::from(b))
    })
}

/// Maps `word` to a bucket in `[0, capacity)`.
///
/// `capacity` must be non-zero.
#[inline(always)]
pub fn bucket_index(word: &[u8], capacity: usize) -> usize {
    polynomial_hash(word) as usize % capacity
}
