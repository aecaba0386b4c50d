//! Seedable random sources.
//!
//! Tab polarity and scatter placement draw from a `RandomSource` handed in by
//! the caller, so a fixed seed reproduces the same puzzle.

/// Source of pseudo-random bits. Only `next_u64` is required.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform float in [0, 1).
    fn next_f32(&mut self) -> f32 {
        // 24 high bits fill the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform index in [0, len). Returns 0 for an empty range.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }

    /// Fair coin returning +1 or -1.
    fn next_sign(&mut self) -> i8 {
        if self.next_u64() >> 63 == 1 {
            1
        } else {
            -1
        }
    }
}

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }
}

impl RandomSource for Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}
