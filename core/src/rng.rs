//! Seeded random sources for maze generation
//!
//! The generator never touches global randomness: callers inject a
//! [`RandomSource`], so the same seed always carves the same maze.
//!
//! [`SimpleLCG`] is the Park-Miller "minimal standard" generator:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

/// Modulus shared by the state update and the range scaling.
const M: u64 = 2147483647; // 2^31 - 1

/// Source of uniform choices used by the maze generator.
pub trait RandomSource {
    /// Choose an index uniformly from `[0, len)`.
    ///
    /// `len` is always at least 1 when called by the generator.
    fn choice_index(&mut self, len: usize) -> usize;
}

/// Park-Miller Linear Congruential Generator
///
/// Same seed always produces the same sequence.
#[derive(Debug, Clone)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// If seed is 0, it's replaced with 1 to avoid degenerate sequence
    pub fn new(seed: u32) -> Self {
        // States must live in [1, m - 1]
        let state = (seed as u64 % M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) -> u32 {
        const A: u64 = 48271;

        // u64 avoids overflow during multiplication
        self.state = ((self.state as u64 * A) % M) as u32;
        self.state
    }
}

impl RandomSource for SimpleLCG {
    /// Pure integer arithmetic: `(state * len) / m`.
    fn choice_index(&mut self, len: usize) -> usize {
        let state = self.advance() as u64;
        ((state * len as u64) / M) as usize
    }
}
