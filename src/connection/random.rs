//! Random number source for the pairing simulation
//!
//! The outcome of an attempt is one uniform draw. Keeping the draw behind a
//! trait lets tests force `connected` or `failed`.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource: Send {
    /// Next draw in `[0, 1)`
    fn next_f64(&mut self) -> f64;
}

/// System randomness using entropy-seeded RNG
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    /// Seed from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen()
    }
}

/// Deterministic randomness using seeded RNG
pub struct SeededRandom {
    rng: StdRng,
    seed: u64,
}

impl SeededRandom {
    /// Seed with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.r#gen()
    }
}

/// Always returns the same draw
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl FixedRandom {
    /// Draw that lands on the success side of any failure probability below 1
    pub fn always_connect() -> Self {
        Self(0.999)
    }

    /// Draw that lands on the failure side of any failure probability above 0
    pub fn always_fail() -> Self {
        Self(0.0)
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}
