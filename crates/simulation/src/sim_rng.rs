//! Deterministic engine RNG.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic randomness. Every random
//! draw the engine makes (spawn trials, centers, amplitudes, noise fields, intro
//! particles) goes through one `FoamRng`, so identical seeds and identical
//! viewport histories produce identical animations.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::DEFAULT_SEED;

#[derive(Debug, Clone)]
pub struct FoamRng(pub ChaCha8Rng);

impl Default for FoamRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl FoamRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// One Bernoulli trial. Probabilities outside `[0, 1]` are clamped.
    pub fn chance(&mut self, probability: f32) -> bool {
        let p = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.0.gen_bool(p as f64)
    }
}
