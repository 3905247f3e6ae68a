//! RNG construction for generation and per-call function seeding.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Create a new RNG seeded from system entropy
pub fn create_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Create a new RNG with a specific seed
pub fn create_seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Pick a fresh seed from entropy, used when a run has no configured seed
pub fn random_seed() -> u64 {
    create_rng().next_u64()
}
