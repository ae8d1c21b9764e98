//! Deterministic random streams for rollouts.
//!
//! Every rollout draws from its own ChaCha stream derived from
//! (master seed, action index, sample index), so results do not depend on
//! how rollouts are scheduled across threads.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngManager {
    master_seed: u64,
    round: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master_seed: seed,
            round: 0,
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Moves to the next decision so later rollouts use fresh streams.
    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn rollout_rng(&self, action: u64, sample: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(action, sample))
    }

    /// Stream for the live game's own random events.
    pub fn live_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(u64::MAX, u64::MAX))
    }

    fn derive_seed(&self, action: u64, sample: u64) -> u64 {
        let mut seed = self.master_seed;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= self.round.wrapping_mul(1103515245);
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= action.wrapping_mul(48271);
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= sample.wrapping_mul(69069);
        seed
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}
