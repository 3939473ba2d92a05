//! Rollout configuration.

use serde::{Deserialize, Serialize};

/// Salt mixed into the master seed for the environment's random source.
pub const ENV_SEED_SALT: u64 = 0x517cc1b727220a95;

/// Salt mixed into the master seed for the rollout policy.
pub const POLICY_SEED_SALT: u64 = 0x3c6ef372fe94f82b;

/// Configuration for a batch of rollouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloutConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Number of episodes to run
    pub episodes: usize,

    /// Step cap per episode (episode is truncated, not failed)
    pub max_steps: usize,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            episodes: 10,
            max_steps: 100,
        }
    }
}

impl RolloutConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}
