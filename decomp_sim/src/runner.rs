//! Rollout runner - drives episodes with a seeded uniform-random policy.

use crate::config::{RolloutConfig, ENV_SEED_SALT, POLICY_SEED_SALT};

use decomp_env::{EnvError, Environment, RandomSource, RenderMode, RewardVector, SeededSource};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

/// Results from one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Episode index within the batch
    pub episode: usize,

    /// Debug rendering of the start observation
    pub start: String,

    /// Transitions taken
    pub steps: usize,

    /// Sum of scalar rewards
    pub total_return: f64,

    /// Per-component sums of the reported decomposition
    pub component_returns: RewardVector,

    /// Steps whose decomposition was flagged
    pub mismatches: usize,

    /// Ended in a terminal state (false = truncated at `max_steps`)
    pub terminated: bool,
}

/// Aggregate over a batch of episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloutSummary {
    pub seed: u64,
    pub episodes: Vec<EpisodeResult>,
    pub mean_return: f64,
    pub mean_steps: f64,
    pub component_means: RewardVector,
    pub total_mismatches: usize,
    pub terminated_count: usize,
}

impl RolloutSummary {
    fn from_episodes(seed: u64, episodes: Vec<EpisodeResult>) -> Self {
        let n = episodes.len().max(1) as f64;

        let mut component_means = RewardVector::new();
        for episode in &episodes {
            for (name, value) in episode.component_returns.iter() {
                component_means.accumulate(name, value / n);
            }
        }

        Self {
            seed,
            mean_return: episodes.iter().map(|e| e.total_return).sum::<f64>() / n,
            mean_steps: episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n,
            total_mismatches: episodes.iter().map(|e| e.mismatches).sum(),
            terminated_count: episodes.iter().filter(|e| e.terminated).count(),
            component_means,
            episodes,
        }
    }
}

/// Runs seeded rollouts against any environment.
///
/// The environment's random source and the policy's random source are
/// derived from the master seed with different salts, so changing the
/// policy never perturbs the environment's transition draws.
pub struct RolloutRunner<E: Environment> {
    env: E,
    actions: Vec<E::Action>,
    config: RolloutConfig,
    policy_rng: SeededSource,
}

impl<E> RolloutRunner<E>
where
    E: Environment,
    E::Observation: Debug,
    E::Action: Clone,
{
    /// Creates a runner and reseeds `env` from the config's master seed.
    pub fn new(mut env: E, actions: Vec<E::Action>, config: RolloutConfig) -> Self {
        env.reseed(SeededSource::derive_seed(config.seed, ENV_SEED_SALT));
        let policy_rng = SeededSource::derive(config.seed, POLICY_SEED_SALT);

        Self {
            env,
            actions,
            config,
            policy_rng,
        }
    }

    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Consumes the runner, returning the environment.
    pub fn into_env(self) -> E {
        self.env
    }

    /// Runs `config.episodes` episodes.
    ///
    /// # Errors
    /// World-model contract violations abort the batch; they are never
    /// retried.
    pub fn run(&mut self) -> Result<RolloutSummary, EnvError> {
        let episodes = (0..self.config.episodes)
            .map(|episode| self.run_episode(episode))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RolloutSummary::from_episodes(self.config.seed, episodes))
    }

    /// Runs one episode until a terminal state or `max_steps`.
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeResult, EnvError> {
        if self.actions.is_empty() {
            return Err(EnvError::invalid_action("empty action set"));
        }

        let start = self.env.reset()?;
        let mut result = EpisodeResult {
            episode,
            start: format!("{:?}", start),
            steps: 0,
            total_return: 0.0,
            component_returns: RewardVector::new(),
            mismatches: 0,
            terminated: false,
        };

        while result.steps < self.config.max_steps {
            let action = self.actions[self.policy_rng.choice(self.actions.len())].clone();
            let step = self.env.step(action)?;

            result.steps += 1;
            result.total_return += step.reward;
            for (name, value) in step.info.reward_decomposition.iter() {
                result.component_returns.accumulate(name, value);
            }
            if step.info.decomposition_mismatch {
                result.mismatches += 1;
            }
            if step.terminal {
                result.terminated = true;
                break;
            }
        }

        if let Ok(rendered) = self.env.render(RenderMode::Print) {
            if let Some(text) = rendered.as_text() {
                debug!("episode {} final state:\n{}", episode, text);
            }
        }
        debug!(
            "episode {}: {} steps, return {:.3}, terminated {}",
            episode, result.steps, result.total_return, result.terminated
        );

        Ok(result)
    }
}
