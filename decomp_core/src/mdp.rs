//! Stochastic MDP Driver
//! =====================
//!
//! Samples transitions over an abstract `WorldModel` and assembles the
//! decomposed reward of the landing state.
//!
//! # Sampling
//!
//! Inverse-CDF ("roulette wheel") over the world's successor order:
//!
//! ```text
//! roll ~ U[0, 1)
//! cum  = 0
//! for s' in successors(s, a):          // world order, load-bearing
//!     cum += P(s' | s, a)
//!     if roll < cum: return s'
//! ```
//!
//! No per-call distribution object is built; the driver only needs the
//! successor order to be stable for the duration of one `act`.

use decomp_env::{Coordinates, EnvError, RandomSource, RewardVector, Transition, WorldModel};
use tracing::debug;

/// Slack allowed between a kernel's cumulative probability and 1.0.
///
/// A roll that lands in `[cum, 1)` with `cum >= 1 - KERNEL_TOLERANCE` is
/// float round-off in a well-formed kernel and resolves to the last
/// successor with non-zero probability.
pub const KERNEL_TOLERANCE: f64 = 1e-9;

/// Drives one world model with one injected random source.
///
/// The world model is read-only after construction. Randomness changes only
/// through `reseed` or `replace_random_source`.
pub struct MdpDriver<W: WorldModel, R: RandomSource> {
    world: W,
    rng: R,
}

impl<W: WorldModel, R: RandomSource> MdpDriver<W, R> {
    /// Creates a driver over `world`, drawing from `rng`.
    pub fn new(world: W, rng: R) -> Self {
        Self { world, rng }
    }

    /// The driven world model.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The injected random source.
    pub fn random_source(&self) -> &R {
        &self.rng
    }

    pub fn shape(&self) -> &[i64] {
        self.world.shape()
    }

    pub fn actions(&self) -> &[W::Action] {
        self.world.actions()
    }

    pub fn reward_types(&self) -> &[String] {
        self.world.reward_types()
    }

    pub fn states(&self) -> Vec<W::State> {
        self.world.states()
    }

    /// Picks a uniformly random non-terminal start state.
    ///
    /// The non-terminal set is queried fresh on every call.
    ///
    /// # Errors
    /// `EnvError::EmptyStateSpace` if the world has no non-terminal state.
    pub fn reset(&mut self) -> Result<W::State, EnvError> {
        let mut candidates = self.world.nonterminal_states();
        if candidates.is_empty() {
            return Err(EnvError::EmptyStateSpace);
        }

        let idx = self.rng.choice(candidates.len());
        let state = candidates.swap_remove(idx);
        debug!("reset: {:?} (1 of {})", state, candidates.len() + 1);
        Ok(state)
    }

    /// Samples the successor of `state` under `action`.
    ///
    /// Draws exactly one `rand()` from the random source. `state` is not
    /// validated; see `valid`.
    ///
    /// # Errors
    /// `EnvError::NoSuccessor` if the kernel for `(state, action)` does not
    /// cover the roll.
    pub fn act(
        &mut self,
        state: &W::State,
        action: &W::Action,
    ) -> Result<Transition<W::State>, EnvError> {
        let roll = self.rng.rand();
        self.act_with_roll(state, action, roll)
    }

    /// Resolves a transition for an already-drawn `roll` in `[0, 1)`.
    ///
    /// # Errors
    /// `EnvError::NoSuccessor` if the kernel does not cover the roll. Rolls
    /// outside `[0, 1)`, NaN included, never take the round-off fallback.
    pub fn act_with_roll(
        &self,
        state: &W::State,
        action: &W::Action,
        roll: f64,
    ) -> Result<Transition<W::State>, EnvError> {
        let mut cum_prob = 0.0;
        let mut fallback = None;

        for next in self.world.successors(state, action) {
            let prob = self.world.transition_prob(state, action, &next);
            cum_prob += prob;
            if roll < cum_prob {
                debug!(
                    "act: {:?} --{:?}--> {:?} (roll {:.4} < {:.4})",
                    state, action, next, roll, cum_prob
                );
                return Ok(self.land(next));
            }
            if prob > 0.0 {
                fallback = Some(next);
            }
        }

        match fallback {
            Some(next)
                if (0.0..1.0).contains(&roll) && cum_prob >= 1.0 - KERNEL_TOLERANCE =>
            {
                debug!(
                    "act: {:?} --{:?}--> {:?} (roll {:.12} past cumulative {:.12})",
                    state, action, next, roll, cum_prob
                );
                Ok(self.land(next))
            }
            _ => Err(EnvError::no_successor(state, action, roll, cum_prob)),
        }
    }

    /// Builds the transition record for a landing state.
    fn land(&self, next: W::State) -> Transition<W::State> {
        let rewards: RewardVector = self
            .world
            .reward_types()
            .iter()
            .map(|name| (name.clone(), self.world.reward(name, &next)))
            .collect();

        Transition {
            total_reward: self.world.total_reward(&next),
            terminal: self.world.is_terminal(&next),
            rewards,
            next_state: next,
        }
    }

    /// True iff `state` is inside `shape` on every axis and passable.
    ///
    /// Bounds are inclusive: axis `i` accepts `0..=shape[i]`. A state whose
    /// dimensionality differs from `shape` is not valid.
    pub fn valid(&self, state: &W::State) -> bool
    where
        W::State: Coordinates,
    {
        let coords = state.coordinates();
        let shape = self.world.shape();

        coords.len() == shape.len()
            && coords
                .iter()
                .zip(shape)
                .all(|(&c, &extent)| (0..=extent).contains(&c))
            && !self.world.is_impassable(state)
    }

    /// Canonicalizes a raw representation via the world model.
    pub fn statify(&self, raw: W::Raw) -> W::State {
        self.world.statify(raw)
    }

    /// Reseeds the injected random source in place.
    pub fn reseed(&mut self, seed: u64) {
        debug!("reseed: {}", seed);
        self.rng.reseed(seed);
    }

    /// Swaps in a new random source, returning the old one.
    pub fn replace_random_source(&mut self, rng: R) -> R {
        std::mem::replace(&mut self.rng, rng)
    }
}
