//! Decomposed-Reward Environment Abstraction Layer
//!
//! This crate defines the seams between the reward-decomposition engines in
//! `decomp_core` and everything they treat as an external collaborator:
//! - World models (states, successors, transition kernel, reward tables)
//! - Randomness (`choice()`, `rand()`, explicit reseeding)
//! - The agent-facing environment surface (`reset()`, `step()`, `render()`)
//!
//! # Core Concept: Injected Entropy
//!
//! Every environment owns exactly one `RandomSource`, handed over at
//! construction. Reproducible runs use `SeededSource`; production runs use
//! `EntropySource`. Both can be reseeded in place without rebuilding the
//! environment.
//!
//! # Example
//!
//! ```ignore
//! use decomp_env::{Environment, RenderMode};
//!
//! fn run_episode<E: Environment>(env: &mut E, policy: impl Fn(&E::Observation) -> E::Action) {
//!     let mut obs = env.reset().expect("world has non-terminal states");
//!     loop {
//!         let step = env.step(policy(&obs)).expect("well-formed kernel");
//!         println!("{:?}", step.info.reward_decomposition);
//!         if step.terminal {
//!             break;
//!         }
//!         obs = step.observation;
//!     }
//! }
//! ```

mod environment;
mod entropy;
mod error;
mod random;
mod seeded;
mod types;
mod world;

pub use environment::{Environment, RenderMode, Rendered};
pub use entropy::EntropySource;
pub use error::EnvError;
pub use random::RandomSource;
pub use seeded::SeededSource;
pub use types::{
    Diagnostics, RewardVector, Step, Transition, DECOMPOSITION_MISMATCH_KEY,
    REWARD_DECOMPOSITION_KEY,
};
pub use world::{Coordinates, WorldModel};
