//! Decomp Rollout Harness
//!
//! Seeded, reproducible rollouts over decomposed-reward environments:
//! - **Tabular worlds**: any topology described as a JSON table becomes a
//!   validated `WorldModel`
//! - **Rollout runner**: uniform-random policy, per-component returns,
//!   decomposition-mismatch counts
//! - **Export**: JSON summaries for offline analysis
//!
//! # Determinism
//!
//! All entropy is derived from one 64-bit master seed. The environment and
//! the policy get separately salted streams, so any run is reproducible from
//! its seed number.
//!
//! # Usage
//!
//! ```ignore
//! use decomp_core::MdpEnv;
//! use decomp_env::{SeededSource, WorldModel};
//! use decomp_sim::{RolloutConfig, RolloutRunner, TabularWorld};
//!
//! let world = TabularWorld::from_path("worlds/slippery_corridor.json")?;
//! let actions = world.actions().to_vec();
//! let env = MdpEnv::new(world, SeededSource::new(0));
//!
//! let mut runner = RolloutRunner::new(env, actions, RolloutConfig::default());
//! let summary = runner.run()?;
//! ```

mod config;
mod exporter;
mod runner;
mod tabular;

pub use config::{RolloutConfig, ENV_SEED_SALT, POLICY_SEED_SALT};
pub use exporter::RolloutExport;
pub use runner::{EpisodeResult, RolloutRunner, RolloutSummary};
pub use tabular::{
    StateSpec, SuccessorSpec, TabularWorld, TransitionSpec, WorldLoadError, WorldSpec,
    PROBABILITY_TOLERANCE,
};
