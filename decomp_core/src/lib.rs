//! Decomp Core - Decomposed-Reward Reinforcement Learning Environments
//!
//! This library provides two engines for reward-decomposition research:
//! 1. **Stochastic MDP Driver**: samples transitions over any `WorldModel`
//!    by inverse-CDF over the world's successor order, and returns the
//!    landing state with its per-component reward vector
//! 2. **Reward-Decomposition Reconciler**: renames raw simulator components
//!    into a public vocabulary and flags (never rejects) decompositions that
//!    do not sum to the scalar reward
//!
//! `MdpEnv` and `HivSimEnv` put these behind the gym-style
//! `decomp_env::Environment` surface.

pub mod hiv;
pub mod mdp;
pub mod mdp_env;
pub mod reconcile;

#[cfg(test)]
mod fixtures;

// Re-export key types for convenience
pub use hiv::{HivAction, HivObservation, HivSimEnv, HivSimulator};
pub use mdp::{MdpDriver, KERNEL_TOLERANCE};
pub use mdp_env::{EnvMetadata, MdpEnv};
pub use reconcile::{ComponentAliases, Reconciler, ReconcilerConfig, Reconciliation};
