//! HIV treatment environment.
//!
//! Wraps an externally supplied HIV dynamics simulator (six-compartment
//! within-host model, four drug-combination actions) behind the gym-style
//! `Environment` surface. The simulator reports its scalar reward and, on
//! request, the features that scalar is a linear combination of; those
//! features are the reward decomposition.
//!
//! The simulator names two of its features "Episode value 1/2"; the alias
//! table below maps them to the public side-effect names.

mod env;
mod simulator;

pub use env::HivSimEnv;
pub use simulator::{HivAction, HivObservation, HivSimulator};

use crate::reconcile::ComponentAliases;

/// What each entry of an HIV observation means.
pub const STATE_MEANINGS: [&str; 6] = [
    "T1: non-infected CD4+ T-lymphocytes [cells / ml]",
    "T1*: infected CD4+ T-lymphocytes [cells / ml]",
    "T2: non-infected macrophages [cells / ml]",
    "T2*: infected macrophages [cells / ml]",
    "V: number of free HI viruses [copies / ml]",
    "E: number of cytotoxic T-lymphocytes [cells / ml]",
];

/// Public reward component names.
pub const REWARD_TYPES: [&str; 4] = [
    "V: Free HI viruses",
    "RTI Side Effect",
    "PI Side Effect",
    "E: Cytotoxic T-lymphocytes (Immune Response)",
];

/// Simulator feature keys renamed on the way out.
pub const RAW_RTI_KEY: &str = "Episode value 1";
pub const RAW_PI_KEY: &str = "Episode value 2";

/// Renaming table from simulator feature keys to `REWARD_TYPES`.
pub fn component_aliases() -> ComponentAliases {
    ComponentAliases::new()
        .with_alias(RAW_RTI_KEY, REWARD_TYPES[1])
        .with_alias(RAW_PI_KEY, REWARD_TYPES[2])
}
