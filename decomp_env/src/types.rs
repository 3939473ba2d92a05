//! Common types for the decomposed-reward environment abstraction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Diagnostics key under which the per-component rewards are reported.
pub const REWARD_DECOMPOSITION_KEY: &str = "reward_decomposition";

/// Diagnostics key under which a decomposition mismatch is flagged.
pub const DECOMPOSITION_MISMATCH_KEY: &str = "warning_decomposition_mismatch";

/// Mapping from reward component name to value.
///
/// Iteration order is by component name, so two vectors with the same
/// contents always render and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardVector(BTreeMap<String, f64>);

impl RewardVector {
    /// Creates an empty reward vector.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets a component, replacing any previous value.
    pub fn insert(&mut self, component: impl Into<String>, value: f64) {
        self.0.insert(component.into(), value);
    }

    /// Adds `value` to a component, creating it at zero if absent.
    pub fn accumulate(&mut self, component: impl Into<String>, value: f64) {
        *self.0.entry(component.into()).or_insert(0.0) += value;
    }

    /// Returns a component value.
    pub fn get(&self, component: &str) -> Option<f64> {
        self.0.get(component).copied()
    }

    /// Iterates `(component, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Component names.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of all components.
    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for RewardVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for RewardVector {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

impl IntoIterator for RewardVector {
    type Item = (String, f64);
    type IntoIter = std::collections::btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One sampled transition, produced by the driver and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    /// Landing state
    pub next_state: S,

    /// Per-component rewards at the landing state
    pub rewards: RewardVector,

    /// Scalar reward at the landing state
    pub total_reward: f64,

    /// Landing state ends the episode
    pub terminal: bool,
}

/// Per-step diagnostics returned alongside the scalar reward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Rounded per-component rewards
    pub reward_decomposition: RewardVector,

    /// Set only when the components failed to sum to the scalar reward
    #[serde(
        rename = "warning_decomposition_mismatch",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub decomposition_mismatch: bool,
}

impl Diagnostics {
    /// Creates diagnostics from a reconciled decomposition.
    pub fn new(reward_decomposition: RewardVector, decomposition_mismatch: bool) -> Self {
        Self {
            reward_decomposition,
            decomposition_mismatch,
        }
    }
}

/// Result of one `Environment::step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f64,
    pub terminal: bool,
    pub info: Diagnostics,
}
