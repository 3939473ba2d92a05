//! Reward-Decomposition Reconciler
//! ===============================
//!
//! Checks that a decomposed reward sums to the scalar reward it claims to
//! explain. The scalar is ground truth; the decomposition is telemetry. A
//! mismatch is logged and flagged, and the transition goes through anyway.
//!
//! # Order of operations
//!
//! ```text
//! raw components --alias/merge--> public components --round(3)--> Σ
//!                                                                 |
//!                         mismatch = |Σ - total| > 1e-8  or  !finite
//! ```
//!
//! Rounding happens before the sum so the check validates exactly what the
//! caller receives.

use decomp_env::{Diagnostics, RewardVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Precision and tolerance for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Decimal digits components are rounded to before summing
    pub precision: u32,

    /// Maximum allowed |Σ components - total|
    pub tolerance: f64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            precision: 3,
            tolerance: 1e-8,
        }
    }
}

/// Renaming table from a simulator's raw component keys to public names.
///
/// Keys without an alias pass through unchanged. Several raw keys may share
/// one public name; their values are summed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentAliases {
    aliases: HashMap<String, String>,
}

impl ComponentAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `raw -> public`.
    pub fn with_alias(mut self, raw: impl Into<String>, public: impl Into<String>) -> Self {
        self.aliases.insert(raw.into(), public.into());
        self
    }

    /// Public name for a raw key.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        self.aliases.get(raw).map(String::as_str).unwrap_or(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<R: Into<String>, P: Into<String>> FromIterator<(R, P)> for ComponentAliases {
    fn from_iter<I: IntoIterator<Item = (R, P)>>(iter: I) -> Self {
        Self {
            aliases: iter
                .into_iter()
                .map(|(raw, public)| (raw.into(), public.into()))
                .collect(),
        }
    }
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Renamed, merged and rounded components
    pub components: RewardVector,

    /// Sum of the rounded components
    pub reward_sum: f64,

    /// Components failed to reproduce the scalar reward
    pub mismatch: bool,
}

impl Reconciliation {
    /// Converts into the per-step diagnostics record.
    pub fn into_diagnostics(self) -> Diagnostics {
        Diagnostics::new(self.components, self.mismatch)
    }
}

/// Reconciles decomposed rewards against scalar rewards.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
    aliases: ComponentAliases,
}

impl Reconciler {
    /// Creates a reconciler with default precision (3) and tolerance (1e-8).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs the renaming table applied before rounding.
    pub fn with_aliases(mut self, aliases: ComponentAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn aliases(&self) -> &ComponentAliases {
        &self.aliases
    }

    /// Rounds half away from zero to the configured precision.
    ///
    /// Values too large to scale are returned unchanged.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.config.precision as i32);
        let scaled = value * factor;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round() / factor
    }

    /// Renames, rounds and checks `components` against `total_reward`.
    ///
    /// Never fails. A mismatch emits a warning and sets `mismatch`.
    pub fn reconcile<I, K>(&self, total_reward: f64, components: I) -> Reconciliation
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut merged = RewardVector::new();
        for (raw, value) in components {
            merged.accumulate(self.aliases.resolve(raw.as_ref()), value);
        }

        let components: RewardVector = merged
            .into_iter()
            .map(|(name, value)| (name, self.round(value)))
            .collect();
        let reward_sum = components.sum();

        let mismatch = !total_reward.is_finite()
            || !reward_sum.is_finite()
            || (reward_sum - total_reward).abs() > self.config.tolerance;

        if mismatch {
            warn!(
                "Decomposition does not match returned reward: reward {} decomposition {:?} (sum: {})",
                total_reward, components, reward_sum
            );
        }

        Reconciliation {
            components,
            reward_sum,
            mismatch,
        }
    }
}
