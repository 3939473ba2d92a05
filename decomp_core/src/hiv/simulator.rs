//! Contract for the external HIV dynamics simulator.

use decomp_env::EnvError;
use nalgebra::Vector6;
use serde::{Deserialize, Serialize};

/// Observation [T1, T1*, T2, T2*, V, E].
pub type HivObservation = Vector6<f64>;

/// Drug combination applied for one control interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HivAction {
    /// No treatment
    None,

    /// Reverse-transcriptase inhibitor
    Rti,

    /// Protease inhibitor
    Pi,

    /// Both inhibitors
    RtiAndPi,
}

impl HivAction {
    /// All actions in index order.
    pub fn all() -> [HivAction; 4] {
        [HivAction::None, HivAction::Rti, HivAction::Pi, HivAction::RtiAndPi]
    }

    /// Action index (0-3).
    pub fn index(&self) -> usize {
        match self {
            HivAction::None => 0,
            HivAction::Rti => 1,
            HivAction::Pi => 2,
            HivAction::RtiAndPi => 3,
        }
    }

    pub fn meaning(&self) -> &'static str {
        match self {
            HivAction::None => "None",
            HivAction::Rti => "RTI",
            HivAction::Pi => "PI",
            HivAction::RtiAndPi => "RTI & PI",
        }
    }

    /// Whether the reverse-transcriptase inhibitor is applied.
    pub fn rti(&self) -> bool {
        matches!(self, HivAction::Rti | HivAction::RtiAndPi)
    }

    /// Whether the protease inhibitor is applied.
    pub fn pi(&self) -> bool {
        matches!(self, HivAction::Pi | HivAction::RtiAndPi)
    }
}

impl TryFrom<usize> for HivAction {
    type Error = EnvError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        HivAction::all()
            .get(index)
            .copied()
            .ok_or_else(|| EnvError::invalid_action(format!("HIV action index {} (expected 0-3)", index)))
    }
}

impl std::fmt::Display for HivAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.meaning())
    }
}

/// The wrapped HIV treatment simulator.
///
/// Implementations integrate the within-host dynamics; the environment only
/// sequences calls and reconciles rewards.
pub trait HivSimulator {
    /// Restores the initial patient state.
    fn reset(&mut self);

    /// Current observation.
    fn observe(&self) -> HivObservation;

    /// Applies `action` for one control interval.
    ///
    /// Returns the scalar reward (computed after the state update) and the
    /// next observation.
    fn perform_action(&mut self, action: HivAction) -> Result<(f64, HivObservation), EnvError>;

    /// Features whose sum is the last scalar reward, keyed by simulator name.
    fn typed_reward(&self, action: HivAction) -> Vec<(String, f64)>;

    /// Whether the episode is over.
    fn is_done(&self) -> bool;

    /// Reseeds any stochasticity in the simulator.
    fn reseed(&mut self, _seed: u64) {}
}
