//! Table-driven world model loaded from JSON.
//!
//! The JSON document lists every state with its coordinates, reward
//! components and flags, plus the transition kernel:
//!
//! ```text
//! {
//!   "shape": [2, 0],
//!   "actions": ["left", "right"],
//!   "reward_types": ["goal", "step"],
//!   "states": [
//!     { "coords": [0, 0], "rewards": { "step": -1.0 } },
//!     { "coords": [2, 0], "rewards": { "goal": 10.0 }, "terminal": true }
//!   ],
//!   "transitions": [
//!     { "from": [0, 0], "action": "right",
//!       "successors": [ { "to": [0, 0], "prob": 0.2 }, { "to": [2, 0], "prob": 0.8 } ] }
//!   ]
//! }
//! ```
//!
//! A `(state, action)` pair without a transition entry stays in place with
//! probability 1. A state's `total_reward` defaults to the sum of its
//! components, taken in `reward_types` order. Every state must lie within
//! `0..=shape[i]` on each axis, and no successor may be impassable.

use decomp_core::EnvMetadata;
use decomp_env::WorldModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Maximum deviation of a successor distribution's mass from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Errors raised while loading or validating a world table.
#[derive(Debug, Error)]
pub enum WorldLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State {0:?} has {1} coordinates, shape has {2} axes")]
    Dimension(Vec<i64>, usize, usize),

    #[error("State {0:?} lies outside shape {1:?}")]
    OutOfBounds(Vec<i64>, Vec<i64>),

    #[error("Duplicate state {0:?}")]
    DuplicateState(Vec<i64>),

    #[error("Duplicate action: {0}")]
    DuplicateAction(String),

    #[error("Duplicate reward type: {0}")]
    DuplicateRewardType(String),

    #[error("Unknown state {0:?}")]
    UnknownState(Vec<i64>),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown reward type {reward_type} at state {state:?}")]
    UnknownRewardType { state: Vec<i64>, reward_type: String },

    #[error("Invalid probability {prob} from {from:?} under {action}")]
    InvalidProbability { from: Vec<i64>, action: String, prob: f64 },

    #[error("Successor probabilities from {from:?} under {action} sum to {sum}")]
    KernelMass { from: Vec<i64>, action: String, sum: f64 },

    #[error("Successor {to:?} of {from:?} under {action} is impassable")]
    ImpassableSuccessor { from: Vec<i64>, action: String, to: Vec<i64> },
}

/// Serialized form of one state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSpec {
    pub coords: Vec<i64>,

    #[serde(default)]
    pub rewards: BTreeMap<String, f64>,

    /// Overrides the component sum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reward: Option<f64>,

    #[serde(default)]
    pub terminal: bool,

    #[serde(default)]
    pub impassable: bool,
}

/// Serialized form of one successor entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessorSpec {
    pub to: Vec<i64>,
    pub prob: f64,
}

/// Serialized form of one `(state, action)` distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub from: Vec<i64>,
    pub action: String,
    pub successors: Vec<SuccessorSpec>,
}

/// Serialized form of a whole world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSpec {
    pub shape: Vec<i64>,
    pub actions: Vec<String>,
    pub reward_types: Vec<String>,
    pub states: Vec<StateSpec>,

    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,

    #[serde(default)]
    pub metadata: EnvMetadata,
}

/// Per-state lookup record.
#[derive(Debug, Clone)]
struct StateRecord {
    rewards: BTreeMap<String, f64>,
    total_reward: f64,
    terminal: bool,
    impassable: bool,
}

/// A validated, immutable world model backed by lookup tables.
#[derive(Debug, Clone)]
pub struct TabularWorld {
    shape: Vec<i64>,
    actions: Vec<String>,
    reward_types: Vec<String>,
    metadata: EnvMetadata,

    /// States in declaration order
    states: Vec<Vec<i64>>,

    index: HashMap<Vec<i64>, usize>,
    records: Vec<StateRecord>,

    /// (state index, action index) -> ordered (successor index, prob)
    kernel: HashMap<(usize, usize), Vec<(usize, f64)>>,
}

impl TabularWorld {
    /// Loads and validates a world from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WorldLoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads and validates a world from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, WorldLoadError> {
        let spec: WorldSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    /// Validates a parsed spec and builds the lookup tables.
    pub fn from_spec(spec: WorldSpec) -> Result<Self, WorldLoadError> {
        if let Some(action) = first_duplicate(&spec.actions) {
            return Err(WorldLoadError::DuplicateAction(action.clone()));
        }
        if let Some(name) = first_duplicate(&spec.reward_types) {
            return Err(WorldLoadError::DuplicateRewardType(name.clone()));
        }

        let mut index = HashMap::new();
        let mut states = Vec::with_capacity(spec.states.len());
        let mut records = Vec::with_capacity(spec.states.len());

        for state in spec.states {
            let axes = state.coords.len();
            if axes != spec.shape.len() {
                return Err(WorldLoadError::Dimension(state.coords, axes, spec.shape.len()));
            }
            if state
                .coords
                .iter()
                .zip(&spec.shape)
                .any(|(c, max)| *c < 0 || c > max)
            {
                return Err(WorldLoadError::OutOfBounds(state.coords, spec.shape.clone()));
            }
            if let Some(name) = state
                .rewards
                .keys()
                .find(|name| !spec.reward_types.contains(*name))
            {
                return Err(WorldLoadError::UnknownRewardType {
                    reward_type: name.clone(),
                    state: state.coords,
                });
            }
            if index.insert(state.coords.clone(), states.len()).is_some() {
                return Err(WorldLoadError::DuplicateState(state.coords));
            }

            let total_reward = state.total_reward.unwrap_or_else(|| {
                spec.reward_types
                    .iter()
                    .filter_map(|name| state.rewards.get(name))
                    .sum()
            });
            records.push(StateRecord {
                rewards: state.rewards,
                total_reward,
                terminal: state.terminal,
                impassable: state.impassable,
            });
            states.push(state.coords);
        }

        let mut kernel = HashMap::new();
        for transition in spec.transitions {
            let from = *index
                .get(&transition.from)
                .ok_or_else(|| WorldLoadError::UnknownState(transition.from.clone()))?;
            let action = spec
                .actions
                .iter()
                .position(|a| *a == transition.action)
                .ok_or_else(|| WorldLoadError::UnknownAction(transition.action.clone()))?;

            let mut successors = Vec::with_capacity(transition.successors.len());
            let mut mass = 0.0;
            for succ in transition.successors {
                if !(0.0..=1.0).contains(&succ.prob) {
                    return Err(WorldLoadError::InvalidProbability {
                        from: transition.from,
                        action: transition.action,
                        prob: succ.prob,
                    });
                }
                let to = *index
                    .get(&succ.to)
                    .ok_or_else(|| WorldLoadError::UnknownState(succ.to.clone()))?;
                if records[to].impassable {
                    return Err(WorldLoadError::ImpassableSuccessor {
                        from: transition.from,
                        action: transition.action,
                        to: succ.to,
                    });
                }
                mass += succ.prob;
                successors.push((to, succ.prob));
            }

            if (mass - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(WorldLoadError::KernelMass {
                    from: transition.from,
                    action: transition.action,
                    sum: mass,
                });
            }
            kernel.insert((from, action), successors);
        }

        Ok(Self {
            shape: spec.shape,
            actions: spec.actions,
            reward_types: spec.reward_types,
            metadata: spec.metadata,
            states,
            index,
            records,
            kernel,
        })
    }

    /// Human-readable descriptions carried by the world file.
    pub fn metadata(&self) -> &EnvMetadata {
        &self.metadata
    }

    fn record(&self, state: &[i64]) -> Option<&StateRecord> {
        self.index.get(state).map(|&i| &self.records[i])
    }

    fn action_index(&self, action: &str) -> Option<usize> {
        self.actions.iter().position(|a| a == action)
    }

    /// Ordered `(successor index, prob)` for a known state and action.
    fn distribution(&self, state: &[i64], action: &str) -> Option<Vec<(usize, f64)>> {
        let s = *self.index.get(state)?;
        let a = self.action_index(action)?;
        Some(
            self.kernel
                .get(&(s, a))
                .cloned()
                .unwrap_or_else(|| vec![(s, 1.0)]),
        )
    }
}

fn first_duplicate(names: &[String]) -> Option<&String> {
    let mut seen = HashSet::new();
    names.iter().find(|name| !seen.insert(name.as_str()))
}

impl WorldModel for TabularWorld {
    type State = Vec<i64>;
    type Action = String;
    type Raw = Vec<i64>;

    fn shape(&self) -> &[i64] {
        &self.shape
    }

    fn actions(&self) -> &[String] {
        &self.actions
    }

    fn reward_types(&self) -> &[String] {
        &self.reward_types
    }

    fn states(&self) -> Vec<Vec<i64>> {
        self.states.clone()
    }

    fn successors(&self, state: &Vec<i64>, action: &String) -> Vec<Vec<i64>> {
        self.distribution(state, action)
            .unwrap_or_default()
            .into_iter()
            .map(|(i, _)| self.states[i].clone())
            .collect()
    }

    fn transition_prob(&self, state: &Vec<i64>, action: &String, next: &Vec<i64>) -> f64 {
        let Some(target) = self.index.get(next) else {
            return 0.0;
        };
        self.distribution(state, action)
            .unwrap_or_default()
            .into_iter()
            .filter(|(i, _)| i == target)
            .map(|(_, p)| p)
            .sum()
    }

    fn reward(&self, reward_type: &str, state: &Vec<i64>) -> f64 {
        self.record(state)
            .and_then(|r| r.rewards.get(reward_type))
            .copied()
            .unwrap_or(0.0)
    }

    fn total_reward(&self, state: &Vec<i64>) -> f64 {
        self.record(state).map(|r| r.total_reward).unwrap_or(0.0)
    }

    fn is_terminal(&self, state: &Vec<i64>) -> bool {
        self.record(state).map(|r| r.terminal).unwrap_or(false)
    }

    fn is_impassable(&self, state: &Vec<i64>) -> bool {
        self.record(state).map(|r| r.impassable).unwrap_or(false)
    }

    fn statify(&self, raw: Vec<i64>) -> Vec<i64> {
        raw
    }
}
