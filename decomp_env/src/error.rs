//! Error types for the decomposed-reward environment abstraction.

use thiserror::Error;

/// Errors that can occur while driving an environment.
#[derive(Debug, Error)]
pub enum EnvError {
    /// World model has no non-terminal state to start from
    #[error("Empty state space: world model has no non-terminal states")]
    EmptyStateSpace,

    /// Transition kernel did not cover the roll (probabilities sum below 1)
    #[error("No successor state for {state} under {action} (roll {roll:.6}, cumulative {cumulative:.6})")]
    NoSuccessor {
        state: String,
        action: String,
        roll: f64,
        cumulative: f64,
    },

    /// `step` called before `reset`
    #[error("Environment not reset")]
    NotReset,

    /// `step` called after a terminal transition
    #[error("Episode finished: reset before stepping again")]
    EpisodeFinished,

    /// Action outside the environment's action set
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Wrapped external simulator failed
    #[error("Simulator error: {0}")]
    Simulator(String),
}

impl EnvError {
    /// Creates a no-successor error from debug renderings of the inputs.
    pub fn no_successor(
        state: impl std::fmt::Debug,
        action: impl std::fmt::Debug,
        roll: f64,
        cumulative: f64,
    ) -> Self {
        Self::NoSuccessor {
            state: format!("{:?}", state),
            action: format!("{:?}", action),
            roll,
            cumulative,
        }
    }

    /// Creates an invalid-action error.
    pub fn invalid_action(action: impl std::fmt::Display) -> Self {
        Self::InvalidAction(action.to_string())
    }

    /// Creates a simulator error.
    pub fn simulator(msg: impl Into<String>) -> Self {
        Self::Simulator(msg.into())
    }

    /// Returns true if the error signals a malformed world model.
    ///
    /// These are never retried.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::EmptyStateSpace | Self::NoSuccessor { .. })
    }
}
