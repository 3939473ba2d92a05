//! World model abstraction consumed by the MDP driver.

use std::fmt::Debug;
use std::hash::Hash;

/// The capability set a concrete topology must provide to be driven.
///
/// Implementations own their tables (grids, cliffs, reward maps, ...) and
/// only answer queries; the driver never sees the underlying representation.
///
/// # Contract
///
/// - `successors` must yield the same order for the same `(state, action)`
///   every time it is asked. The driver accumulates probability over that
///   order, so it is load-bearing.
/// - For every `(state, action)` pair, `transition_prob` summed over
///   `successors` must equal 1.0 (within float tolerance).
/// - `reward` must answer for every name in `reward_types`.
pub trait WorldModel {
    /// Opaque state value. Only equality and hashing are required.
    type State: Clone + Eq + Hash + Debug;

    /// Action value, drawn from the ordered set returned by `actions`.
    type Action: Clone + Eq + Debug;

    /// Raw representation accepted by `statify`.
    type Raw;

    /// Bounding extents, one entry per axis.
    fn shape(&self) -> &[i64];

    /// Finite ordered action set.
    fn actions(&self) -> &[Self::Action];

    /// Finite ordered set of reward component names.
    fn reward_types(&self) -> &[String];

    /// All valid states.
    fn states(&self) -> Vec<Self::State>;

    /// Ordered successors of `state` under `action`.
    fn successors(&self, state: &Self::State, action: &Self::Action) -> Vec<Self::State>;

    /// Probability of landing in `next` from `state` under `action`.
    fn transition_prob(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next: &Self::State,
    ) -> f64;

    /// Value of one reward component at `state`.
    fn reward(&self, reward_type: &str, state: &Self::State) -> f64;

    /// Scalar reward at `state`.
    fn total_reward(&self, state: &Self::State) -> f64;

    /// Whether `state` ends the episode.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Whether `state` cannot be occupied.
    fn is_impassable(&self, state: &Self::State) -> bool;

    /// Canonicalizes a raw representation into a state.
    fn statify(&self, raw: Self::Raw) -> Self::State;

    /// States an episode may start from.
    ///
    /// Defaults to every state that is neither terminal nor impassable.
    fn nonterminal_states(&self) -> Vec<Self::State> {
        self.states()
            .into_iter()
            .filter(|s| !self.is_terminal(s) && !self.is_impassable(s))
            .collect()
    }
}

/// Integer coordinates of a state, used for bounds checks.
pub trait Coordinates {
    /// Returns one coordinate per axis.
    fn coordinates(&self) -> Vec<i64>;
}

impl Coordinates for (i64, i64) {
    fn coordinates(&self) -> Vec<i64> {
        vec![self.0, self.1]
    }
}

impl Coordinates for (usize, usize) {
    fn coordinates(&self) -> Vec<i64> {
        vec![self.0 as i64, self.1 as i64]
    }
}

impl<const N: usize> Coordinates for [i64; N] {
    fn coordinates(&self) -> Vec<i64> {
        self.to_vec()
    }
}

impl Coordinates for Vec<i64> {
    fn coordinates(&self) -> Vec<i64> {
        self.clone()
    }
}
