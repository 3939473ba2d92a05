//! Test fixtures: a table-backed world model and a scripted random source.

use decomp_env::{RandomSource, WorldModel};
use std::collections::{HashMap, HashSet, VecDeque};

pub type Cell = (i64, i64);

/// World model built from explicit tables.
#[derive(Debug, Clone, Default)]
pub struct TableWorld {
    pub shape: Vec<i64>,
    pub actions: Vec<&'static str>,
    pub reward_types: Vec<String>,
    pub states: Vec<Cell>,
    pub kernel: HashMap<(Cell, &'static str), Vec<(Cell, f64)>>,
    pub rewards: HashMap<String, HashMap<Cell, f64>>,
    pub terminals: HashSet<Cell>,
    pub impassable: HashSet<Cell>,
}

impl TableWorld {
    pub fn new(shape: Vec<i64>, actions: Vec<&'static str>, reward_types: &[&str]) -> Self {
        Self {
            shape,
            actions,
            reward_types: reward_types.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_state(mut self, cell: Cell, rewards: &[(&str, f64)]) -> Self {
        self.states.push(cell);
        for (name, value) in rewards {
            self.rewards
                .entry(name.to_string())
                .or_default()
                .insert(cell, *value);
        }
        self
    }

    pub fn with_terminal(mut self, cell: Cell) -> Self {
        self.terminals.insert(cell);
        self
    }

    pub fn with_impassable(mut self, cell: Cell) -> Self {
        self.impassable.insert(cell);
        self
    }

    pub fn with_transition(
        mut self,
        from: Cell,
        action: &'static str,
        successors: &[(Cell, f64)],
    ) -> Self {
        self.kernel.insert((from, action), successors.to_vec());
        self
    }

    /// Fills every unset `(state, action)` pair with a self-loop.
    pub fn with_self_loops(mut self) -> Self {
        for state in self.states.clone() {
            for action in self.actions.clone() {
                self.kernel
                    .entry((state, action))
                    .or_insert_with(|| vec![(state, 1.0)]);
            }
        }
        self
    }

    /// Three-cell corridor: start at (0,0), slip-prone move right, goal at (2,0).
    pub fn corridor() -> Self {
        TableWorld::new(vec![2, 0], vec!["left", "right"], &["goal", "step"])
            .with_state((0, 0), &[("goal", 0.0), ("step", -1.0)])
            .with_state((1, 0), &[("goal", 0.0), ("step", -1.0)])
            .with_state((2, 0), &[("goal", 10.0), ("step", -1.0)])
            .with_terminal((2, 0))
            .with_transition((0, 0), "right", &[((0, 0), 0.3), ((1, 0), 0.7)])
            .with_transition((1, 0), "right", &[((1, 0), 0.2), ((2, 0), 0.8)])
            .with_transition((1, 0), "left", &[((0, 0), 1.0)])
            .with_self_loops()
    }
}

impl WorldModel for TableWorld {
    type State = Cell;
    type Action = &'static str;
    type Raw = (i64, i64);

    fn shape(&self) -> &[i64] {
        &self.shape
    }

    fn actions(&self) -> &[&'static str] {
        &self.actions
    }

    fn reward_types(&self) -> &[String] {
        &self.reward_types
    }

    fn states(&self) -> Vec<Cell> {
        self.states.clone()
    }

    fn successors(&self, state: &Cell, action: &&'static str) -> Vec<Cell> {
        self.kernel
            .get(&(*state, *action))
            .map(|succ| succ.iter().map(|(s, _)| *s).collect())
            .unwrap_or_default()
    }

    fn transition_prob(&self, state: &Cell, action: &&'static str, next: &Cell) -> f64 {
        self.kernel
            .get(&(*state, *action))
            .and_then(|succ| succ.iter().find(|(s, _)| s == next))
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    fn reward(&self, reward_type: &str, state: &Cell) -> f64 {
        self.rewards
            .get(reward_type)
            .and_then(|table| table.get(state))
            .copied()
            .unwrap_or(0.0)
    }

    fn total_reward(&self, state: &Cell) -> f64 {
        self.reward_types
            .iter()
            .map(|name| self.reward(name, state))
            .sum()
    }

    fn is_terminal(&self, state: &Cell) -> bool {
        self.terminals.contains(state)
    }

    fn is_impassable(&self, state: &Cell) -> bool {
        self.impassable.contains(state)
    }

    fn statify(&self, raw: (i64, i64)) -> Cell {
        raw
    }
}

/// Random source that replays fixed draws, then falls back to zero.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pub rolls: VecDeque<f64>,
    pub choices: VecDeque<usize>,
    pub reseeded_with: Option<u64>,
}

impl ScriptedSource {
    pub fn rolls(rolls: &[f64]) -> Self {
        Self {
            rolls: rolls.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn choices(choices: &[usize]) -> Self {
        Self {
            choices: choices.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl RandomSource for ScriptedSource {
    fn choice(&mut self, n: usize) -> usize {
        self.choices.pop_front().unwrap_or(0) % n
    }

    fn rand(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(0.0)
    }

    fn reseed(&mut self, seed: u64) {
        self.reseeded_with = Some(seed);
    }

    fn seed(&self) -> Option<u64> {
        self.reseeded_with
    }
}
