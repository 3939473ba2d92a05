//! Gym-style environment over any world model.

use crate::mdp::MdpDriver;
use crate::reconcile::Reconciler;
use decomp_env::{
    Coordinates, EnvError, Environment, RandomSource, RenderMode, Rendered, Step, WorldModel,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Human-readable descriptions supplied by the topology's author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvMetadata {
    /// What each state coordinate means
    #[serde(default)]
    pub state_meanings: Vec<String>,

    /// Meaning of each action, in action order
    #[serde(default)]
    pub action_meanings: Vec<String>,
}

/// Environment that steps an `MdpDriver` and reconciles each transition.
///
/// Holds the current state only; no trajectory history is kept.
pub struct MdpEnv<W: WorldModel, R: RandomSource> {
    driver: MdpDriver<W, R>,
    reconciler: Reconciler,
    metadata: EnvMetadata,

    /// Current state (None until the first reset)
    state: Option<W::State>,

    /// Last transition was terminal
    done: bool,
}

impl<W: WorldModel, R: RandomSource> MdpEnv<W, R> {
    /// Creates an environment over `world`, drawing from `rng`.
    pub fn new(world: W, rng: R) -> Self {
        Self {
            driver: MdpDriver::new(world, rng),
            reconciler: Reconciler::new(),
            metadata: EnvMetadata::default(),
            state: None,
            done: false,
        }
    }

    pub fn with_metadata(mut self, metadata: EnvMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_reconciler(mut self, reconciler: Reconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    pub fn driver(&self) -> &MdpDriver<W, R> {
        &self.driver
    }

    /// Current state, if the environment has been reset.
    pub fn current_state(&self) -> Option<&W::State> {
        self.state.as_ref()
    }

    /// Whether the last step landed in a terminal state.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Bounds and passability check, see `MdpDriver::valid`.
    pub fn valid(&self, state: &W::State) -> bool
    where
        W::State: Coordinates,
    {
        self.driver.valid(state)
    }
}

impl<W: WorldModel, R: RandomSource> Environment for MdpEnv<W, R> {
    type Observation = W::State;
    type Action = W::Action;

    fn reset(&mut self) -> Result<W::State, EnvError> {
        let state = self.driver.reset()?;
        self.state = Some(state.clone());
        self.done = false;
        Ok(state)
    }

    fn step(&mut self, action: W::Action) -> Result<Step<W::State>, EnvError> {
        let state = self.state.as_ref().ok_or(EnvError::NotReset)?;
        if self.done {
            return Err(EnvError::EpisodeFinished);
        }
        if !self.driver.actions().contains(&action) {
            return Err(EnvError::invalid_action(format!("{:?}", action)));
        }

        let transition = self.driver.act(state, &action)?;
        let reconciliation = self
            .reconciler
            .reconcile(transition.total_reward, transition.rewards);

        if reconciliation.mismatch {
            debug!("step: mismatch landing in {:?}", transition.next_state);
        }

        self.state = Some(transition.next_state.clone());
        self.done = transition.terminal;

        Ok(Step {
            observation: transition.next_state,
            reward: transition.total_reward,
            terminal: transition.terminal,
            info: reconciliation.into_diagnostics(),
        })
    }

    fn render(&self, mode: RenderMode) -> Result<Rendered<W::State>, EnvError> {
        let state = self.state.as_ref().ok_or(EnvError::NotReset)?;
        Ok(match mode {
            RenderMode::Raw => Rendered::Raw(state.clone()),
            RenderMode::Print => Rendered::Text(format!(
                "state: {:?}\nterminal: {}\nreward types: {}",
                state,
                self.done,
                self.driver.reward_types().join(", ")
            )),
        })
    }

    fn reseed(&mut self, seed: u64) {
        self.driver.reseed(seed);
    }

    fn state_meanings(&self) -> Vec<String> {
        if !self.metadata.state_meanings.is_empty() {
            return self.metadata.state_meanings.clone();
        }
        (0..self.driver.shape().len())
            .map(|axis| format!("axis {}", axis))
            .collect()
    }

    fn action_meanings(&self) -> Vec<String> {
        if !self.metadata.action_meanings.is_empty() {
            return self.metadata.action_meanings.clone();
        }
        self.driver
            .actions()
            .iter()
            .map(|a| format!("{:?}", a))
            .collect()
    }

    fn reward_types(&self) -> Vec<String> {
        self.driver.reward_types().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ScriptedSource, TableWorld};
    use decomp_env::SeededSource;

    #[test]
    fn test_step_before_reset() {
        let mut env = MdpEnv::new(TableWorld::corridor(), SeededSource::new(1));
        assert!(matches!(env.step("right"), Err(EnvError::NotReset)));
        assert!(matches!(env.render(RenderMode::Raw), Err(EnvError::NotReset)));
    }

    #[test]
    fn test_episode_reaches_goal() {
        // choice 0 -> start (0,0); rolls: 0.5 -> (1,0), 0.5 -> (2,0)
        let rng = ScriptedSource {
            rolls: [0.5, 0.5].into_iter().collect(),
            choices: [0].into_iter().collect(),
            reseeded_with: None,
        };
        let mut env = MdpEnv::new(TableWorld::corridor(), rng);

        assert_eq!(env.reset().unwrap(), (0, 0));

        let first = env.step("right").unwrap();
        assert_eq!(first.observation, (1, 0));
        assert_eq!(first.reward, -1.0);
        assert!(!first.terminal);
        assert!(!first.info.decomposition_mismatch);

        let second = env.step("right").unwrap();
        assert_eq!(second.observation, (2, 0));
        assert_eq!(second.reward, 9.0);
        assert!(second.terminal);
        assert_eq!(second.info.reward_decomposition.get("goal"), Some(10.0));
        assert_eq!(second.info.reward_decomposition.get("step"), Some(-1.0));

        assert!(env.is_done());
        assert!(matches!(env.step("left"), Err(EnvError::EpisodeFinished)));

        env.reset().unwrap();
        assert!(!env.is_done());
    }

    #[test]
    fn test_invalid_action() {
        let mut env = MdpEnv::new(TableWorld::corridor(), SeededSource::new(1));
        env.reset().unwrap();
        assert!(matches!(env.step("jump"), Err(EnvError::InvalidAction(_))));
    }

    #[test]
    fn test_mismatch_flagged_not_fatal() {
        let mut world = TableWorld::corridor();
        // At precision 0 the 0.5 component rounds to 1.0 and the sum drifts
        world
            .rewards
            .get_mut("goal")
            .unwrap()
            .insert((1, 0), 0.5);
        let rng = ScriptedSource {
            rolls: [0.9].into_iter().collect(),
            choices: [0].into_iter().collect(),
            reseeded_with: None,
        };
        let reconciler = Reconciler::new().with_config(crate::ReconcilerConfig {
            precision: 0,
            tolerance: 1e-8,
        });
        let mut env = MdpEnv::new(world, rng).with_reconciler(reconciler);
        env.reset().unwrap();

        let step = env.step("right").unwrap();
        assert_eq!(step.observation, (1, 0));
        assert_eq!(step.reward, -0.5);
        assert!(step.info.decomposition_mismatch);
    }

    #[test]
    fn test_render_print() {
        let mut env = MdpEnv::new(TableWorld::corridor(), ScriptedSource::choices(&[1]));
        env.reset().unwrap();

        let text = env.render(RenderMode::Print).unwrap();
        let text = text.as_text().unwrap();
        assert!(text.contains("state: (1, 0)"));
        assert!(text.contains("goal, step"));

        assert_eq!(env.render(RenderMode::Raw).unwrap(), Rendered::Raw((1, 0)));
    }

    #[test]
    fn test_metadata_defaults_and_overrides() {
        let env = MdpEnv::new(TableWorld::corridor(), SeededSource::new(1));
        assert_eq!(env.state_meanings(), vec!["axis 0", "axis 1"]);
        assert_eq!(env.action_meanings(), vec!["\"left\"", "\"right\""]);
        assert_eq!(env.reward_types(), vec!["goal", "step"]);

        let env = env.with_metadata(EnvMetadata {
            state_meanings: vec!["column".into(), "row".into()],
            action_meanings: vec!["Left".into(), "Right".into()],
        });
        assert_eq!(env.state_meanings(), vec!["column", "row"]);
        assert_eq!(env.action_meanings(), vec!["Left", "Right"]);
    }

    #[test]
    fn test_reseed_reaches_driver() {
        let mut env = MdpEnv::new(TableWorld::corridor(), ScriptedSource::default());
        env.reseed(77);
        assert_eq!(env.driver().random_source().seed(), Some(77));
    }

    #[test]
    fn test_valid_passthrough() {
        let env = MdpEnv::new(TableWorld::corridor(), SeededSource::new(1));
        assert!(env.valid(&(2, 0)));
        assert!(!env.valid(&(0, 1)));
    }
}
