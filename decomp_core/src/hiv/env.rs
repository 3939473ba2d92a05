//! Gym-style wrapper over an `HivSimulator`.

use super::simulator::{HivAction, HivObservation, HivSimulator};
use super::{component_aliases, REWARD_TYPES, STATE_MEANINGS};
use crate::reconcile::Reconciler;
use decomp_env::{EnvError, Environment, RenderMode, Rendered, Step};
use tracing::debug;

/// HIV treatment environment with decomposed rewards.
pub struct HivSimEnv<S: HivSimulator> {
    simulator: S,
    reconciler: Reconciler,
}

impl<S: HivSimulator> HivSimEnv<S> {
    /// Wraps `simulator` with the HIV component alias table installed.
    pub fn new(simulator: S) -> Self {
        Self {
            simulator,
            reconciler: Reconciler::new().with_aliases(component_aliases()),
        }
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Steps with an action index (0-3).
    pub fn step_index(&mut self, index: usize) -> Result<Step<HivObservation>, EnvError> {
        let action = HivAction::try_from(index)?;
        self.step(action)
    }
}

impl<S: HivSimulator> Environment for HivSimEnv<S> {
    type Observation = HivObservation;
    type Action = HivAction;

    fn reset(&mut self) -> Result<HivObservation, EnvError> {
        self.simulator.reset();
        Ok(self.simulator.observe())
    }

    fn step(&mut self, action: HivAction) -> Result<Step<HivObservation>, EnvError> {
        let (reward, next) = self.simulator.perform_action(action)?;
        // Features are read after the update, as is the scalar reward
        let typed = self.simulator.typed_reward(action);
        let reconciliation = self.reconciler.reconcile(reward, typed);
        let terminal = self.simulator.is_done();

        debug!(
            "hiv step: {} reward {:.3} terminal {} mismatch {}",
            action, reward, terminal, reconciliation.mismatch
        );

        Ok(Step {
            observation: next,
            reward,
            terminal,
            info: reconciliation.into_diagnostics(),
        })
    }

    fn render(&self, mode: RenderMode) -> Result<Rendered<HivObservation>, EnvError> {
        let obs = self.simulator.observe();
        Ok(match mode {
            RenderMode::Raw => Rendered::Raw(obs),
            RenderMode::Print => Rendered::Text(
                STATE_MEANINGS
                    .iter()
                    .zip(obs.iter())
                    .map(|(meaning, value)| {
                        let short = meaning.split(':').next().unwrap_or_default();
                        format!("{}: {}", short, self.reconciler.round(*value))
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        })
    }

    fn reseed(&mut self, seed: u64) {
        self.simulator.reseed(seed);
    }

    fn state_meanings(&self) -> Vec<String> {
        STATE_MEANINGS.iter().map(|s| s.to_string()).collect()
    }

    fn action_meanings(&self) -> Vec<String> {
        HivAction::all()
            .iter()
            .map(|a| a.meaning().to_string())
            .collect()
    }

    fn reward_types(&self) -> Vec<String> {
        REWARD_TYPES.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hiv::{RAW_PI_KEY, RAW_RTI_KEY};
    use approx::assert_abs_diff_eq;

    /// Linear stand-in for the ODE model: each compartment drifts by a
    /// fixed amount per interval, drugs slow viral growth.
    struct StubPatient {
        state: HivObservation,
        steps: usize,
        max_steps: usize,
        /// Added to the scalar reward only, to force a mismatch
        reward_bias: f64,
        seed: Option<u64>,
    }

    impl StubPatient {
        fn new() -> Self {
            Self {
                state: Self::initial(),
                steps: 0,
                max_steps: 3,
                reward_bias: 0.0,
                seed: None,
            }
        }

        fn initial() -> HivObservation {
            HivObservation::new(163573.0, 5.0, 11945.0, 46.0, 63919.0, 24.0)
        }

        fn efficacy(action: HivAction) -> (f64, f64) {
            (
                if action.rti() { 0.7 } else { 0.0 },
                if action.pi() { 0.3 } else { 0.0 },
            )
        }
    }

    impl HivSimulator for StubPatient {
        fn reset(&mut self) {
            self.state = Self::initial();
            self.steps = 0;
        }

        fn observe(&self) -> HivObservation {
            self.state
        }

        fn perform_action(&mut self, action: HivAction) -> Result<(f64, HivObservation), EnvError> {
            if self.steps >= self.max_steps {
                return Err(EnvError::simulator("integration past end of episode"));
            }
            let (eps1, eps2) = Self::efficacy(action);
            self.state[4] *= 1.0 - 0.5 * (eps1 + eps2);
            self.state[5] += 1.5;
            self.steps += 1;

            let reward: f64 = self.typed_reward(action).iter().map(|(_, v)| v).sum();
            Ok((reward + self.reward_bias, self.state))
        }

        fn typed_reward(&self, action: HivAction) -> Vec<(String, f64)> {
            let (eps1, eps2) = Self::efficacy(action);
            vec![
                (REWARD_TYPES[0].to_string(), -0.1 * self.state[4]),
                (RAW_RTI_KEY.to_string(), -20000.0 * eps1 * eps1),
                (RAW_PI_KEY.to_string(), -2000.0 * eps2 * eps2),
                (REWARD_TYPES[3].to_string(), 1000.0 * self.state[5]),
            ]
        }

        fn is_done(&self) -> bool {
            self.steps >= self.max_steps
        }

        fn reseed(&mut self, seed: u64) {
            self.seed = Some(seed);
        }
    }

    #[test]
    fn test_reset_returns_initial_observation() {
        let mut env = HivSimEnv::new(StubPatient::new());
        let obs = env.reset().unwrap();
        assert_eq!(obs, StubPatient::initial());
    }

    #[test]
    fn test_step_renames_components() {
        let mut env = HivSimEnv::new(StubPatient::new());
        env.reset().unwrap();

        let step = env.step(HivAction::RtiAndPi).unwrap();
        let decomposition = &step.info.reward_decomposition;

        let mut names: Vec<&str> = decomposition.components().collect();
        names.sort();
        let mut expected = REWARD_TYPES.to_vec();
        expected.sort();
        assert_eq!(names, expected);

        assert_eq!(decomposition.get("RTI Side Effect"), Some(-9800.0));
        assert_eq!(decomposition.get("PI Side Effect"), Some(-180.0));
        assert!(decomposition.get(RAW_RTI_KEY).is_none());
        assert!(!step.info.decomposition_mismatch);
    }

    #[test]
    fn test_step_mismatch_does_not_block() {
        let mut patient = StubPatient::new();
        patient.reward_bias = 0.5;
        let mut env = HivSimEnv::new(patient);
        env.reset().unwrap();

        let step = env.step(HivAction::None).unwrap();
        assert!(step.info.decomposition_mismatch);
        assert_abs_diff_eq!(
            step.reward - step.info.reward_decomposition.sum(),
            0.5,
            epsilon = 1e-6
        );

        // Episode continues
        assert!(env.step(HivAction::Pi).is_ok());
    }

    #[test]
    fn test_terminal_after_max_steps() {
        let mut env = HivSimEnv::new(StubPatient::new());
        env.reset().unwrap();

        let terminals: Vec<bool> = (0..3)
            .map(|_| env.step(HivAction::Rti).unwrap().terminal)
            .collect();
        assert_eq!(terminals, vec![false, false, true]);

        let err = env.step(HivAction::Rti).unwrap_err();
        assert!(matches!(err, EnvError::Simulator(_)));
    }

    #[test]
    fn test_step_index() {
        let mut env = HivSimEnv::new(StubPatient::new());
        env.reset().unwrap();

        assert!(env.step_index(3).is_ok());
        assert!(matches!(env.step_index(7), Err(EnvError::InvalidAction(_))));
    }

    #[test]
    fn test_render_print() {
        let env = HivSimEnv::new(StubPatient::new());
        let text = env.render(RenderMode::Print).unwrap();
        let lines: Vec<&str> = text.as_text().unwrap().lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "T1: 163573");
        assert_eq!(lines[1], "T1*: 5");
        assert_eq!(lines[5], "E: 24");
    }

    #[test]
    fn test_render_raw() {
        let env = HivSimEnv::new(StubPatient::new());
        assert_eq!(
            env.render(RenderMode::Raw).unwrap(),
            Rendered::Raw(StubPatient::initial())
        );
    }

    #[test]
    fn test_metadata() {
        let mut env = HivSimEnv::new(StubPatient::new());
        assert_eq!(env.state_meanings().len(), 6);
        assert_eq!(env.action_meanings(), vec!["None", "RTI", "PI", "RTI & PI"]);
        assert_eq!(env.reward_types()[1], "RTI Side Effect");

        env.reseed(11);
        assert_eq!(env.simulator().seed, Some(11));
    }
}
