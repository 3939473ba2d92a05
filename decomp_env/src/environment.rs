//! Agent-facing environment surface.

use crate::error::EnvError;
use crate::types::Step;

/// How `Environment::render` should present the current observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Human-readable text summary
    Print,

    /// The raw observation itself
    #[default]
    Raw,
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "print" | "text" => Ok(RenderMode::Print),
            "raw" => Ok(RenderMode::Raw),
            _ => Err(format!("Unknown render mode: {}", s)),
        }
    }
}

/// Output of `Environment::render`.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<O> {
    Text(String),
    Raw(O),
}

impl<O> Rendered<O> {
    /// Returns the text, if this is a textual rendering.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Text(text) => Some(text),
            Rendered::Raw(_) => None,
        }
    }
}

/// The gym-style interface exposed to agents.
///
/// ```text
/// Agent                        Environment
///   |-- reset() --------------------->|
///   |<------------- observation ------|
///   |-- step(action) ---------------->|
///   |<-- observation, reward, --------|
///   |    terminal, diagnostics        |
/// ```
///
/// Diagnostics always carry the reward decomposition; a decomposition that
/// fails to sum to the scalar reward is flagged there and never turned into
/// an error.
pub trait Environment {
    type Observation: Clone;
    type Action;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Self::Observation, EnvError>;

    /// Applies an action and advances the environment by one transition.
    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation>, EnvError>;

    /// Presents the current observation.
    ///
    /// Fails with `EnvError::NotReset` if there is no observation yet.
    fn render(&self, mode: RenderMode) -> Result<Rendered<Self::Observation>, EnvError>;

    /// Reseeds the environment's random source in place.
    fn reseed(&mut self, seed: u64);

    /// What each entry of an observation means.
    fn state_meanings(&self) -> Vec<String>;

    /// The meaning of each action, in index order.
    fn action_meanings(&self) -> Vec<String>;

    /// Reward component names reported in diagnostics.
    fn reward_types(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_parse() {
        assert_eq!("print".parse::<RenderMode>(), Ok(RenderMode::Print));
        assert_eq!("RAW".parse::<RenderMode>(), Ok(RenderMode::Raw));
        assert!("rgb_array".parse::<RenderMode>().is_err());
    }

    #[test]
    fn test_rendered_as_text() {
        let text: Rendered<u8> = Rendered::Text("hi".to_string());
        assert_eq!(text.as_text(), Some("hi"));
        assert_eq!(Rendered::Raw(3u8).as_text(), None);
    }
}
