//! JSON exporter for rollout results.

use crate::config::RolloutConfig;
use crate::runner::RolloutSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Complete rollout export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloutExport {
    /// World file the rollouts ran on
    pub world: String,

    /// Reward component names, in world order
    pub reward_types: Vec<String>,

    /// Configuration used
    pub config: RolloutConfig,

    /// Results
    pub summary: RolloutSummary,
}

impl RolloutExport {
    /// Creates a new export container.
    pub fn new(
        world: &str,
        reward_types: Vec<String>,
        config: RolloutConfig,
        summary: RolloutSummary,
    ) -> Self {
        Self {
            world: world.to_string(),
            reward_types,
            config,
            summary,
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
