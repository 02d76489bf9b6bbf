//! Run configuration file shared by CLI commands
//!
//! A run file bundles the learning parameters, the episode schedule and the
//! seed. Every section is optional; explicit command-line flags override it.
//!
//! ```json
//! {
//!   "seed": 7,
//!   "learning": { "decision_cadence": 20, "rewards": { "terminal": -10000.0 } },
//!   "training": { "episodes": 500 }
//! }
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{app::LearningConfig, pipeline::TrainingConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Random seed for reproducibility
    pub seed: Option<u64>,

    pub learning: LearningConfig,

    pub training: TrainingConfig,
}

impl RunConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
