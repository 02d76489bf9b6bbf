//! Reward policy for decision and terminal ticks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Reward granted for surviving until the next decision tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SurvivalReward {
    /// A fixed amount per decision.
    PerDecision(f64),
    /// One point for every tick elapsed since the previous decision.
    TicksSinceDecision,
}

impl FromStr for SurvivalReward {
    type Err = Error;

    /// Accepts `ticks` or a number (e.g. `1`, `0.5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("ticks") {
            return Ok(SurvivalReward::TicksSinceDecision);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(SurvivalReward::PerDecision)
            .ok_or_else(|| {
                Error::config(format!(
                    "invalid survival reward '{trimmed}'. Use a number or 'ticks'"
                ))
            })
    }
}

/// Maps tick outcomes to scalar rewards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Reward for the tick that ends the episode (collision or out of bounds).
    pub terminal: f64,
    pub survival: SurvivalReward,
}

impl RewardPolicy {
    pub fn new(terminal: f64, survival: SurvivalReward) -> Self {
        Self { terminal, survival }
    }

    /// Reward for the transition closed on this tick.
    ///
    /// `ticks_since_decision` counts simulation advances since the pending
    /// pair was chosen.
    pub fn reward(&self, terminal: bool, ticks_since_decision: u32) -> f64 {
        if terminal {
            return self.terminal;
        }
        match self.survival {
            SurvivalReward::PerDecision(value) => value,
            SurvivalReward::TicksSinceDecision => f64::from(ticks_since_decision),
        }
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            terminal: -1000.0,
            survival: SurvivalReward::PerDecision(1.0),
        }
    }
}
