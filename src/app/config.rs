//! Configuration types for agent creation.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{DEFAULT_DISCOUNT, TieBreak},
    rewards::RewardPolicy,
};

/// Configuration of the learning agent.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes.
///
/// # Examples
///
/// ```
/// use flappy_td::app::LearningConfig;
/// use flappy_td::rewards::{RewardPolicy, SurvivalReward};
///
/// let config = LearningConfig::default()
///     .with_decision_cadence(20)
///     .with_rewards(RewardPolicy::new(-10_000.0, SurvivalReward::TicksSinceDecision));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Discount factor γ applied to the successor's best value
    pub discount: f64,
    /// Decide on every Nth tick (1 = every tick)
    pub decision_cadence: u32,
    /// Winner when both actions have equal utility
    pub tie_break: TieBreak,
    pub rewards: RewardPolicy,
    /// Pixels per discretization bucket for each state field
    pub bucket_px: f64,
}

impl LearningConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that would make learning undefined.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount must be within [0, 1], got {}",
                self.discount
            )));
        }
        if self.decision_cadence == 0 {
            return Err(Error::config("decision cadence must be at least 1 tick"));
        }
        if !(self.bucket_px.is_finite() && self.bucket_px > 0.0) {
            return Err(Error::config(format!(
                "bucket size must be a positive number of pixels, got {}",
                self.bucket_px
            )));
        }
        if !self.rewards.terminal.is_finite() {
            return Err(Error::config("terminal reward must be finite"));
        }
        Ok(())
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_decision_cadence(mut self, cadence: u32) -> Self {
        self.decision_cadence = cadence;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardPolicy) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_bucket_px(mut self, bucket_px: f64) -> Self {
        self.bucket_px = bucket_px;
        self
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            decision_cadence: 1,
            tie_break: TieBreak::default(),
            rewards: RewardPolicy::default(),
            bucket_px: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::rewards::SurvivalReward;

    #[test]
    fn test_defaults_are_valid() {
        let config = LearningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discount, 0.4);
        assert_eq!(config.decision_cadence, 1);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(LearningConfig::default().with_decision_cadence(0).validate().is_err());
        assert!(LearningConfig::default().with_discount(1.2).validate().is_err());
        assert!(LearningConfig::default().with_bucket_px(0.0).validate().is_err());
    }

    #[test]
    fn test_partial_json_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(
            file.path(),
            r#"{"decision_cadence": 20, "rewards": {"terminal": -10000.0}}"#,
        )?;

        let config = LearningConfig::from_json_file(file.path())?;
        assert_eq!(config.decision_cadence, 20);
        assert_eq!(config.rewards.terminal, -10_000.0);
        assert_eq!(config.rewards.survival, SurvivalReward::PerDecision(1.0));
        assert_eq!(config.discount, 0.4);
        Ok(())
    }

    #[test]
    fn test_invalid_json_file_is_rejected() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), r#"{"decision_cadence": 0}"#)?;
        assert!(matches!(
            LearningConfig::from_json_file(file.path()),
            Err(Error::InvalidConfiguration { .. })
        ));
        Ok(())
    }
}
