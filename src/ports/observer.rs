//! Observer port - abstraction for training observation and reporting
//!
//! This port is the reporting collaborator of the training pipeline: it
//! receives episode scores, the best score of the run, and optionally the
//! per-tick decisions and updates, without coupling the learning loop to a
//! console, a progress bar or a file format.

use crate::{
    Result,
    pipeline::{DecisionRecord, EpisodeSummary, UpdateRecord},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_decision(...)` / `on_update(...)` - as they happen within ticks
///    - `on_episode_end(summary)`
/// 3. `on_training_end(best_score)` - once, also after a quit signal
///
/// # Examples
///
/// ```no_run
/// use flappy_td::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct CrashCounter {
///     crashes: usize,
/// }
///
/// impl Observer for CrashCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> flappy_td::Result<()> {
///         if summary.terminal {
///             self.crashes += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `total_episodes` - Number of episodes scheduled
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the first tick of an episode.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called on every decision tick after the action has been forwarded.
    ///
    /// Does nothing by default. Override to trace the policy.
    fn on_decision(&mut self, _episode: usize, _decision: &DecisionRecord) -> Result<()> {
        Ok(())
    }

    /// Called after each temporal difference update.
    fn on_update(&mut self, _episode: usize, _update: &UpdateRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, either on a terminal tick or when the
    /// per-episode tick limit truncates it.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes or is quit.
    ///
    /// # Parameters
    ///
    /// * `best_score` - Best episode score of the run
    fn on_training_end(&mut self, _best_score: u32) -> Result<()> {
        Ok(())
    }
}
