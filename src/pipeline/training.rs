//! Training pipeline: runs episodes of the decision loop and reports them

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::decision_loop::{DecisionLoop, EpisodeSummary, TickStatus};
use crate::{
    Result,
    ports::{InputSource, Observer, Simulation},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to play
    pub episodes: usize,

    /// Cut an episode short after this many ticks. A competent agent may
    /// otherwise never crash.
    pub max_ticks_per_episode: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            max_ticks_per_episode: Some(100_000),
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played, including a final one interrupted by quit
    pub episodes: usize,

    /// Episodes that ended in a collision or out of bounds
    pub terminal_episodes: usize,

    /// Best episode score
    pub best_score: u32,

    /// Mean episode score
    pub mean_score: f64,

    /// Ticks simulated over all episodes
    pub total_ticks: u64,

    /// Utility store entries at the end of the run
    pub entries: usize,

    /// The run was stopped by a quit signal
    pub quit: bool,
}

impl TrainingResult {
    fn from_summaries(summaries: &[EpisodeSummary], entries: usize, quit: bool) -> Self {
        let episodes = summaries.len();
        let total_score: u64 = summaries.iter().map(|s| u64::from(s.score)).sum();
        let mean_score = if episodes > 0 {
            total_score as f64 / episodes as f64
        } else {
            0.0
        };

        Self {
            episodes,
            terminal_episodes: summaries.iter().filter(|s| s.terminal).count(),
            best_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
            mean_score,
            total_ticks: summaries.iter().map(|s| s.ticks).sum(),
            entries,
            quit,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for one agent in one simulation
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play up to `config.episodes` episodes, carrying the agent's utility
    /// store from one episode to the next.
    ///
    /// A quit signal ends the run between ticks; the interrupted episode is
    /// still reported.
    pub fn run(
        &mut self,
        agent: &mut DecisionLoop,
        sim: &mut dyn Simulation,
        input: &mut dyn InputSource,
    ) -> Result<TrainingResult> {
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut summaries = Vec::with_capacity(self.config.episodes);
        let mut quit = false;

        for _ in 0..self.config.episodes {
            let (summary, quit_requested) = self.play_episode(agent, sim, input)?;

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
            summaries.push(summary);

            if quit_requested {
                quit = true;
                warn!(episode = summary.episode, "quit requested, stopping training");
                break;
            }
        }

        let result = TrainingResult::from_summaries(&summaries, agent.store().len(), quit);
        for observer in &mut self.observers {
            observer.on_training_end(result.best_score)?;
        }

        info!(
            episodes = result.episodes,
            best_score = result.best_score,
            mean_score = result.mean_score,
            entries = result.entries,
            "training finished"
        );
        Ok(result)
    }

    fn play_episode(
        &mut self,
        agent: &mut DecisionLoop,
        sim: &mut dyn Simulation,
        input: &mut dyn InputSource,
    ) -> Result<(EpisodeSummary, bool)> {
        agent.start_episode(sim);
        let episode = agent.episodes_started() - 1;
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        loop {
            // A crash on the last allowed tick still gets its terminal update.
            if !sim.is_terminal()
                && self
                    .config
                    .max_ticks_per_episode
                    .is_some_and(|limit| agent.episode_tick() >= limit)
            {
                return Ok((agent.abandon_episode(sim), false));
            }

            let report = agent.tick(sim, input)?;
            if let Some(update) = &report.update {
                for observer in &mut self.observers {
                    observer.on_update(episode, update)?;
                }
            }
            if let Some(decision) = &report.decision {
                for observer in &mut self.observers {
                    observer.on_decision(episode, decision)?;
                }
            }

            match report.status {
                TickStatus::Running => {}
                TickStatus::EpisodeOver(summary) => return Ok((summary, report.quit_requested)),
                TickStatus::Quit => return Ok((agent.abandon_episode(sim), true)),
            }
        }
    }
}
