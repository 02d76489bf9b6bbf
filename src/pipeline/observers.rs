//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the decision loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::decision_loop::{EpisodeSummary, UpdateRecord};
use crate::{Result, ports::Observer};

/// One line of the JSONL observation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    /// Updates applied during the episode, when recorded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<UpdateRecord>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    best_score: u32,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            best_score: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.best_score = self.best_score.max(summary.score);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(format!(
                "last: {} best: {} entries: {}",
                summary.score, self.best_score, summary.entries
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self, best_score: u32) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("best: {best_score}"));
        }
        Ok(())
    }
}

/// Console observer - Prints one line per finished episode
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for ConsoleObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if summary.terminal {
            println!("Game over! Score: {}", summary.score);
        } else {
            println!(
                "Episode cut short after {} ticks. Score: {}",
                summary.ticks, summary.score
            );
        }
        Ok(())
    }

    fn on_training_end(&mut self, best_score: u32) -> Result<()> {
        println!("Best score: {best_score}");
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    scores: Vec<u32>,
    ticks: Vec<u64>,
    terminal_episodes: usize,
    updates: u64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            scores: Vec::new(),
            ticks: Vec::new(),
            terminal_episodes: 0,
            updates: 0,
        }
    }

    /// Get the best episode score
    pub fn best_score(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// Get the mean episode score
    pub fn mean_score(&self) -> f64 {
        if self.scores.is_empty() {
            0.0
        } else {
            self.scores.iter().map(|&s| f64::from(s)).sum::<f64>() / self.scores.len() as f64
        }
    }

    /// Mean score of the last `window` episodes
    pub fn recent_mean_score(&self, window: usize) -> f64 {
        let start = self.scores.len().saturating_sub(window);
        let recent = &self.scores[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|&s| f64::from(s)).sum::<f64>() / recent.len() as f64
        }
    }

    /// Get average episode length in ticks
    pub fn avg_episode_ticks(&self) -> f64 {
        if self.ticks.is_empty() {
            0.0
        } else {
            self.ticks.iter().sum::<u64>() as f64 / self.ticks.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.scores.len(),
            terminal_episodes: self.terminal_episodes,
            best_score: self.best_score(),
            mean_score: self.mean_score(),
            avg_episode_ticks: self.avg_episode_ticks(),
            updates: self.updates,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub terminal_episodes: usize,
    pub best_score: u32,
    pub mean_score: f64,
    pub avg_episode_ticks: f64,
    pub updates: u64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_update(&mut self, _episode: usize, _update: &UpdateRecord) -> Result<()> {
        self.updates += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.scores.push(summary.score);
        self.ticks.push(summary.ticks);
        if summary.terminal {
            self.terminal_episodes += 1;
        }
        Ok(())
    }
}

/// JSONL observer - Exports one observation per episode in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_updates: bool,
    current_updates: Vec<UpdateRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing episode summaries only
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            record_updates: false,
            current_updates: Vec::new(),
        })
    }

    /// Also record every update applied during each episode
    pub fn with_updates(mut self, record_updates: bool) -> Self {
        self.record_updates = record_updates;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_updates.clear();
        Ok(())
    }

    fn on_update(&mut self, _episode: usize, update: &UpdateRecord) -> Result<()> {
        if self.record_updates {
            self.current_updates.push(*update);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = EpisodeObservation {
            summary: *summary,
            updates: std::mem::take(&mut self.current_updates),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader};

    use tempfile::NamedTempFile;

    use super::*;
    use crate::{q_learning::EntryKey, state::GameState, types::Action};

    fn summary(episode: usize, score: u32, ticks: u64, terminal: bool) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            score,
            ticks,
            decisions: ticks,
            entries: 10,
            terminal,
        }
    }

    fn update(tick: u64) -> UpdateRecord {
        let state = GameState::new(10, 20, 30);
        UpdateRecord {
            tick,
            key: EntryKey::new(state, Action::NoFlap),
            next_state: state,
            reward: 1.0,
            utility: 1.0,
            terminal: false,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();
        assert_eq!(observer.mean_score(), 0.0);

        observer.on_episode_end(&summary(0, 0, 80, true)).unwrap();
        observer.on_episode_end(&summary(1, 3, 400, true)).unwrap();
        observer.on_episode_end(&summary(2, 2, 300, false)).unwrap();
        observer.on_update(2, &update(1)).unwrap();

        let metrics = observer.summary();
        assert_eq!(metrics.total_episodes, 3);
        assert_eq!(metrics.terminal_episodes, 2);
        assert_eq!(metrics.best_score, 3);
        assert!((metrics.mean_score - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.avg_episode_ticks, 260.0);
        assert_eq!(metrics.updates, 1);
        assert_eq!(observer.recent_mean_score(2), 2.5);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let file = NamedTempFile::new().unwrap();
        {
            let mut observer = JsonlObserver::new(file.path()).unwrap().with_updates(true);
            observer.on_episode_start(0).unwrap();
            observer.on_update(0, &update(1)).unwrap();
            observer.on_update(0, &update(2)).unwrap();
            observer.on_episode_end(&summary(0, 1, 3, true)).unwrap();
            observer.on_episode_start(1).unwrap();
            observer.on_episode_end(&summary(1, 0, 1, true)).unwrap();
        }

        let lines: Vec<String> = BufReader::new(File::open(file.path()).unwrap())
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let first: EpisodeObservation = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first.summary.score, 1);
        assert_eq!(first.updates.len(), 2);

        let second: EpisodeObservation = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second.summary.episode, 1);
        assert!(second.updates.is_empty());
    }

    #[test]
    fn test_jsonl_observer_skips_updates_by_default() {
        let file = NamedTempFile::new().unwrap();
        {
            let mut observer = JsonlObserver::new(file.path()).unwrap();
            observer.on_episode_start(0).unwrap();
            observer.on_update(0, &update(1)).unwrap();
            observer.on_episode_end(&summary(0, 0, 2, true)).unwrap();
        }

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(!content.contains("updates"));
        assert!(content.contains("\"score\":0"));
    }
}
