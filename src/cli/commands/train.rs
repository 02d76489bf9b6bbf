//! Train command - Run the decision loop over many episodes

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;
use tracing::info;

use crate::{
    adapters::NoInput,
    app::{App, LearningConfig},
    cli::{
        config::RunConfig,
        output::{format_number, print_kv, print_section},
    },
    pipeline::{
        ConsoleObserver, JsonlObserver, ProgressObserver, TrainingPipeline, TrainingResult,
    },
    q_learning::{TieBreak, TrainingMetadata},
    rewards::SurvivalReward,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    learning: LearningConfig,
    max_ticks_per_episode: Option<u64>,
    seed: Option<u64>,
    resumed_from: Option<PathBuf>,
    saved_to: Option<PathBuf>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent in the headless game", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of episodes to play
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Decide on every Nth tick (1 = every tick)
    #[arg(long, short = 'c')]
    pub cadence: Option<u32>,

    /// Discount factor γ applied to the successor's best value (0.0-1.0)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Reward for the tick that ends an episode
    #[arg(long)]
    pub terminal_reward: Option<f64>,

    /// Survival reward per decision: a number, or `ticks` for ticks since the last decision
    #[arg(long)]
    pub survival_reward: Option<SurvivalReward>,

    /// Action preferred on equal utility (prefer-no-flap or prefer-flap)
    #[arg(long)]
    pub tie_break: Option<TieBreak>,

    /// Pixels per discretization bucket
    #[arg(long)]
    pub bucket: Option<f64>,

    /// Cut an episode short after this many ticks
    #[arg(long, conflicts_with = "no_tick_limit")]
    pub max_ticks: Option<u64>,

    /// Let episodes run until the bird crashes
    #[arg(long, default_value_t = false)]
    pub no_tick_limit: bool,

    /// Random seed for pipe placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON run configuration; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Continue from a saved utility table
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Save the utility table after training
    #[arg(long, short = 'o')]
    pub save: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every update in the JSONL observations
    #[arg(long, default_value_t = false)]
    pub record_updates: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show a progress bar instead of one line per episode
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Only print the best score
    #[arg(long, short = 'q', default_value_t = false, conflicts_with = "progress")]
    pub quiet: bool,
}

impl TrainArgs {
    /// Merge the optional config file with the explicit flags.
    fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.training.episodes = episodes;
        }
        if let Some(cadence) = self.cadence {
            config.learning.decision_cadence = cadence;
        }
        if let Some(discount) = self.discount {
            config.learning.discount = discount;
        }
        if let Some(terminal) = self.terminal_reward {
            config.learning.rewards.terminal = terminal;
        }
        if let Some(survival) = self.survival_reward {
            config.learning.rewards.survival = survival;
        }
        if let Some(tie_break) = self.tie_break {
            config.learning.tie_break = tie_break;
        }
        if let Some(bucket) = self.bucket {
            config.learning.bucket_px = bucket;
        }
        if self.no_tick_limit {
            config.training.max_ticks_per_episode = None;
        } else if let Some(max_ticks) = self.max_ticks {
            config.training.max_ticks_per_episode = Some(max_ticks);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        if config.training.episodes == 0 {
            return Err(anyhow!("Number of episodes must be at least 1"));
        }
        config
            .learning
            .validate()
            .context("Invalid learning configuration")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.resolve()?;
    let app = App::new();

    let summary_path = args.summary.as_deref().map(sanitize_summary_path);
    if let (Some(raw), Some(sanitized)) = (&args.summary, &summary_path) {
        if raw != sanitized {
            println!("Summary will be written to {}", sanitized.display());
        }
    }

    let (mut agent, prior) = match &args.load {
        Some(path) => {
            let (agent, metadata) = app
                .load_agent(path, &config.learning)
                .with_context(|| format!("Failed to load utility table from {}", path.display()))?;
            if !args.quiet {
                println!(
                    "Resuming from {} ({} entries, {} episodes, best score {})",
                    path.display(),
                    format_number(agent.store().len() as u64),
                    format_number(metadata.episodes as u64),
                    metadata.best_score
                );
            }
            (agent, Some(metadata))
        }
        None => (app.create_agent(&config.learning)?, None),
    };
    let mut world = app.create_world(config.seed);

    let mut pipeline = TrainingPipeline::new(config.training.clone());
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    } else if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ConsoleObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file {}", path.display()))?
            .with_updates(args.record_updates);
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    info!(
        episodes = config.training.episodes,
        cadence = config.learning.decision_cadence,
        discount = config.learning.discount,
        seed = ?config.seed,
        "starting training"
    );
    let result = pipeline.run(&mut agent, &mut world, &mut NoInput)?;

    if args.quiet {
        println!("Best score: {}", result.best_score);
    } else {
        print_summary(&result);
    }

    if let Some(path) = &args.save {
        let metadata = TrainingMetadata {
            episodes: prior.as_ref().map_or(0, |m| m.episodes) + result.episodes,
            best_score: prior
                .as_ref()
                .map_or(result.best_score, |m| m.best_score.max(result.best_score)),
            discount: config.learning.discount,
            decision_cadence: config.learning.decision_cadence,
            bucket_px: config.learning.bucket_px,
        };
        app.save_store(agent.store(), metadata, path)
            .with_context(|| format!("Failed to save utility table to {}", path.display()))?;
        if !args.quiet {
            println!("Saved utility table to {}", path.display());
        }
    }

    if let Some(path) = summary_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: result,
            learning: config.learning,
            max_ticks_per_episode: config.training.max_ticks_per_episode,
            seed: config.seed,
            resumed_from: args.load,
            saved_to: args.save,
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create summary file {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
    }

    Ok(())
}

fn print_summary(result: &TrainingResult) {
    print_section("Training Summary");
    print_kv("Episodes", &format_number(result.episodes as u64));
    print_kv("Crashed", &format_number(result.terminal_episodes as u64));
    print_kv("Best score", &result.best_score.to_string());
    print_kv("Mean score", &format!("{:.2}", result.mean_score));
    print_kv("Ticks", &format_number(result.total_ticks));
    print_kv("Table entries", &format_number(result.entries as u64));
    if result.quit {
        print_kv("Stopped", "quit requested");
    }
}
