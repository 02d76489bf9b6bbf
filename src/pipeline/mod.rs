//! Training pipeline abstractions
//!
//! This module provides:
//! - The per-tick decision loop tying state capture, learning and acting together
//! - A training pipeline running many episodes over one utility store
//! - Observers recording what happens during training

pub mod decision_loop;
pub mod observers;
pub mod training;

pub use decision_loop::{
    DecisionLoop, DecisionRecord, EpisodeSummary, Phase, TickReport, TickStatus, UpdateRecord,
};
// Re-export observer implementations (adapters)
pub use observers::{
    ConsoleObserver, EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary,
    ProgressObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
