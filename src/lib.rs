//! Tabular temporal-difference agent for a headless flappy bird game
//!
//! This crate provides:
//! - Discretized game state and a state-action utility store
//! - Running-average TD update with a greedy, deterministic policy
//! - A per-tick decision loop with a configurable decision cadence
//! - A headless game world (bird kinematics, pipe pairs, scoring)
//! - Training pipeline with observers, persistence and CSV export

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod game;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod rewards;
pub mod state;
pub mod types;

pub use error::{Error, Result};
pub use pipeline::DecisionLoop;
pub use q_learning::{TdLearner, TieBreak, UtilityStore};
pub use rewards::{RewardPolicy, SurvivalReward};
pub use state::{GameState, StateEncoder, Telemetry};
pub use types::{Action, Signal};
