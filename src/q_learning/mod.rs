//! Tabular temporal difference learning for the flap/no-flap decision
//!
//! The learner keeps one utility value per (discretized state, action) pair
//! and improves it from reward signals alone:
//!
//! - [`UtilityStore`] holds the values and per-pair visit counts
//! - [`best`] picks the greedy action and bootstraps successor values
//! - [`TdLearner`] applies the running-average update with `α = 1 / visits`
//!
//! ## Usage Example
//!
//! ```
//! use flappy_td::{
//!     GameState,
//!     q_learning::{EntryKey, TdLearner, TieBreak, UtilityStore, best},
//!     types::Action,
//! };
//!
//! let mut store = UtilityStore::new();
//! let learner = TdLearner::new(0.4, TieBreak::PreferNoFlap)?;
//!
//! let s = GameState::new(256, 200, 100);
//! let next = GameState::new(253, 200, 97);
//!
//! store.get_or_create(s, Action::Flap);
//! learner.update(&mut store, EntryKey::new(s, Action::Flap), next, 1.0);
//!
//! assert_eq!(best(&mut store, s, TieBreak::PreferNoFlap).action, Action::Flap);
//! # Ok::<(), flappy_td::Error>(())
//! ```

pub mod evaluator;
pub mod learner;
pub mod serialization;
pub mod utility_store;

// Public re-exports
pub use evaluator::{BestAction, TieBreak, best};
pub use learner::{DEFAULT_DISCOUNT, TdLearner};
pub use serialization::{SavedEntry, SavedUtilityStore, TrainingMetadata};
pub use utility_store::{EntryKey, StateActionEntry, UtilityStore};
