//! Application layer: configuration and dependency wiring.
//!
//! ```text
//! App ──owns──► UtilityRepository (MsgPack / in-memory)
//!  │
//!  ├─ create_agent / load_agent ──► DecisionLoop ──owns──► UtilityStore
//!  └─ create_world ───────────────► World (implements Simulation)
//! ```
//!
//! # Usage
//!
//! ```
//! use flappy_td::app::{App, LearningConfig};
//!
//! let app = App::new();
//! let config = LearningConfig::default().with_decision_cadence(20);
//! let agent = app.create_agent(&config)?;
//! let world = app.create_world(Some(42));
//! # Ok::<(), flappy_td::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::LearningConfig;
pub use container::{App, AppBuilder};
