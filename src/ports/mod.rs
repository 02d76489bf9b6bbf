//! Ports (trait boundaries) for external collaborators.
//!
//! The learning core owns these traits; the headless game, input scripts,
//! reporters and storage back-ends implement them.

pub mod input;
pub mod observer;
pub mod repository;
pub mod simulation;

pub use input::InputSource;
pub use observer::Observer;
pub use repository::UtilityRepository;
pub use simulation::Simulation;
