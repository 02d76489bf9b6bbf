//! Simulation port - the world the decision loop plays in
//!
//! The learner never touches physics, pipes or rendering directly. It reads
//! telemetry, asks for a flap, and advances one tick at a time through this
//! trait.

use crate::state::Telemetry;

/// Narrow interface to a tick-based game world.
///
/// # Tick Contract
///
/// Within one decision-loop tick the methods are called in this order:
/// 1. `is_terminal()` - did the previous advance end the episode?
/// 2. `telemetry()` - snapshot for state encoding (decision and terminal ticks only)
/// 3. `flap()` - only when the chosen action is a flap
/// 4. `advance()` - exactly once, unless the tick was terminal
///
/// # Examples
///
/// ```
/// use flappy_td::{game::World, ports::Simulation};
///
/// let mut world = World::with_seed(7);
/// world.reset();
/// assert!(world.telemetry().is_some());
/// world.advance();
/// assert_eq!(world.score(), 0);
/// ```
pub trait Simulation {
    /// Start a new episode: fresh bird, fresh obstacles, score zero.
    fn reset(&mut self);

    /// Advance the world by one tick.
    fn advance(&mut self);

    /// Apply a climb impulse to the controlled bird.
    fn flap(&mut self);

    /// Whether the bird collided with an obstacle or left the world bounds.
    fn is_terminal(&self) -> bool;

    /// Bird position and the geometry of the nearest obstacle ahead.
    ///
    /// Returns `None` only when the world holds no obstacle at all; the
    /// decision loop treats that as a broken simulation.
    fn telemetry(&self) -> Option<Telemetry>;

    /// Obstacles passed in the current episode.
    fn score(&self) -> u32;
}
