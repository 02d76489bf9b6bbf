//! Headless flappy bird world
//!
//! A bird at a fixed horizontal position sinks under gravity and climbs
//! when it flaps; pipe pairs scroll in from the right at a constant speed.
//! Nothing here draws or paces frames: every [`World::advance`] is one tick
//! of `1000 / FPS` simulated milliseconds.

pub mod bird;
pub mod pipe;
pub mod world;

pub use bird::Bird;
pub use pipe::PipePair;
pub use world::World;

/// Simulated ticks per second
pub const FPS: f64 = 60.0;
/// Horizontal scroll speed in pixels per millisecond
pub const ANIMATION_SPEED: f64 = 0.18;
pub const WIN_HEIGHT: f64 = 512.0;
/// Two 284 px background tiles wide
pub const WIN_WIDTH: f64 = 284.0 * 2.0;

/// Milliseconds elapsed over `frames` ticks.
pub fn frames_to_msec(frames: f64) -> f64 {
    1000.0 * frames / FPS
}

/// Whole ticks spanning `msec` milliseconds.
pub fn msec_to_frames(msec: f64) -> u64 {
    (FPS * msec / 1000.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_conversions() {
        assert_eq!(msec_to_frames(3000.0), 180);
        assert!((frames_to_msec(60.0) - 1000.0).abs() < 1e-9);
        assert!((ANIMATION_SPEED * frames_to_msec(1.0) - 3.0).abs() < 1e-9);
    }
}
