//! The controlled bird.

use std::f64::consts::PI;

use super::{WIN_HEIGHT, frames_to_msec};

/// Bird kinematics: constant sink, cosine-eased climb after a flap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    msec_to_climb: f64,
}

impl Bird {
    pub const WIDTH: f64 = 32.0;
    pub const HEIGHT: f64 = 32.0;
    /// Pixels per millisecond while falling
    pub const SINK_SPEED: f64 = 0.18;
    /// Pixels per millisecond at the peak of a climb
    pub const CLIMB_SPEED: f64 = 0.3;
    pub const CLIMB_DURATION: f64 = 333.3;
    pub const START_X: f64 = 50.0;

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            msec_to_climb: 0.0,
        }
    }

    /// Bird vertically centred at the fixed start column.
    pub fn spawn() -> Self {
        Self::new(Self::START_X, (WIN_HEIGHT / 2.0 - Self::HEIGHT / 2.0).trunc())
    }

    /// Restart the climb.
    pub fn flap(&mut self) {
        self.msec_to_climb = Self::CLIMB_DURATION;
    }

    pub fn is_climbing(&self) -> bool {
        self.msec_to_climb > 0.0
    }

    /// Move by one tick.
    pub fn update(&mut self) {
        let dt = frames_to_msec(1.0);
        if self.is_climbing() {
            let frac_climb_done = 1.0 - self.msec_to_climb / Self::CLIMB_DURATION;
            self.y -= Self::CLIMB_SPEED * dt * (1.0 - (frac_climb_done * PI).cos());
            self.msec_to_climb -= dt;
        } else {
            self.y += Self::SINK_SPEED * dt;
        }
    }

    /// Touching the top edge or resting on the ground.
    pub fn out_of_bounds(&self) -> bool {
        self.y <= 0.0 || self.y >= WIN_HEIGHT - Self::HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position() {
        let bird = Bird::spawn();
        assert_eq!(bird.x, 50.0);
        assert_eq!(bird.y, 240.0);
    }

    #[test]
    fn test_sinks_three_pixels_per_tick() {
        let mut bird = Bird::spawn();
        bird.update();
        assert!((bird.y - 243.0).abs() < 1e-9);
    }

    #[test]
    fn test_flap_climbs_then_sinks_again() {
        let mut bird = Bird::spawn();
        bird.flap();
        // First climb tick starts from rest: cos(0) = 1 gives no movement
        bird.update();
        assert!((bird.y - 240.0).abs() < 1e-9);
        for _ in 0..19 {
            bird.update();
        }
        assert!(bird.y < 240.0);
        assert!(!bird.is_climbing());

        let peak = bird.y;
        bird.update();
        assert!(bird.y > peak);
    }

    #[test]
    fn test_bounds() {
        assert!(Bird::new(50.0, 0.0).out_of_bounds());
        assert!(Bird::new(50.0, 480.0).out_of_bounds());
        assert!(!Bird::new(50.0, 479.0).out_of_bounds());
    }
}
