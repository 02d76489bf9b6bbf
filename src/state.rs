//! Discretized game state and the encoder that builds it from telemetry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Geometry of the nearest pipe pair, in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleGeometry {
    /// Height of the top pipe, measured down from the top edge of the world.
    pub top_height: f64,
    /// Height of the bottom pipe, measured up from the bottom edge of the world.
    pub bottom_height: f64,
    /// Left edge of the pipe pair.
    pub x: f64,
}

impl ObstacleGeometry {
    /// Vertical midpoint of the traversable gap.
    pub fn gap_center(&self, world_height: f64) -> f64 {
        let gap_height = world_height - self.bottom_height - self.top_height;
        self.top_height + gap_height / 2.0
    }
}

/// Raw simulation snapshot the encoder consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub bird_x: f64,
    pub bird_y: f64,
    pub world_height: f64,
    pub obstacle: ObstacleGeometry,
}

/// Discrete, hashable state key.
///
/// Equality is structural over the three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameState {
    pub bird_y: i32,
    pub gap_center: i32,
    pub pipe_distance: i32,
}

impl GameState {
    pub fn new(bird_y: i32, gap_center: i32, pipe_distance: i32) -> Self {
        Self {
            bird_y,
            gap_center,
            pipe_distance,
        }
    }

    /// Order-sensitive bit mix of the three fields. Distinct states can
    /// share a mix value.
    #[cfg(test)]
    fn legacy_mix(&self) -> i64 {
        ((self.bird_y as i64) << 2) ^ ((self.gap_center as i64) << 1) ^ (self.pipe_distance as i64)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(y={}, gap={}, dx={})",
            self.bird_y, self.gap_center, self.pipe_distance
        )
    }
}

/// Converts telemetry into [`GameState`] keys by flooring each field into
/// buckets of `bucket_px` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateEncoder {
    bucket_px: f64,
}

impl StateEncoder {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `bucket_px` is finite and positive.
    pub fn new(bucket_px: f64) -> Result<Self> {
        if bucket_px.is_finite() && bucket_px > 0.0 {
            Ok(Self { bucket_px })
        } else {
            Err(Error::config(format!(
                "state bucket size must be a positive number of pixels, got {bucket_px}"
            )))
        }
    }

    pub fn bucket_px(&self) -> f64 {
        self.bucket_px
    }

    /// Encode one telemetry snapshot.
    ///
    /// # Panics
    ///
    /// Panics on non-finite telemetry; a simulation producing NaN positions is broken.
    pub fn encode(&self, telemetry: &Telemetry) -> GameState {
        let gap_center = telemetry.obstacle.gap_center(telemetry.world_height);
        let pipe_distance = telemetry.obstacle.x - telemetry.bird_x;
        GameState {
            bird_y: self.discretize(telemetry.bird_y),
            gap_center: self.discretize(gap_center),
            pipe_distance: self.discretize(pipe_distance),
        }
    }

    fn discretize(&self, value: f64) -> i32 {
        assert!(value.is_finite(), "telemetry value must be finite, got {value}");
        (value / self.bucket_px).floor() as i32
    }
}

impl Default for StateEncoder {
    fn default() -> Self {
        Self { bucket_px: 1.0 }
    }
}
