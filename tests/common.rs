//! Common test utilities for the flappy_td test suite.
//!
//! `FixedSimulation` reports the same telemetry on every tick and becomes
//! terminal after a configurable number of advances, which makes the reward
//! and update sequence of the decision loop easy to predict by hand.

#![allow(dead_code)]

use flappy_td::{
    ports::Simulation,
    state::{GameState, ObstacleGeometry, Telemetry},
};

/// bird_y 256, gap center (512 - 212 - 100) / 2 + 100 = 200, distance 150 - 50 = 100
pub const FIXED_STATE: GameState = GameState {
    bird_y: 256,
    gap_center: 200,
    pipe_distance: 100,
};

#[derive(Debug, Clone)]
pub struct FixedSimulation {
    pub terminal_after: u64,
    pub advances: u64,
    pub flaps: u64,
    pub resets: u64,
    pub score: u32,
    pub has_obstacle: bool,
}

impl FixedSimulation {
    pub fn new(terminal_after: u64) -> Self {
        Self {
            terminal_after,
            advances: 0,
            flaps: 0,
            resets: 0,
            score: 0,
            has_obstacle: true,
        }
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn without_obstacle(mut self) -> Self {
        self.has_obstacle = false;
        self
    }
}

impl Simulation for FixedSimulation {
    fn reset(&mut self) {
        self.advances = 0;
        self.flaps = 0;
        self.resets += 1;
    }

    fn advance(&mut self) {
        self.advances += 1;
    }

    fn flap(&mut self) {
        self.flaps += 1;
    }

    fn is_terminal(&self) -> bool {
        self.advances >= self.terminal_after
    }

    fn telemetry(&self) -> Option<Telemetry> {
        self.has_obstacle.then_some(Telemetry {
            bird_x: 50.0,
            bird_y: 256.0,
            world_height: 512.0,
            obstacle: ObstacleGeometry {
                top_height: 100.0,
                bottom_height: 212.0,
                x: 150.0,
            },
        })
    }

    fn score(&self) -> u32 {
        self.score
    }
}
