//! The headless game world.

use std::collections::VecDeque;

use rand::{SeedableRng, rngs::StdRng};

use super::{WIN_HEIGHT, bird::Bird, msec_to_frames, pipe::PipePair};
use crate::{ports::Simulation, state::Telemetry};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Bird, active pipe pairs and the episode score.
#[derive(Debug, Clone)]
pub struct World {
    bird: Bird,
    pipes: VecDeque<PipePair>,
    frame_clock: u64,
    score: u32,
    rng: StdRng,
}

impl World {
    /// World with an unseeded pipe generator. Call [`Simulation::reset`]
    /// before the first tick.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            bird: Bird::spawn(),
            pipes: VecDeque::new(),
            frame_clock: 0,
            score: 0,
            rng: build_rng(seed),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> impl Iterator<Item = &PipePair> {
        self.pipes.iter()
    }

    pub fn frame_clock(&self) -> u64 {
        self.frame_clock
    }

    /// Append a pipe pair behind the existing ones.
    pub fn push_pipe(&mut self, pipe: PipePair) {
        self.pipes.push_back(pipe);
    }

    pub fn clear_pipes(&mut self) {
        self.pipes.clear();
    }

    /// First pair whose right edge has not yet passed the bird.
    pub fn nearest_pipe(&self) -> Option<&PipePair> {
        self.pipes.iter().find(|pipe| !pipe.passed(self.bird.x))
    }

    fn spawn_pipe(&mut self) {
        let pipe = PipePair::random(&mut self.rng);
        self.pipes.push_back(pipe);
    }
}

impl Simulation for World {
    fn reset(&mut self) {
        self.bird = Bird::spawn();
        self.pipes.clear();
        self.frame_clock = 0;
        self.score = 0;
        self.spawn_pipe();
    }

    fn advance(&mut self) {
        while self.pipes.front().is_some_and(|pipe| !pipe.visible()) {
            self.pipes.pop_front();
        }
        for pipe in &mut self.pipes {
            pipe.update();
        }

        self.bird.update();

        let bird_x = self.bird.x;
        for pipe in &mut self.pipes {
            if pipe.try_score(bird_x) {
                self.score += 1;
            }
        }

        self.frame_clock += 1;
        if self
            .frame_clock
            .is_multiple_of(msec_to_frames(PipePair::ADD_INTERVAL))
        {
            self.spawn_pipe();
        }
    }

    fn flap(&mut self) {
        self.bird.flap();
    }

    fn is_terminal(&self) -> bool {
        self.bird.out_of_bounds() || self.pipes.iter().any(|pipe| pipe.collides_with(&self.bird))
    }

    fn telemetry(&self) -> Option<Telemetry> {
        self.nearest_pipe().map(|pipe| Telemetry {
            bird_x: self.bird.x,
            bird_y: self.bird.y,
            world_height: WIN_HEIGHT,
            obstacle: pipe.geometry(),
        })
    }

    fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_spawns_first_pipe() {
        let mut world = World::with_seed(1);
        world.reset();
        assert_eq!(world.pipes().count(), 1);
        assert_eq!(world.score(), 0);
        assert!(!world.is_terminal());

        let telemetry = world.telemetry().unwrap();
        assert_eq!(telemetry.bird_y, 240.0);
        assert_eq!(telemetry.obstacle.x, 567.0);
    }

    #[test]
    fn test_spawns_every_add_interval() {
        let mut world = World::with_seed(2);
        world.reset();
        for _ in 0..180 {
            world.advance();
        }
        assert_eq!(world.pipes().count(), 2);
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = World::with_seed(9);
        let mut b = World::with_seed(9);
        a.reset();
        b.reset();
        assert_eq!(
            a.telemetry().unwrap().obstacle,
            b.telemetry().unwrap().obstacle
        );
    }

    #[test]
    fn test_falling_bird_hits_the_ground() {
        let mut world = World::with_seed(4);
        world.reset();
        let mut ticks = 0;
        while !world.is_terminal() {
            world.advance();
            ticks += 1;
        }
        // 240 px down to 480 at 3 px per tick
        assert_eq!(ticks, 80);
    }

    #[test]
    fn test_telemetry_skips_passed_pipes() {
        let mut world = World::with_seed(5);
        world.reset();
        world.clear_pipes();
        world.push_pipe(PipePair::new(-40.0, 3, 3));
        world.push_pipe(PipePair::new(200.0, 3, 3));
        assert_eq!(world.telemetry().unwrap().obstacle.x, 200.0);

        world.clear_pipes();
        assert!(world.telemetry().is_none());
    }
}
