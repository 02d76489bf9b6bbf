//! Pipe pairs scrolling toward the bird.

use rand::Rng;

use super::{ANIMATION_SPEED, WIN_HEIGHT, WIN_WIDTH, bird::Bird, frames_to_msec};
use crate::state::ObstacleGeometry;

/// A top and a bottom pipe built from stacked body pieces plus one end
/// piece each, separated by a gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipePair {
    pub x: f64,
    top_pieces: u32,
    bottom_pieces: u32,
    score_counted: bool,
}

impl PipePair {
    pub const WIDTH: f64 = 80.0;
    pub const PIECE_HEIGHT: f64 = 32.0;
    /// Milliseconds between two spawned pairs
    pub const ADD_INTERVAL: f64 = 3000.0;
    /// Body pieces shared between top and bottom pipe. The two end pieces
    /// and the gap take the rest of the height.
    pub const TOTAL_BODY_PIECES: u32 =
        ((WIN_HEIGHT - 3.0 * Bird::HEIGHT - 3.0 * Self::PIECE_HEIGHT) / Self::PIECE_HEIGHT) as u32;

    /// Pair at `x` with explicit body piece counts.
    pub fn new(x: f64, top_pieces: u32, bottom_pieces: u32) -> Self {
        Self {
            x,
            top_pieces,
            bottom_pieces,
            score_counted: false,
        }
    }

    /// Pair entering at the right edge with a random gap position.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bottom_pieces = rng.random_range(1..=Self::TOTAL_BODY_PIECES);
        Self::new(
            WIN_WIDTH - 1.0,
            Self::TOTAL_BODY_PIECES - bottom_pieces,
            bottom_pieces,
        )
    }

    /// Top pipe height, end piece included.
    pub fn top_height_px(&self) -> f64 {
        f64::from(self.top_pieces + 1) * Self::PIECE_HEIGHT
    }

    /// Bottom pipe height, end piece included.
    pub fn bottom_height_px(&self) -> f64 {
        f64::from(self.bottom_pieces + 1) * Self::PIECE_HEIGHT
    }

    pub fn geometry(&self) -> ObstacleGeometry {
        ObstacleGeometry {
            top_height: self.top_height_px(),
            bottom_height: self.bottom_height_px(),
            x: self.x,
        }
    }

    /// Still (partly) on screen.
    pub fn visible(&self) -> bool {
        -Self::WIDTH < self.x && self.x < WIN_WIDTH
    }

    /// Right edge has moved past `x`.
    pub fn passed(&self, x: f64) -> bool {
        self.x + Self::WIDTH < x
    }

    pub fn score_counted(&self) -> bool {
        self.score_counted
    }

    /// Mark as scored if the bird has cleared it; true only the first time.
    pub fn try_score(&mut self, bird_x: f64) -> bool {
        if self.passed(bird_x) && !self.score_counted {
            self.score_counted = true;
            true
        } else {
            false
        }
    }

    /// Scroll left by one tick.
    pub fn update(&mut self) {
        self.x -= ANIMATION_SPEED * frames_to_msec(1.0);
    }

    pub fn collides_with(&self, bird: &Bird) -> bool {
        let in_x_range = bird.x + Bird::WIDTH > self.x && bird.x < self.x + Self::WIDTH;
        let in_y_range = bird.y < self.top_height_px()
            || bird.y + Bird::HEIGHT > WIN_HEIGHT - self.bottom_height_px();
        in_x_range && in_y_range
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_total_body_pieces() {
        assert_eq!(PipePair::TOTAL_BODY_PIECES, 10);
    }

    #[test]
    fn test_random_pairs_keep_gap_size() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let pipe = PipePair::random(&mut rng);
            assert_eq!(pipe.x, 567.0);
            assert!(pipe.bottom_height_px() >= 64.0);
            assert!(pipe.top_height_px() >= 32.0);
            let gap = WIN_HEIGHT - pipe.top_height_px() - pipe.bottom_height_px();
            assert_eq!(gap, 128.0);
        }
    }

    #[test]
    fn test_collision_requires_overlap_on_both_axes() {
        let pipe = PipePair::new(60.0, 5, 2);
        // gap spans y in [192, 416)
        assert!(!pipe.collides_with(&Bird::new(50.0, 200.0)));
        assert!(pipe.collides_with(&Bird::new(50.0, 180.0)));
        assert!(pipe.collides_with(&Bird::new(50.0, 400.0)));
        assert!(!pipe.collides_with(&Bird::new(200.0, 150.0)));
    }

    #[test]
    fn test_every_pair_has_a_top_pipe() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(PipePair::random(&mut rng).top_height_px() >= PipePair::PIECE_HEIGHT);
        }

        // All body pieces at the bottom still leaves the end piece on top.
        let pipe = PipePair::new(60.0, 0, 10);
        assert_eq!(pipe.top_height_px(), 32.0);
        assert!(pipe.collides_with(&Bird::new(50.0, 1.0)));
    }

    #[test]
    fn test_score_counted_once() {
        let mut pipe = PipePair::new(-40.0, 5, 5);
        assert!(pipe.try_score(50.0));
        assert!(!pipe.try_score(50.0));
        assert!(pipe.score_counted());
    }

    #[test]
    fn test_visibility() {
        assert!(PipePair::new(-79.0, 5, 5).visible());
        assert!(!PipePair::new(-80.0, 5, 5).visible());
        assert!(!PipePair::new(568.0, 5, 5).visible());
    }
}
