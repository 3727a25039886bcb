use serde::{Deserialize, Serialize};
use tracing::info;

use crate::geometry::{Cell, Direction};
use crate::grid::Grid;
use crate::settings::ScoringSettings;

/// How often each direction was requested by the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounts([u64; 4]);

impl DirectionCounts {
    pub fn record(&mut self, dir: Direction) {
        self.0[dir.index()] += 1;
    }

    pub fn get(&self, dir: Direction) -> u64 {
        self.0[dir.index()]
    }

    pub fn min(&self) -> u64 {
        self.0.iter().copied().min().unwrap_or(0)
    }
}

/// Distance from the head to the apple taking the shortest way around each
/// axis, as if the grid were a torus.
///
/// The toroidal shortcut is used for both boundary types.
pub fn distance_to_apple(grid: &Grid, head: Cell, apple: Cell) -> f64 {
    let axis = |extent: i32, h: i32, a: i32| -> f64 {
        let direct = (a - h).abs();
        let around = (extent - h).min(extent - a) + h.min(a);
        f64::from(direct.min(around))
    };
    let dx = axis(grid.width(), head.x, apple.x);
    let dy = axis(grid.height(), head.y, apple.y);
    (dx * dx + dy * dy).sqrt()
}

/// Per-episode fitness accumulator for autonomous play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LossTracker {
    pub loss: f64,
    pub steps_total: u64,
    pub steps_without_apple: u64,
    pub direction_counts: DirectionCounts,
    pub apple_distance: f64,
}

impl LossTracker {
    pub fn new(initial_distance: f64) -> Self {
        Self {
            loss: 0.0,
            steps_total: 0,
            steps_without_apple: 0,
            direction_counts: DirectionCounts::default(),
            apple_distance: initial_distance,
        }
    }

    /// Records the requested direction and rewards or penalises the change in
    /// distance to the apple.
    pub fn record_move(&mut self, requested: Direction, distance: f64, scoring: &ScoringSettings) {
        self.direction_counts.record(requested);
        if distance <= self.apple_distance {
            self.loss += scoring.approaching_score;
        } else {
            self.loss -= scoring.retracting_penalty;
        }
        self.apple_distance = distance;
    }

    pub fn record_apple(&mut self, eaten: bool, scoring: &ScoringSettings) {
        if eaten {
            self.loss += scoring.eat_apple_score;
            self.steps_without_apple = 0;
        } else {
            self.steps_without_apple += 1;
        }
        self.steps_total += 1;
    }

    /// Applies the end-of-episode terms and returns the final loss.
    ///
    /// Must be called exactly once per episode.
    pub fn finalize(&mut self, name: &str, collided: bool, scoring: &ScoringSettings) -> f64 {
        if collided {
            self.loss -= scoring.collision_penalty;
        }
        self.loss += self.steps_total as f64;
        let exploration = self.direction_counts.min();
        if exploration > 0 {
            info!(name, exploration, "utilized all directions");
            self.loss *= ((exploration + 1) as f64).sqrt();
        }
        self.loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(300, 300, 15).unwrap()
    }

    #[test]
    fn test_distance_direct() {
        let d = distance_to_apple(&grid(), Cell::new(150, 150), Cell::new(165, 150));
        assert_eq!(d, 15.0);
        let d = distance_to_apple(&grid(), Cell::new(0, 0), Cell::new(30, 40));
        assert_eq!(d, 50.0);
    }

    #[test]
    fn test_distance_wraps_around() {
        // 270 apart directly, 30 around the edge
        let d = distance_to_apple(&grid(), Cell::new(0, 150), Cell::new(270, 150));
        assert_eq!(d, 30.0);
        let d = distance_to_apple(&grid(), Cell::new(150, 285), Cell::new(150, 0));
        assert_eq!(d, 15.0);
        let d = distance_to_apple(&grid(), Cell::new(150, 150), Cell::new(0, 0));
        assert!((d - 150.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_record_move_rewards_approach() {
        let scoring = ScoringSettings::default();
        let mut t = LossTracker::new(30.0);
        t.record_move(Direction::Right, 15.0, &scoring);
        t.record_move(Direction::Right, 15.0, &scoring);
        assert_eq!(t.loss, 2.0);
        t.record_move(Direction::Up, 20.0, &scoring);
        assert_eq!(t.loss, 0.5);
        assert_eq!(t.apple_distance, 20.0);
        assert_eq!(t.direction_counts.get(Direction::Right), 2);
        assert_eq!(t.direction_counts.get(Direction::Up), 1);
    }

    #[test]
    fn test_record_apple_resets_counter() {
        let scoring = ScoringSettings::default();
        let mut t = LossTracker::new(0.0);
        t.record_apple(false, &scoring);
        t.record_apple(false, &scoring);
        assert_eq!(t.steps_without_apple, 2);
        t.record_apple(true, &scoring);
        assert_eq!(t.steps_without_apple, 0);
        assert_eq!(t.steps_total, 3);
        assert_eq!(t.loss, 100.0);
    }

    #[test]
    fn test_longevity_bonus_grows_with_steps() {
        let scoring = ScoringSettings::default();
        let finish = |steps: u64| {
            let mut t = LossTracker::new(0.0);
            t.steps_total = steps;
            t.finalize("test", true, &scoring)
        };
        assert_eq!(finish(4), -996.0);
        assert!(finish(10) > finish(4));
    }

    #[test]
    fn test_exploration_multiplier_needs_all_four() {
        let scoring = ScoringSettings::default();
        let mut three = LossTracker::new(0.0);
        for d in [Direction::Left, Direction::Right, Direction::Up] {
            three.direction_counts.record(d);
        }
        three.steps_total = 3;
        assert_eq!(three.finalize("three", false, &scoring), 3.0);

        let mut four = LossTracker::new(0.0);
        for d in Direction::ALL {
            four.direction_counts.record(d);
        }
        four.steps_total = 4;
        let loss = four.finalize("four", false, &scoring);
        assert!((loss - 4.0 * 2f64.sqrt()).abs() < 1e-12);
    }
}
