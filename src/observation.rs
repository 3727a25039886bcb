//! The fixed 8-feature vector a policy sees each tick.
//!
//! Layout, which trained policies depend on:
//!
//! | index | feature        |
//! |-------|----------------|
//! | 0     | apple left     |
//! | 1     | apple right    |
//! | 2     | apple above    |
//! | 3     | apple below    |
//! | 4     | right clear    |
//! | 5     | left clear     |
//! | 6     | top clear      |
//! | 7     | bottom clear   |

use crate::apple::Apple;
use crate::geometry::Direction;
use crate::snake::Snake;

pub const OBSERVATION_SIZE: usize = 8;

pub const APPLE_LEFT: usize = 0;
pub const APPLE_RIGHT: usize = 1;
pub const APPLE_ABOVE: usize = 2;
pub const APPLE_BELOW: usize = 3;
pub const RIGHT_CLEAR: usize = 4;
pub const LEFT_CLEAR: usize = 5;
pub const TOP_CLEAR: usize = 6;
pub const BOTTOM_CLEAR: usize = 7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Observation([bool; OBSERVATION_SIZE]);

impl Observation {
    pub fn compute(snake: &Snake, apple: &Apple) -> Self {
        let head = snake.head();
        let apple = apple.position();
        Self([
            apple.x < head.x,
            apple.x > head.x,
            apple.y < head.y,
            apple.y > head.y,
            snake.is_clear(Direction::Right),
            snake.is_clear(Direction::Left),
            snake.is_clear(Direction::Up),
            snake.is_clear(Direction::Down),
        ])
    }

    pub fn from_values(values: [bool; OBSERVATION_SIZE]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[bool; OBSERVATION_SIZE] {
        &self.0
    }

    /// Network input form: `1.0` for true, `0.0` for false.
    pub fn to_inputs(&self) -> [f32; OBSERVATION_SIZE] {
        self.0.map(|v| if v { 1.0 } else { 0.0 })
    }

    pub fn apple_towards(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.0[APPLE_LEFT],
            Direction::Right => self.0[APPLE_RIGHT],
            Direction::Up => self.0[APPLE_ABOVE],
            Direction::Down => self.0[APPLE_BELOW],
        }
    }

    pub fn is_clear(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.0[LEFT_CLEAR],
            Direction::Right => self.0[RIGHT_CLEAR],
            Direction::Up => self.0[TOP_CLEAR],
            Direction::Down => self.0[BOTTOM_CLEAR],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Boundary, BoundaryType};
    use crate::geometry::Cell;
    use crate::grid::Grid;

    fn grid() -> Grid {
        Grid::new(300, 300, 15).unwrap()
    }

    #[test]
    fn test_apple_relative_position() {
        let g = grid();
        let snake = Snake::new(g, Boundary::new(BoundaryType::HardBoundary, &g), 3, Direction::Right);
        let obs = Observation::compute(&snake, &Apple::at(Cell::new(45, 240)));
        assert_eq!(&obs.values()[..4], &[true, false, false, true]);
        let obs = Observation::compute(&snake, &Apple::at(Cell::new(150, 15)));
        assert_eq!(&obs.values()[..4], &[false, false, true, false]);
        assert!(obs.apple_towards(Direction::Up));
    }

    #[test]
    fn test_clear_sides_in_fixed_order() {
        let g = grid();
        let boundary = Boundary::new(BoundaryType::HardBoundary, &g);
        // head in the top-left corner, body to its right
        let snake = Snake::from_segments(g, boundary, &[Cell::new(0, 0), Cell::new(15, 0)], Direction::Left);
        let obs = Observation::compute(&snake, &Apple::at(Cell::new(150, 150)));
        assert_eq!(
            obs.values(),
            &[false, true, false, true, false, false, false, true]
        );
        assert!(obs.is_clear(Direction::Down));
        assert!(!obs.is_clear(Direction::Right));
        assert_eq!(obs.to_inputs(), [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_periodic_edge_sees_wrapped_body() {
        let g = grid();
        let boundary = Boundary::new(BoundaryType::PeriodicBoundary, &g);
        let body = [Cell::new(150, 0), Cell::new(150, 285), Cell::new(150, 270)];
        let snake = Snake::from_segments(g, boundary, &body, Direction::Down);
        let obs = Observation::compute(&snake, &Apple::at(Cell::new(0, 0)));
        assert!(!obs.is_clear(Direction::Up));
        assert!(obs.is_clear(Direction::Down));
        assert!(obs.is_clear(Direction::Left));
        assert!(obs.is_clear(Direction::Right));
    }
}
