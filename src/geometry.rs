use serde::{Deserialize, Serialize};

/// Heading of the snake. The discriminants are the policy output indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit offset in screen coordinates (y grows downwards).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A cell position in display pixels. Valid cells are multiples of the step size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction, step_size: i32) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx * step_size, self.y + dy * step_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_are_involutions() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }

    #[test]
    fn test_index_order_is_left_right_up_down() {
        assert_eq!(Direction::from_index(0), Some(Direction::Left));
        assert_eq!(Direction::from_index(1), Some(Direction::Right));
        assert_eq!(Direction::from_index(2), Some(Direction::Up));
        assert_eq!(Direction::from_index(3), Some(Direction::Down));
        assert_eq!(Direction::from_index(4), None);
        for d in Direction::ALL {
            assert_eq!(Direction::from_index(d.index()), Some(d));
        }
    }

    #[test]
    fn test_step_moves_by_step_size() {
        let c = Cell::new(150, 150);
        assert_eq!(c.step(Direction::Right, 15), Cell::new(165, 150));
        assert_eq!(c.step(Direction::Left, 15), Cell::new(135, 150));
        assert_eq!(c.step(Direction::Up, 15), Cell::new(150, 135));
        assert_eq!(c.step(Direction::Down, 15), Cell::new(150, 165));
    }
}
