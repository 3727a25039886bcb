use rand::Rng;
use rand::seq::SliceRandom;

use crate::geometry::Cell;
use crate::snake::Snake;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Apple {
    position: Cell,
}

impl Apple {
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    /// Picks a free cell uniformly at random.
    ///
    /// Returns `None` when the snake fills every cell, i.e. the board is full.
    pub fn generate<R: Rng + ?Sized>(snake: &Snake, rng: &mut R) -> Option<Self> {
        let boundary = snake.boundary();
        let candidates: Vec<Cell> = snake
            .grid()
            .cells()
            .filter(|&c| !snake.occupies(c) && !boundary.is_wall(c))
            .collect();
        candidates.choose(rng).map(|&position| Self { position })
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn is_eaten_by(&self, snake: &Snake) -> bool {
        self.position == snake.head()
    }
}
