use rand::Rng;

use crate::boundary::Boundary;
use crate::geometry::{Cell, Direction};
use crate::grid::Grid;

/// The snake body.
///
/// `segments` is preallocated to the grid capacity. Only the first `length`
/// entries are live; the rest hold an off-grid sentinel until the body grows
/// into them.
#[derive(Clone, Debug)]
pub struct Snake {
    segments: Vec<Cell>,
    length: usize,
    direction: Direction,
    grid: Grid,
    boundary: Boundary,
}

impl Snake {
    /// Head centred on the grid, body slots parked on the sentinel.
    ///
    /// `length` must be in `1..=grid.capacity()`; settings validation
    /// guarantees this for episodes.
    pub fn new(grid: Grid, boundary: Boundary, length: usize, direction: Direction) -> Self {
        let capacity = grid.capacity();
        let head = grid.center();
        let sentinel = Cell::new(-grid.step_size(), head.y);
        let mut segments = vec![sentinel; capacity];
        segments[0] = head;
        Self {
            segments,
            length: length.clamp(1, capacity),
            direction,
            grid,
            boundary,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(grid: Grid, boundary: Boundary, length: usize, rng: &mut R) -> Self {
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        Self::new(grid, boundary, length, direction)
    }

    /// Builds a snake from explicit live segments, head first.
    pub fn from_segments(grid: Grid, boundary: Boundary, body: &[Cell], direction: Direction) -> Self {
        let mut snake = Self::new(grid, boundary, body.len().max(1), direction);
        let live = body.len().min(snake.segments.len());
        snake.segments[..live].copy_from_slice(&body[..live]);
        snake
    }

    /// Advances one tick and returns the direction actually taken.
    ///
    /// A request for the exact reverse of the current heading is replaced by
    /// the current heading.
    pub fn update(&mut self, requested: Direction) -> Direction {
        let direction = if requested == self.direction.opposite() {
            self.direction
        } else {
            requested
        };

        for i in (1..self.length).rev() {
            self.segments[i] = self.segments[i - 1];
        }

        let head = self.segments[0].step(direction, self.grid.step_size());
        self.segments[0] = self.boundary.wrap(&self.grid, head);
        self.direction = direction;
        direction
    }

    /// Lengthens the body by one slot; returns `false` once the grid is full.
    pub fn grow(&mut self) -> bool {
        if self.length < self.segments.len() {
            self.length += 1;
            true
        } else {
            false
        }
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    /// Live segments, head first.
    pub fn body(&self) -> &[Cell] {
        &self.segments[..self.length]
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.segments.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body().contains(&cell)
    }

    pub fn collided_with_itself(&self) -> bool {
        let head = self.head();
        self.body()[1..].contains(&head)
    }

    pub fn collided_with_boundary(&self) -> bool {
        self.boundary.is_wall(self.head())
    }

    pub fn collided(&self) -> bool {
        self.collided_with_itself() || self.collided_with_boundary()
    }

    /// Whether the cell one step away in `side` is free of walls and body.
    pub fn is_clear(&self, side: Direction) -> bool {
        let next = self.head().step(side, self.grid.step_size());
        let next = self.boundary.wrap(&self.grid, next);
        !self.boundary.is_wall(next) && !self.occupies(next)
    }
}
