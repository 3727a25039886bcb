use ahash::AHashSet;

use crate::error::SettingsError;
use crate::geometry::Cell;

/// The discrete cell lattice derived from the display size and step size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    step_size: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, step_size: i32) -> Result<Self, SettingsError> {
        for (name, value) in [("display_width", width), ("display_height", height), ("step_size", step_size)] {
            if value <= 0 {
                return Err(SettingsError::NonPositive { name, value });
            }
        }
        for (name, value) in [("display_width", width), ("display_height", height)] {
            if value % step_size != 0 {
                return Err(SettingsError::NotDivisible { name, value, step_size });
            }
        }
        Ok(Self { width, height, step_size })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn step_size(&self) -> i32 {
        self.step_size
    }

    pub fn columns(&self) -> usize {
        (self.width / self.step_size) as usize
    }

    pub fn rows(&self) -> usize {
        (self.height / self.step_size) as usize
    }

    /// Number of cells, which is also the maximum snake length.
    pub fn capacity(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Lattice cell closest to the middle of the display.
    pub fn center(&self) -> Cell {
        Cell::new(
            (self.columns() / 2) as i32 * self.step_size,
            (self.rows() / 2) as i32 * self.step_size,
        )
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x < self.width
            && cell.y >= 0
            && cell.y < self.height
            && cell.x % self.step_size == 0
            && cell.y % self.step_size == 0
    }

    /// All cells in a fixed order: x-major, then y.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let step = self.step_size as usize;
        (0..self.width).step_by(step).flat_map(move |x| {
            (0..self.height).step_by(step).map(move |y| Cell::new(x, y))
        })
    }

    /// The ring of cells one step outside the grid, corners included.
    pub fn wall_cells(&self) -> AHashSet<Cell> {
        let s = self.step_size;
        let mut walls = AHashSet::with_capacity(2 * (self.columns() + self.rows()) + 4);
        for y in (-s..=self.height).step_by(s as usize) {
            walls.insert(Cell::new(-s, y));
            walls.insert(Cell::new(self.width, y));
        }
        for x in (-s..=self.width).step_by(s as usize) {
            walls.insert(Cell::new(x, -s));
            walls.insert(Cell::new(x, self.height));
        }
        walls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let grid = Grid::new(300, 150, 15).unwrap();
        assert_eq!(grid.columns(), 20);
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.capacity(), 200);
        assert_eq!(grid.cells().count(), 200);
        assert_eq!(grid.center(), Cell::new(150, 75));
    }

    #[test]
    fn test_grid_rejects_bad_dimensions() {
        assert!(matches!(
            Grid::new(301, 300, 15),
            Err(SettingsError::NotDivisible { name: "display_width", .. })
        ));
        assert!(matches!(
            Grid::new(300, 310, 15),
            Err(SettingsError::NotDivisible { name: "display_height", .. })
        ));
        assert!(matches!(Grid::new(-300, 300, 15), Err(SettingsError::NonPositive { .. })));
        assert!(matches!(Grid::new(300, 300, 0), Err(SettingsError::NonPositive { name: "step_size", .. })));
    }

    #[test]
    fn test_cells_are_inside_and_ordered() {
        let grid = Grid::new(45, 30, 15).unwrap();
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 15),
                Cell::new(15, 0),
                Cell::new(15, 15),
                Cell::new(30, 0),
                Cell::new(30, 15),
            ]
        );
        assert!(cells.iter().all(|&c| grid.contains(c)));
        assert!(!grid.contains(Cell::new(45, 0)));
        assert!(!grid.contains(Cell::new(7, 0)));
    }

    #[test]
    fn test_wall_ring_surrounds_grid() {
        let grid = Grid::new(45, 30, 15).unwrap();
        let walls = grid.wall_cells();
        // (columns + 2) * (rows + 2) - columns * rows
        assert_eq!(walls.len(), 5 * 4 - 6);
        assert!(walls.contains(&Cell::new(-15, -15)));
        assert!(walls.contains(&Cell::new(45, 30)));
        assert!(walls.contains(&Cell::new(45, 15)));
        assert!(walls.contains(&Cell::new(15, -15)));
        assert!(grid.cells().all(|c| !walls.contains(&c)));
    }

    #[test]
    fn test_wall_ring_at_the_coordinate_limit() {
        let step = i32::MAX / 3;
        let grid = Grid::new(2 * step, 3 * step, step).unwrap();
        let walls = grid.wall_cells();
        assert_eq!(walls.len(), 4 * 5 - 6);
        assert!(walls.contains(&Cell::new(2 * step, 3 * step)));
        assert!(walls.contains(&Cell::new(-step, 3 * step)));
        assert_eq!(grid.center(), Cell::new(step, step));
    }
}
