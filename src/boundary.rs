use std::fmt;
use std::str::FromStr;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::geometry::Cell;
use crate::grid::Grid;

/// Configuration tag selecting the boundary behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryType {
    #[default]
    HardBoundary,
    PeriodicBoundary,
}

impl BoundaryType {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryType::HardBoundary => "hard_boundary",
            BoundaryType::PeriodicBoundary => "periodic_boundary",
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hard_boundary" => Ok(BoundaryType::HardBoundary),
            "periodic_boundary" => Ok(BoundaryType::PeriodicBoundary),
            other => Err(SettingsError::UnknownBoundary(other.to_string())),
        }
    }
}

/// What happens when the head leaves the grid. Fixed for a whole episode.
#[derive(Clone, Debug)]
pub enum Boundary {
    /// The head reappears on the opposite edge.
    Periodic,
    /// The ring of cells just outside the grid is lethal.
    Hard { walls: AHashSet<Cell> },
}

impl Boundary {
    pub fn new(kind: BoundaryType, grid: &Grid) -> Self {
        match kind {
            BoundaryType::PeriodicBoundary => Boundary::Periodic,
            BoundaryType::HardBoundary => Boundary::Hard { walls: grid.wall_cells() },
        }
    }

    pub fn kind(&self) -> BoundaryType {
        match self {
            Boundary::Periodic => BoundaryType::PeriodicBoundary,
            Boundary::Hard { .. } => BoundaryType::HardBoundary,
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(self, Boundary::Periodic)
    }

    /// Wraps a head that stepped off the grid. Identity for hard boundaries.
    pub fn wrap(&self, grid: &Grid, mut cell: Cell) -> Cell {
        if let Boundary::Periodic = self {
            let last_x = grid.width() - grid.step_size();
            let last_y = grid.height() - grid.step_size();
            if cell.x > last_x {
                cell.x = 0;
            }
            if cell.x < 0 {
                cell.x = last_x;
            }
            if cell.y > last_y {
                cell.y = 0;
            }
            if cell.y < 0 {
                cell.y = last_y;
            }
        }
        cell
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        match self {
            Boundary::Periodic => false,
            Boundary::Hard { walls } => walls.contains(&cell),
        }
    }

    pub fn walls(&self) -> Option<&AHashSet<Cell>> {
        match self {
            Boundary::Periodic => None,
            Boundary::Hard { walls } => Some(walls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(300, 300, 15).unwrap()
    }

    #[test]
    fn test_boundary_tags_round_trip() {
        for kind in [BoundaryType::HardBoundary, BoundaryType::PeriodicBoundary] {
            assert_eq!(kind.as_str().parse::<BoundaryType>().unwrap(), kind);
        }
        let err = "soft_boundary".parse::<BoundaryType>().unwrap_err();
        assert_eq!(err.to_string(), "soft_boundary is not a valid boundary type");
    }

    #[test]
    fn test_periodic_wraps_every_edge() {
        let g = grid();
        let b = Boundary::new(BoundaryType::PeriodicBoundary, &g);
        assert_eq!(b.wrap(&g, Cell::new(300, 45)), Cell::new(0, 45));
        assert_eq!(b.wrap(&g, Cell::new(-15, 45)), Cell::new(285, 45));
        assert_eq!(b.wrap(&g, Cell::new(45, 300)), Cell::new(45, 0));
        assert_eq!(b.wrap(&g, Cell::new(45, -15)), Cell::new(45, 285));
        assert_eq!(b.wrap(&g, Cell::new(45, 45)), Cell::new(45, 45));
        assert!(!b.is_wall(Cell::new(300, 45)));
    }

    #[test]
    fn test_hard_does_not_wrap() {
        let g = grid();
        let b = Boundary::new(BoundaryType::HardBoundary, &g);
        assert_eq!(b.wrap(&g, Cell::new(300, 45)), Cell::new(300, 45));
        assert!(b.is_wall(Cell::new(300, 45)));
        assert!(b.is_wall(Cell::new(-15, 45)));
        assert!(b.is_wall(Cell::new(45, 300)));
        assert!(b.is_wall(Cell::new(45, -15)));
        assert!(!b.is_wall(Cell::new(285, 285)));
        assert_eq!(b.kind(), BoundaryType::HardBoundary);
    }
}
