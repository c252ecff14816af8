//! Rules engine for a Minesweeper grid.
//!
//! A [`Grid`] owns every [`Square`], defers mine placement until the first
//! reveal so that the first click and its surroundings stay safe, and flood
//! fills safe areas on reveal. Rendering, input parsing and persistence are
//! left to the caller; [`BoardView`] and [`TileView`] carry what a board
//! template needs.

use serde::{Deserialize, Serialize};

pub use builder::*;
pub use error::*;
pub use grid::*;
pub use square::*;
pub use types::*;
pub use view::*;

mod builder;
mod error;
mod grid;
mod square;
mod types;
mod view;

pub const DEFAULT_ROWS: Coord = 8;
pub const DEFAULT_COLUMNS: Coord = 8;
pub const DEFAULT_MINES: CellCount = 10;

/// Dimensions and mine count of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl GridConfig {
    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    /// Non-positive dimensions fall back to 8 and a negative mine count to 10.
    pub fn new(rows: i64, columns: i64, mines: i64) -> Self {
        let rows = dimension_or_default(rows, DEFAULT_ROWS);
        let columns = dimension_or_default(columns, DEFAULT_COLUMNS);
        let mines = if mines < 0 {
            DEFAULT_MINES
        } else {
            CellCount::try_from(mines).unwrap_or_else(|_| {
                log::warn!("Requested {mines} mines, clamping to {}", CellCount::MAX);
                CellCount::MAX
            })
        };
        Self::new_unchecked(rows, columns, mines)
    }

    /// Like [`GridConfig::new`], additionally resetting values over the custom
    /// board form limits (30 rows, 16 columns, 99 mines) to their defaults.
    pub fn from_custom_input(rows: i64, columns: i64, mines: i64) -> Self {
        let rows = if rows > 30 { DEFAULT_ROWS.into() } else { rows };
        let columns = if columns > 16 {
            DEFAULT_COLUMNS.into()
        } else {
            columns
        };
        let mines = if mines > 99 {
            DEFAULT_MINES.into()
        } else {
            mines
        };
        Self::new(rows, columns, mines)
    }

    /// Re-applies the defaulting rules, for configs built with [`GridConfig::new_unchecked`].
    pub fn normalized(self) -> Self {
        Self::new(self.rows.into(), self.columns.into(), self.mines.into())
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(8, 8, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    pub const fn size(&self) -> Size {
        (self.rows, self.columns)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

fn dimension_or_default(value: i64, default: Coord) -> Coord {
    if value <= 0 {
        default
    } else {
        Coord::try_from(value).unwrap_or_else(|_| {
            log::warn!("Grid dimension {value} too large, clamping to {}", Coord::MAX);
            Coord::MAX
        })
    }
}
