use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Single coordinate axis used for grid rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid dimensions as `(rows, columns)`.
pub type Size = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Size {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Zero-based `(row, column)` pair addressing one square of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: Coord,
    pub column: Coord,
}

impl Position {
    pub const fn new(row: Coord, column: Coord) -> Self {
        Self { row, column }
    }

    /// Largest of the row and column distances to `other`.
    pub const fn chebyshev_distance(self, other: Position) -> Coord {
        let rows = self.row.abs_diff(other.row);
        let columns = self.column.abs_diff(other.column);
        if rows > columns { rows } else { columns }
    }

    pub const fn is_within(self, (rows, columns): Size) -> bool {
        self.row < rows && self.column < columns
    }

    /// Positions around `self` that fall inside `bounds`, clockwise from the top-left.
    pub fn neighbors(self, bounds: Size) -> NeighborIter {
        NeighborIter::new(self, bounds)
    }

    pub(crate) const fn from_nd_index((row, column): (usize, usize)) -> Self {
        // grid dimensions never exceed `Coord::MAX`
        Self::new(row as Coord, column as Coord)
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((row, column): (Coord, Coord)) -> Self {
        Self::new(row, column)
    }
}

impl TryFrom<(i64, i64)> for Position {
    type Error = GridError;

    fn try_from((row, column): (i64, i64)) -> Result<Self> {
        let row = Coord::try_from(row).map_err(|_| GridError::InvalidPosition)?;
        let column = Coord::try_from(column).map_err(|_| GridError::InvalidPosition)?;
        Ok(Self::new(row, column))
    }
}

/// Parses `"row,column"`, as submitted by a board form.
impl FromStr for Position {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let (row, column) = s.split_once(',').ok_or(GridError::InvalidPosition)?;
        let row: i64 = row.trim().parse().map_err(|_| GridError::InvalidPosition)?;
        let column: i64 = column.trim().parse().map_err(|_| GridError::InvalidPosition)?;
        Self::try_from((row, column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.column.into()]
    }
}

/// `(row, column)` offsets: top-left, top, top-right, right, bottom-right, bottom, bottom-left, left.
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Applies `delta` to `position`, returning a value only when it remains in bounds.
fn apply_delta(position: Position, delta: (i8, i8), bounds: Size) -> Option<Position> {
    let (d_row, d_column) = delta;
    let (rows, columns) = bounds;

    let row = position.row.checked_add_signed(d_row)?;
    if row >= rows {
        return None;
    }

    let column = position.column.checked_add_signed(d_column)?;
    if column >= columns {
        return None;
    }

    Some(Position::new(row, column))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    bounds: Size,
    index: u8,
}

impl NeighborIter {
    fn new(center: Position, bounds: Size) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(center: (Coord, Coord), bounds: Size) -> Vec<(Coord, Coord)> {
        Position::from(center)
            .neighbors(bounds)
            .map(|pos| (pos.row, pos.column))
            .collect()
    }

    #[test]
    fn neighbors_run_clockwise_from_top_left() {
        assert_eq!(
            neighbors((2, 3), (8, 8)),
            [
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 4),
                (3, 4),
                (3, 3),
                (3, 2),
                (2, 2)
            ]
        );
    }

    #[test]
    fn neighbors_skip_cells_outside_the_grid() {
        assert_eq!(neighbors((0, 0), (8, 8)), [(0, 1), (1, 1), (1, 0)]);
        assert_eq!(neighbors((7, 7), (8, 8)), [(6, 6), (6, 7), (7, 6)]);
        assert_eq!(neighbors((0, 4), (8, 8)).len(), 5);
        assert!(neighbors((0, 0), (1, 1)).is_empty());
    }

    #[test]
    fn chebyshev_distance_takes_the_larger_axis() {
        let center = Position::new(4, 4);
        assert_eq!(center.chebyshev_distance(center), 0);
        assert_eq!(center.chebyshev_distance(Position::new(5, 3)), 1);
        assert_eq!(center.chebyshev_distance(Position::new(6, 5)), 2);
        assert_eq!(Position::new(0, 7).chebyshev_distance(Position::new(7, 0)), 7);
    }

    #[test]
    fn parse_accepts_row_column_pairs() {
        assert_eq!("2,5".parse::<Position>(), Ok(Position::new(2, 5)));
        assert_eq!(" 7 , 0 ".parse::<Position>(), Ok(Position::new(7, 0)));
        assert_eq!(Position::new(3, 1).to_string(), "3,1");
    }

    #[test]
    fn parse_rejects_negative_and_non_numeric_input() {
        for input in ["-1,2", "2,-1", "a,1", "1,b", "1", "", "1,2,3", "999,1"] {
            assert_eq!(
                input.parse::<Position>(),
                Err(GridError::InvalidPosition),
                "{input:?}"
            );
        }
        assert_eq!(
            Position::try_from((-3_i64, 0_i64)),
            Err(GridError::InvalidPosition)
        );
    }
}
