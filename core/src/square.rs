use core::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor positions of one square, at most eight.
pub type Neighbors = SmallVec<[Position; 8]>;

/// What a square holds. Behavior differs only through the flags below.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareKind {
    Empty,
    Mine,
}

impl SquareKind {
    /// Revealing this kind ends the game.
    pub const fn is_game_over(self) -> bool {
        match self {
            Self::Empty => false,
            Self::Mine => true,
        }
    }

    /// A neighboring flood fill may reveal this kind.
    pub const fn is_auto_revealable(self) -> bool {
        match self {
            Self::Empty => true,
            Self::Mine => false,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Mine => "mine",
        }
    }
}

impl Default for SquareKind {
    fn default() -> Self {
        Self::Empty
    }
}

impl fmt::Display for SquareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One cell of a [`Grid`].
///
/// Neighbors are kept as positions into the owning grid, which rebuilds them
/// whenever squares are replaced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Square {
    kind: SquareKind,
    revealed: bool,
    flagged: bool,
    neighbors: Neighbors,
}

impl Square {
    pub fn new(kind: SquareKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::new(SquareKind::Empty)
    }

    pub fn mine() -> Self {
        Self::new(SquareKind::Mine)
    }

    pub const fn kind(&self) -> SquareKind {
        self.kind
    }

    pub const fn is_game_over(&self) -> bool {
        self.kind.is_game_over()
    }

    pub const fn is_auto_revealable(&self) -> bool {
        self.kind.is_auto_revealable()
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub fn neighbors(&self) -> &[Position] {
        &self.neighbors
    }

    pub fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }

    /// Number of neighbors in `squares` whose reveal would end the game.
    pub fn surrounding_game_over_count(&self, squares: &Array2<Square>) -> u8 {
        let count = self
            .neighbors
            .iter()
            .filter(|&&pos| squares[pos.to_nd_index()].is_game_over())
            .count();
        // at most eight neighbors
        count as u8
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Neighbors) {
        self.neighbors = neighbors;
    }

    fn mark_revealed(&mut self) {
        self.revealed = true;
        self.flagged = false;
    }
}

/// Reveals the square at `start` and floods outward through squares with no
/// surrounding game-over squares. Returns whether the revealed square ends the game.
///
/// The caller is responsible for rejecting an already revealed `start`.
pub(crate) fn reveal_square(squares: &mut Array2<Square>, start: Position) -> bool {
    let square = &mut squares[start.to_nd_index()];
    square.mark_revealed();
    if square.is_game_over() {
        return true;
    }

    let mut opened = 1usize;
    let mut pending = vec![start];

    while let Some(pos) = pending.pop() {
        let square = &squares[pos.to_nd_index()];
        if square.surrounding_game_over_count(squares) > 0 {
            continue;
        }

        let neighbors = square.neighbors.clone();
        for neighbor_pos in neighbors {
            let neighbor = &mut squares[neighbor_pos.to_nd_index()];
            if neighbor.is_auto_revealable() && !neighbor.revealed {
                neighbor.mark_revealed();
                opened += 1;
                pending.push(neighbor_pos);
            }
        }
    }

    log::trace!("Reveal at {start} opened {opened} squares");
    false
}
