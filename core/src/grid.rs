use std::collections::BTreeSet;

use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::square::reveal_square;
use crate::*;

/// Draws rejected for being too close to the avoided position before the
/// exclusion shrinks to that position alone.
const MAX_AVOID_ATTEMPTS: usize = 50;

/// Playing field: owns all squares and the game-over and win state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    squares: Array2<Square>,
    mine_count: CellCount,
    game_over: bool,
    won_by_player: bool,
    initiated: bool,
    random_positions: BTreeSet<Position>,
    #[serde(skip, default = "SmallRng::from_os_rng")]
    rng: SmallRng,
}

impl Grid {
    pub fn new(config: GridConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Grid whose random placements are reproducible from `seed`.
    pub fn with_seed(config: GridConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GridConfig, rng: SmallRng) -> Self {
        let config = config.normalized();
        let mut grid = Self {
            squares: Array2::default(config.size().to_nd_index()),
            mine_count: config.mines,
            game_over: false,
            won_by_player: false,
            initiated: false,
            random_positions: BTreeSet::new(),
            rng,
        };
        grid.rebuild_neighbors();
        grid
    }

    /// Refills every cell with an empty square.
    ///
    /// Game-over and win state are left as they are, so a finished grid stays
    /// finished after a reset.
    pub fn reset(&mut self) {
        self.squares.fill(Square::empty());
        self.rebuild_neighbors();
        self.initiated = false;
        log::debug!("Grid reset to {}x{} empty squares", self.rows(), self.columns());
    }

    pub fn config(&self) -> GridConfig {
        GridConfig::new_unchecked(self.rows(), self.columns(), self.mine_count)
    }

    pub fn size(&self) -> Size {
        let (rows, columns) = self.squares.dim();
        // dimensions come from a `Coord` pair
        (rows as Coord, columns as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn columns(&self) -> Coord {
        self.size().1
    }

    /// Mines placed by the first reveal.
    pub const fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub const fn is_won_by_player(&self) -> bool {
        self.won_by_player
    }

    /// Whether mines have been placed.
    pub const fn is_initiated(&self) -> bool {
        self.initiated
    }

    pub fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        position.is_within(self.size())
    }

    pub fn validate_position(&self, position: Position) -> Result<Position> {
        if position.is_within(self.size()) {
            Ok(position)
        } else {
            Err(GridError::InvalidPosition)
        }
    }

    pub fn square(&self, position: Position) -> Result<&Square> {
        let position = self.validate_position(position)?;
        Ok(&self.squares[position.to_nd_index()])
    }

    /// All squares with their positions, row by row.
    pub fn squares(&self) -> impl Iterator<Item = (Position, &Square)> {
        self.squares
            .indexed_iter()
            .map(|(index, square)| (Position::from_nd_index(index), square))
    }

    /// Finds where `square` lives in this grid, comparing by identity.
    pub fn position_of(&self, square: &Square) -> Option<Position> {
        self.squares()
            .find(|(_, candidate)| core::ptr::eq(*candidate, square))
            .map(|(position, _)| position)
    }

    /// Existing neighbors of `position`, clockwise from the top-left.
    pub fn neighbors_of(&self, position: Position) -> Result<Vec<&Square>> {
        let position = self.validate_position(position)?;
        Ok(position
            .neighbors(self.size())
            .map(|pos| &self.squares[pos.to_nd_index()])
            .collect())
    }

    /// Number of mines around `position`.
    pub fn surrounding_mines(&self, position: Position) -> Result<u8> {
        let square = self.square(position)?;
        Ok(square.surrounding_game_over_count(&self.squares))
    }

    /// Counts all squares, or only those of `kind`.
    pub fn count_squares(&self, kind: Option<SquareKind>) -> CellCount {
        let count = match kind {
            None => self.squares.len(),
            Some(kind) => self.squares.iter().filter(|sq| sq.kind() == kind).count(),
        };
        // bounded by rows * columns
        count as CellCount
    }

    /// Whether every square that does not end the game is revealed.
    pub fn all_revealed(&self) -> bool {
        self.squares
            .iter()
            .all(|sq| sq.is_game_over() || sq.is_revealed())
    }

    /// Uniformly random in-bounds position.
    pub fn random_position(&mut self) -> Position {
        let (rows, columns) = self.size();
        Position::new(
            self.rng.random_range(0..rows),
            self.rng.random_range(0..columns),
        )
    }

    /// Puts `square` on the grid, overwriting whatever was there, and returns
    /// its position.
    ///
    /// Without an explicit `position` a random one is drawn, never repeating an
    /// earlier random placement until every cell has been used once. `avoid`
    /// additionally keeps random draws off that position and its neighbors.
    /// With `rebuild_neighbors` unset the caller must call
    /// [`Grid::rebuild_neighbors`] once the batch is done.
    pub fn place_square(
        &mut self,
        square: Square,
        position: Option<Position>,
        rebuild_neighbors: bool,
        avoid: Option<Position>,
    ) -> Result<Position> {
        let position = match position {
            Some(position) => {
                let position = self.validate_position(position)?;
                self.squares[position.to_nd_index()] = square;
                position
            }
            None => self.place_random_square(square, avoid),
        };

        if rebuild_neighbors {
            self.rebuild_neighbors();
        }

        Ok(position)
    }

    /// Places `square` at `position` and rebuilds neighbors.
    pub fn place_square_at(&mut self, square: Square, position: Position) -> Result<Position> {
        self.place_square(square, Some(position), true, None)
    }

    /// Recomputes the neighbor list of every square.
    pub fn rebuild_neighbors(&mut self) {
        let bounds = self.size();
        for (index, square) in self.squares.indexed_iter_mut() {
            let position = Position::from_nd_index(index);
            square.set_neighbors(position.neighbors(bounds).collect());
        }
    }

    /// Reveals `position` and returns whether the game is over.
    ///
    /// The first reveal on a grid places its mines away from `position` and
    /// its neighbors.
    pub fn reveal(&mut self, position: Position) -> Result<bool> {
        if self.game_over {
            return Err(GridError::GameOver);
        }

        let position = self.validate_position(position)?;

        if !self.initiated {
            self.place_mines(position);
            self.initiated = true;
        }

        if self.squares[position.to_nd_index()].is_revealed() {
            return Err(GridError::AlreadyRevealed);
        }

        self.game_over = reveal_square(&mut self.squares, position);

        if !self.game_over && self.all_revealed() {
            self.won_by_player = true;
            self.game_over = true;
            log::debug!("Grid cleared, player won");
        }

        Ok(self.game_over)
    }

    /// Flips the flag on an unrevealed square and returns the new flag state.
    pub fn toggle_flag(&mut self, position: Position) -> Result<bool> {
        let position = self.validate_position(position)?;
        if self.game_over {
            return Err(GridError::GameOver);
        }

        let square = &mut self.squares[position.to_nd_index()];
        if square.is_revealed() {
            return Err(GridError::AlreadyRevealed);
        }

        square.toggle_flag();
        Ok(square.is_flagged())
    }

    pub(crate) fn mark_initiated(&mut self) {
        self.initiated = true;
    }

    /// Puts `square` at a random position without touching neighbor lists.
    pub(crate) fn place_random_square(
        &mut self,
        square: Square,
        avoid: Option<Position>,
    ) -> Position {
        let position = self.draw_random_position(avoid);
        self.squares[position.to_nd_index()] = square;
        position
    }

    fn place_mines(&mut self, avoid: Position) {
        let total_cells = self.count_squares(None);
        let mines = if self.mine_count >= total_cells {
            log::warn!(
                "Requested {} mines but only {} cells besides the first reveal, placing fewer",
                self.mine_count,
                total_cells.saturating_sub(1)
            );
            total_cells.saturating_sub(1)
        } else {
            self.mine_count
        };

        for _ in 0..mines {
            self.place_random_square(Square::mine(), Some(avoid));
        }
        self.rebuild_neighbors();

        log::debug!("Placed {mines} mines avoiding {avoid}");
    }

    fn draw_random_position(&mut self, avoid: Option<Position>) -> Position {
        let random_full = self.random_positions.len() >= self.squares.len();
        let mut radius = 1;
        let mut failures = 0;

        let position = loop {
            let candidate = self.random_position();

            if !random_full && self.random_positions.contains(&candidate) {
                continue;
            }

            let Some(avoid) = avoid else {
                break candidate;
            };

            if candidate.chebyshev_distance(avoid) > radius {
                break candidate;
            }

            failures += 1;
            if failures == MAX_AVOID_ATTEMPTS {
                log::warn!("No free cell found away from {avoid}, only avoiding the cell itself");
                radius = 0;
            } else if failures == 2 * MAX_AVOID_ATTEMPTS {
                break self.pick_position_other_than(avoid, random_full);
            }
        };

        self.random_positions.insert(position);
        position
    }

    /// Uniform pick among cells other than `avoid`, preferring cells without an
    /// earlier random placement. Only a single-cell grid yields `avoid` itself.
    fn pick_position_other_than(&mut self, avoid: Position, random_full: bool) -> Position {
        let others: Vec<Position> = self
            .squares()
            .map(|(position, _)| position)
            .filter(|&position| position != avoid)
            .collect();

        let mut eligible: Vec<Position> = others
            .iter()
            .copied()
            .filter(|position| random_full || !self.random_positions.contains(position))
            .collect();
        if eligible.is_empty() {
            log::warn!("Every cell but {avoid} was placed randomly before, allowing repeats");
            eligible = others;
        }

        eligible.choose(&mut self.rng).copied().unwrap_or(avoid)
    }
}
