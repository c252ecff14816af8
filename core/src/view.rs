use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a board template shows for one square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Closed,
    /// Revealed safe square with its number of surrounding mines.
    Open(u8),
    Flag,
    /// The mine that ended the game.
    Exploded,
    /// Unflagged mine uncovered after a loss.
    Mine,
    /// Flag on a safe square, shown after the game ended.
    IncorrectFlag,
}

impl TileView {
    /// Still drawn as an unopened button.
    pub const fn is_closed(self) -> bool {
        use TileView::*;
        match self {
            Closed => true,
            Open(_) => false,
            Flag => true,
            Exploded => false,
            Mine => false,
            IncorrectFlag => true,
        }
    }

    /// Number to print on the tile, if any.
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Open(count) if count > 0 => Some(count),
            _ => None,
        }
    }
}

impl Default for TileView {
    fn default() -> Self {
        Self::Closed
    }
}

/// Snapshot of a grid for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
    pub is_game_over: bool,
    pub is_won_by_player: bool,
    pub tiles: Array2<TileView>,
    pub disabled: Array2<bool>,
}

impl BoardView {
    pub fn tile(&self, position: Position) -> TileView {
        self.tiles[position.to_nd_index()]
    }

    pub fn is_disabled(&self, position: Position) -> bool {
        self.disabled[position.to_nd_index()]
    }
}

impl Grid {
    pub fn tile_view(&self, position: Position) -> Result<TileView> {
        use TileView::*;

        let square = self.square(position)?;
        let finished = self.is_game_over();
        let won = self.is_won_by_player();

        Ok(match (square.kind(), square.is_revealed(), square.is_flagged()) {
            (SquareKind::Mine, true, _) => Exploded,
            (SquareKind::Empty, true, _) => Open(self.surrounding_mines(position)?),
            (SquareKind::Mine, false, _) if finished && won => Flag,
            (SquareKind::Mine, false, false) if finished => Mine,
            (SquareKind::Empty, false, true) if finished => IncorrectFlag,
            (_, false, true) => Flag,
            (_, false, false) => Closed,
        })
    }

    /// Whether the square no longer accepts a reveal.
    pub fn is_disabled(&self, position: Position) -> Result<bool> {
        let square = self.square(position)?;
        Ok(square.is_flagged() || square.is_revealed() || self.is_game_over())
    }

    pub fn board_view(&self) -> BoardView {
        let size = self.size().to_nd_index();
        let mut tiles: Array2<TileView> = Array2::default(size);
        let mut disabled: Array2<bool> = Array2::default(size);

        for (position, _) in self.squares() {
            let index = position.to_nd_index();
            // positions come from this grid
            tiles[index] = self.tile_view(position).unwrap_or_default();
            disabled[index] = self.is_disabled(position).unwrap_or(true);
        }

        BoardView {
            rows: self.rows(),
            columns: self.columns(),
            mines: self.count_squares(Some(SquareKind::Mine)),
            is_game_over: self.is_game_over(),
            is_won_by_player: self.is_won_by_player(),
            tiles,
            disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_mines(size: Size, mines: &[(Coord, Coord)]) -> Grid {
        let (rows, columns) = size;
        let mut grid = Grid::with_seed(GridConfig::new_unchecked(rows, columns, 0), 1);
        for &pos in mines {
            grid.place_square(Square::mine(), Some(pos.into()), false, None)
                .unwrap();
        }
        grid.rebuild_neighbors();
        grid
    }

    #[test]
    fn fresh_board_is_closed_and_enabled() {
        let grid = grid_with_mines((3, 3), &[(0, 0)]);
        let view = grid.board_view();

        assert_eq!(view.mines, 1);
        assert!(view.tiles.iter().all(|&tile| tile == TileView::Closed));
        assert!(view.disabled.iter().all(|&disabled| !disabled));
    }

    #[test]
    fn revealed_squares_show_numbers() {
        let mut grid = grid_with_mines((1, 4), &[(0, 0)]);
        grid.toggle_flag(Position::new(0, 0)).unwrap();

        grid.reveal(Position::new(0, 3)).unwrap();
        let view = grid.board_view();

        assert_eq!(view.tile(Position::new(0, 0)), TileView::Flag);
        assert_eq!(view.tile(Position::new(0, 1)), TileView::Open(1));
        assert_eq!(view.tile(Position::new(0, 1)).number(), Some(1));
        assert_eq!(view.tile(Position::new(0, 3)), TileView::Open(0));
        assert_eq!(view.tile(Position::new(0, 3)).number(), None);
        assert!(view.is_game_over && view.is_won_by_player);
    }

    #[test]
    fn won_board_flags_every_mine() {
        let mut grid = grid_with_mines((2, 2), &[(0, 0), (1, 1)]);

        grid.reveal(Position::new(0, 1)).unwrap();
        grid.reveal(Position::new(1, 0)).unwrap();

        assert!(grid.is_won_by_player());
        assert_eq!(grid.tile_view(Position::new(0, 0)), Ok(TileView::Flag));
        assert_eq!(grid.tile_view(Position::new(1, 1)), Ok(TileView::Flag));
        assert_eq!(grid.is_disabled(Position::new(0, 1)), Ok(true));
    }

    #[test]
    fn lost_board_uncovers_mines_and_wrong_flags() {
        let mut grid = grid_with_mines((2, 3), &[(0, 0), (0, 2), (1, 2)]);
        grid.toggle_flag(Position::new(0, 2)).unwrap();
        grid.toggle_flag(Position::new(1, 0)).unwrap();

        assert_eq!(grid.reveal(Position::new(0, 0)), Ok(true));
        let view = grid.board_view();

        assert_eq!(view.tile(Position::new(0, 0)), TileView::Exploded);
        assert_eq!(view.tile(Position::new(0, 2)), TileView::Flag);
        assert_eq!(view.tile(Position::new(1, 2)), TileView::Mine);
        assert_eq!(view.tile(Position::new(1, 0)), TileView::IncorrectFlag);
        assert_eq!(view.tile(Position::new(0, 1)), TileView::Closed);
        assert!(view.disabled.iter().all(|&disabled| disabled));
    }

    #[test]
    fn flagged_square_is_disabled_while_playing() {
        let mut grid = grid_with_mines((2, 2), &[(0, 0)]);
        grid.toggle_flag(Position::new(1, 1)).unwrap();

        assert_eq!(grid.is_disabled(Position::new(1, 1)), Ok(true));
        assert_eq!(grid.is_disabled(Position::new(1, 0)), Ok(false));
        assert_eq!(
            grid.tile_view(Position::new(2, 0)),
            Err(GridError::InvalidPosition)
        );
    }
}
