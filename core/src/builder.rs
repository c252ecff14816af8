use crate::*;

/// Builds a grid with its mines already laid out.
///
/// Unlike a plain [`Grid`], whose first reveal places the mines, a built grid
/// offers no first-click safety.
#[derive(Clone, Debug, PartialEq)]
pub struct GridBuilder {
    config: GridConfig,
    seed: Option<u64>,
}

impl GridBuilder {
    pub fn new(config: GridConfig) -> Self {
        Self { config, seed: None }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Grid {
        let mut grid = match self.seed {
            Some(seed) => Grid::with_seed(self.config, seed),
            None => Grid::new(self.config),
        };

        let config = grid.config();
        let total_cells = config.total_cells();
        if config.mines > total_cells {
            log::warn!(
                "Grid already full, requested {} mines but only fits {}",
                config.mines,
                total_cells
            );
        }

        for _ in 0..config.mines.min(total_cells) {
            grid.place_random_square(Square::mine(), None);
        }
        grid.rebuild_neighbors();
        grid.mark_initiated();

        log::debug!(
            "Built {}x{} grid with {} mines",
            config.rows,
            config.columns,
            grid.count_squares(Some(SquareKind::Mine))
        );
        grid
    }
}
