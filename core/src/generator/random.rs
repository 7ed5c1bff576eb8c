use ndarray::Array2;

use super::*;

/// Places mines at uniformly random distinct cells by rejection sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    /// Reproducible generator, the same seed always yields the same layout.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> (Board, Overlay) {
        use rand::prelude::*;

        let size = config.size();
        let total_cells = config.total_cells();
        let mut mines = config.mines();
        if mines >= total_cells {
            log::warn!(
                "Requested {} mines but only {} fit with a safe cell, placing {}",
                mines,
                total_cells,
                total_cells.saturating_sub(1)
            );
            mines = total_cells.saturating_sub(1);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;
        let mut rejected = 0u32;

        // at least one cell stays free, so every draw has a chance to land
        while mines_placed < mines {
            let coords = (rng.random_range(0..size.0), rng.random_range(0..size.1));
            let cell = &mut mine_mask[coords.to_nd_index()];
            if *cell {
                rejected += 1;
                continue;
            }
            *cell = true;
            mines_placed += 1;
        }

        log::debug!(
            "Generated {}x{} board with {} mines ({} rejected draws)",
            config.rows(),
            config.cols(),
            mines_placed,
            rejected
        );

        (Board::from_mine_mask(&mine_mask), Overlay::new(size))
    }
}
