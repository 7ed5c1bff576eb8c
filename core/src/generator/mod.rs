use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> (Board, Overlay);
}

/// Generates a fresh board pair for `rows` x `cols` with `mines` mines.
///
/// Each call is seeded independently, so layouts are uniformly distributed
/// over valid mine placements.
pub fn generate(rows: i64, cols: i64, mines: i64) -> Result<(Board, Overlay)> {
    let config = GameConfig::new(rows, cols, mines)?;
    Ok(RandomBoardGenerator::from_entropy().generate(config))
}
