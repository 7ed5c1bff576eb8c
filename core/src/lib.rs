//! Rules engine for a turn-based Minesweeper game: board generation, reveal
//! with flood fill, marking, and the game lifecycle.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Identifier the surrounding system assigns to a stored game.
pub type GameId = u64;

/// Smallest accepted board side.
pub const MIN_SIDE: Coord = 3;

/// Validated board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    size: Coord2,
    mines: CellCount,
}

/// Unchecked wire form of [`GameConfig`].
#[derive(Deserialize)]
struct RawGameConfig {
    size: Coord2,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        let (cols, rows) = raw.size;
        Self::new(rows.into(), cols.into(), raw.mines.into())
    }
}

impl GameConfig {
    /// Checks `rows, cols >= 3`, `mines >= 1` and `mines < rows * cols`.
    pub fn new(rows: i64, cols: i64, mines: i64) -> Result<Self> {
        let side = |value: i64| match Coord::try_from(value) {
            Ok(side) if side >= MIN_SIDE => Ok(side),
            Ok(_) => Err(GameError::InvalidParameters("rows and columns must be at least 3")),
            Err(_) if value < 0 => Err(GameError::InvalidParameters(
                "rows and columns must be at least 3",
            )),
            Err(_) => Err(GameError::InvalidParameters("board is too large")),
        };
        let rows = side(rows)?;
        let cols = side(cols)?;

        if mines < 1 {
            return Err(GameError::InvalidParameters("there must be at least one mine"));
        }
        let total = mult(cols, rows);
        let mines = match CellCount::try_from(mines) {
            Ok(mines) if mines < total => mines,
            _ => {
                return Err(GameError::InvalidParameters(
                    "there must be fewer mines than cells",
                ));
            }
        };

        Ok(Self::new_unchecked((cols, rows), mines))
    }

    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// `(cols, rows)`
    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn rows(&self) -> Coord {
        self.size.1
    }

    pub const fn cols(&self) -> Coord {
        self.size.0
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}
