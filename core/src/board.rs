use core::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed mine layout of a game. Every non-mine cell carries its adjacency count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<MineCell>>", try_from = "Vec<Vec<MineCell>>")]
pub struct Board {
    cells: Array2<MineCell>,
    mine_count: CellCount,
}

impl Board {
    /// Builds the layout from a row-major mine mask, filling in adjacency counts.
    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let size = grid_size(mine_mask);
        let mut cells: Array2<MineCell> = Array2::default(mine_mask.raw_dim());
        let mut mine_count = 0;

        let (x_end, y_end) = size;
        for y in 0..y_end {
            for x in 0..x_end {
                let coords = (x, y);
                cells[coords.to_nd_index()] = if mine_mask[coords.to_nd_index()] {
                    mine_count += 1;
                    MineCell::Mine
                } else {
                    let adjacent = mine_mask
                        .iter_neighbors(coords)
                        .filter(|&pos| mine_mask[pos.to_nd_index()])
                        .count();
                    MineCell::Count(adjacent as u8)
                };
            }
        }

        Self { cells, mine_count }
    }

    /// Builds a layout of `size` `(cols, rows)` with mines at exactly `mine_coords`.
    ///
    /// The result must satisfy the same limits as [`GameConfig::new`].
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &(x, y) in mine_coords {
            if x >= size.0 || y >= size.1 {
                return Err(GameError::InvalidCoordinate {
                    x: x.into(),
                    y: y.into(),
                });
            }
            mine_mask[(x, y).to_nd_index()] = true;
        }

        let board = Self::from_mine_mask(&mine_mask);
        board.check_limits()?;
        Ok(board)
    }

    /// Side lengths and mine count within the range a new game may have.
    fn check_limits(&self) -> Result<()> {
        GameConfig::new(
            self.rows().into(),
            self.cols().into(),
            self.mine_count.into(),
        )
        .map(|_| ())
    }

    /// `(cols, rows)`
    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn rows(&self) -> Coord {
        self.size().1
    }

    pub fn cols(&self) -> Coord {
        self.size().0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.cols(), self.rows())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cells(&self) -> &Array2<MineCell> {
        &self.cells
    }

    pub fn is_mine_at(&self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords].is_mine())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoordinate {
                x: coords.0.into(),
                y: coords.1.into(),
            })
        }
    }

    /// Narrows untrusted integer coordinates to an in-bounds position.
    pub fn checked_coords(&self, x: i64, y: i64) -> Result<Coord2> {
        let invalid = GameError::InvalidCoordinate { x, y };
        let coords = (
            Coord::try_from(x).map_err(|_| invalid.clone())?,
            Coord::try_from(y).map_err(|_| invalid.clone())?,
        );
        self.validate_coords(coords).map_err(|_| invalid)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }
}

impl Index<Coord2> for Board {
    type Output = MineCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl From<Board> for Vec<Vec<MineCell>> {
    fn from(board: Board) -> Self {
        grid_to_rows(&board.cells)
    }
}

impl TryFrom<Vec<Vec<MineCell>>> for Board {
    type Error = GameError;

    /// Decodes a persisted board. Counts must agree with the mines they surround.
    fn try_from(rows: Vec<Vec<MineCell>>) -> Result<Self> {
        let cells = grid_from_rows(rows)?;
        let mine_mask = cells.map(|cell| cell.is_mine());
        let board = Self::from_mine_mask(&mine_mask);
        if board.cells != cells {
            log::warn!("Rejected persisted board with inconsistent adjacency counts");
            return Err(GameError::InvalidBoardShape);
        }
        board.check_limits()?;
        Ok(board)
    }
}

/// Player-visible marks, same shape as the [`Board`] they cover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<OverlayCell>>", try_from = "Vec<Vec<OverlayCell>>")]
pub struct Overlay {
    cells: Array2<OverlayCell>,
}

impl Overlay {
    /// All-hidden overlay of `size` `(cols, rows)`.
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn cells(&self) -> &Array2<OverlayCell> {
        &self.cells
    }

    #[cfg(test)]
    pub(crate) fn count(&self, cell: OverlayCell) -> CellCount {
        self.cells.iter().filter(|&&c| c == cell).count() as CellCount
    }
}

impl Index<Coord2> for Overlay {
    type Output = OverlayCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Overlay {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl From<Overlay> for Vec<Vec<OverlayCell>> {
    fn from(overlay: Overlay) -> Self {
        grid_to_rows(&overlay.cells)
    }
}

impl TryFrom<Vec<Vec<OverlayCell>>> for Overlay {
    type Error = GameError;

    fn try_from(rows: Vec<Vec<OverlayCell>>) -> Result<Self> {
        Ok(Self {
            cells: grid_from_rows(rows)?,
        })
    }
}
