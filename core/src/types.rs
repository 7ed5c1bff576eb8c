use ndarray::Array2;

use crate::*;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`, `x` is the column and `y` the row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Grids are stored row-major, so `(x, y)` maps to `[y, x]`.
impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Size `(cols, rows)` of a row-major grid.
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, cols) = grid.dim();
    // grids are only ever built from validated `Coord` dimensions
    (cols as Coord, rows as Coord)
}

/// Copies a grid into a list of rows, the shape used on the wire.
pub fn grid_to_rows<T: Clone>(grid: &Array2<T>) -> Vec<Vec<T>> {
    grid.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Builds a grid from a list of rows, rejecting empty, ragged or oversized input.
pub fn grid_from_rows<T>(rows: Vec<Vec<T>>) -> Result<Array2<T>> {
    let row_count = rows.len();
    let col_count = rows.first().map_or(0, Vec::len);

    if row_count == 0 || col_count == 0 {
        return Err(GameError::InvalidBoardShape);
    }
    if row_count > Coord::MAX.into() || col_count > Coord::MAX.into() {
        return Err(GameError::InvalidBoardShape);
    }
    if rows.iter().any(|row| row.len() != col_count) {
        return Err(GameError::InvalidBoardShape);
    }

    let cells: Vec<T> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((row_count, col_count), cells).map_err(|_| GameError::InvalidBoardShape)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, grid_size(self))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates the up to 8 in-bounds neighbors of a cell, no wraparound.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
