use super::Cell;
use crate::error::EngineError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

/// One generation of a bounded `rows x cols` world, stored row-major.
/// Cells outside the grid never exist: neighbor lookups are clipped at the edges.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with all cells initially dead
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Dead; rows * cols],
        }
    }

    /// Build a grid from row-major cells
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Self, EngineError> {
        if cells.len() != rows * cols {
            return Err(EngineError::GridSizeMismatch {
                expected: (rows, cols),
                got: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Random population where every cell is alive with probability 0.5.
    ///
    /// The generator is drawn exactly once per cell in row-major order, so the
    /// same `(rows, cols, seed)` always yields the same grid.
    pub fn seeded(rows: usize, cols: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cells = (0..rows * cols)
            .map(|_| Cell::from_alive(rng.random_bool(0.5)))
            .collect();
        Self { rows, cols, cells }
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Convert 2D coordinates to 1D index
    const fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Get cell at column `x`, row `y` (None when out of bounds)
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.cols && y < self.rows).then(|| self.cells[self.index(x, y)])
    }

    /// Set cell at position; out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.cols && y < self.rows {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    #[inline]
    fn is_alive_at(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.cols
            && (y as usize) < self.rows
            && self.cells[self.index(x as usize, y as usize)].is_alive()
    }

    /// Count live cells in the Moore neighborhood, clipped to the grid bounds
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        let (x, y) = (x as isize, y as isize);
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter(|&(dx, dy)| self.is_alive_at(x + dx, y + dy))
            .count() as u8
    }

    /// Row-major cells of one row
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.cols..(y + 1) * self.cols]
    }

    /// Mutable row-major block covering a range of rows
    pub fn rows_mut(&mut self, rows: Range<usize>) -> &mut [Cell] {
        let cols = self.cols;
        &mut self.cells[rows.start * cols..rows.end * cols]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Iterate over `(x, y)` of every alive cell in row-major order
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(|(idx, _)| (idx % self.cols, idx / self.cols))
    }
}
