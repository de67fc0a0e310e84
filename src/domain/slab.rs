//! Per-worker computation of one partition of the next generation.

use super::{Cell, Grid, Partition};

/// World-space center of cell `(x, y)`.
#[inline]
pub fn world_center(x: usize, y: usize, cell_size: f64) -> [f32; 2] {
    let half = cell_size / 2.0;
    [
        (x as f64 * cell_size + half) as f32,
        (y as f64 * cell_size + half) as f32,
    ]
}

/// Private output of one worker: the next-state block for its rows and the
/// world coordinates of every cell in that block that is alive next generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Slab {
    pub partition: Partition,
    /// Row-major, `cols * partition.len()` cells
    pub cells: Vec<Cell>,
    /// Row-major order within the partition
    pub alive: Vec<[f32; 2]>,
}

impl Slab {
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }
}

/// Evolve the rows of `partition`, reading neighbors from anywhere in `grid`.
///
/// `grid` is the current generation and is only read, so any number of slabs
/// can be evolved against it concurrently.
pub fn evolve_slab(grid: &Grid, partition: Partition, cell_size: f64) -> Slab {
    let cols = grid.cols();
    let mut cells = Vec::with_capacity(cols * partition.len());
    let mut alive = Vec::new();

    for y in partition.rows() {
        for (x, &current) in grid.row(y).iter().enumerate() {
            let next = current.evolve(grid.live_neighbors(x, y));
            if next.is_alive() {
                alive.push(world_center(x, y, cell_size));
            }
            cells.push(next);
        }
    }

    Slab { partition, cells, alive }
}
