//! Row partitioning across workers.

use std::ops::Range;

/// Contiguous half-open row range `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Effective worker count: never more workers than rows, never fewer than one.
pub fn worker_count(requested: usize, rows: usize) -> usize {
    requested.min(rows).max(1)
}

/// Split `rows` into `workers` contiguous ranges as evenly as possible.
///
/// The first `rows % workers` partitions get one extra row. `workers` is
/// clamped with [`worker_count`], so every partition holds at least one row
/// (for `rows == 0` the result is empty).
pub fn partition(rows: usize, workers: usize) -> Vec<Partition> {
    if rows == 0 {
        return Vec::new();
    }
    let workers = worker_count(workers, rows);
    let base = rows / workers;
    let extra = rows % workers;

    let mut start = 0;
    (0..workers)
        .map(|i| {
            let end = start + base + usize::from(i < extra);
            let part = Partition::new(start, end);
            start = end;
            part
        })
        .collect()
}
