//! Merge of worker slabs into the next grid and the published alive buffer.

use super::{Grid, Slab};
use crate::error::EngineError;

/// Fixed-capacity buffer of alive-cell world coordinates, laid out as flat
/// `[x0, y0, x1, y1, ...]` `f32` pairs.
///
/// Allocated once for `rows * cols` pairs and reused for every generation.
/// After a collect the first `len()` pairs are valid and the rest are zero.
#[derive(Clone, Debug, PartialEq)]
pub struct AliveBuffer {
    data: Vec<f32>,
    len: usize,
}

impl AliveBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity * 2],
            len: 0,
        }
    }

    /// Maximum number of coordinate pairs
    pub fn capacity(&self) -> usize {
        self.data.len() / 2
    }

    /// Number of valid coordinate pairs
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Valid scalars only (`2 * len()` values)
    pub fn coords(&self) -> &[f32] {
        &self.data[..self.len * 2]
    }

    /// The whole buffer including zero padding (`2 * capacity()` values)
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.coords().chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}

/// Write every slab into `next` at its own row range and concatenate the
/// slabs' alive coordinates into `alive`, in the order the slabs are given.
///
/// Callers pass slabs in partition order, which makes the buffer independent
/// of worker completion order. Returns the number of alive pairs written.
/// An overflow is reported before anything is written; coordinates are never
/// dropped.
pub fn collect(
    slabs: &[Slab],
    next: &mut Grid,
    alive: &mut AliveBuffer,
) -> Result<usize, EngineError> {
    let needed: usize = slabs.iter().map(Slab::alive_count).sum();
    if needed > alive.capacity() {
        return Err(EngineError::CapacityExceeded {
            needed,
            capacity: alive.capacity(),
        });
    }

    let mut offset = 0;
    for slab in slabs {
        next.rows_mut(slab.partition.rows()).copy_from_slice(&slab.cells);

        let coords = slab.alive.as_flattened();
        alive.data[offset..offset + coords.len()].copy_from_slice(coords);
        offset += coords.len();
    }
    alive.data[offset..].fill(0.0);
    alive.len = needed;

    Ok(needed)
}
