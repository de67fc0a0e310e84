mod backend;
mod cell;
mod collector;
mod grid;
mod partition;
mod patterns;
mod rule;
mod slab;

pub use backend::{Backend, Executor};
pub use cell::Cell;
pub use collector::{AliveBuffer, collect};
pub use grid::Grid;
pub use partition::{Partition, partition, worker_count};
pub use patterns::{Pattern, presets};
pub use rule::transition;
pub use slab::{Slab, evolve_slab, world_center};
