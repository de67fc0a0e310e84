//! Worker dispatch strategies.
//!
//! Every backend evolves one slab per partition against the same read-only
//! grid and hands the slabs back in partition order, so they all produce
//! identical generations. They differ only in where the work runs.

use super::{Grid, Partition, Slab, evolve_slab};
use crate::error::EngineError;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Available dispatch strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum Backend {
    /// Whole grid on the calling thread
    Serial,
    /// One scoped OS thread per partition, spawned every update
    Threads,
    /// Persistent rayon pool sized once at init
    #[default]
    Pool,
}

impl Backend {
    /// Get all available backends
    pub fn all() -> Vec<Backend> {
        vec![Backend::Serial, Backend::Threads, Backend::Pool]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Serial => "serial",
            Backend::Threads => "threads",
            Backend::Pool => "pool",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Backend::Serial => "single partition on the caller thread",
            Backend::Threads => "scoped thread per partition, spawned per update",
            Backend::Pool => "rayon pool built at init, reused across updates",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Backend::all()
            .into_iter()
            .find(|backend| backend.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownBackend(s.to_string()))
    }
}

/// A backend together with whatever resources it keeps between updates.
pub enum Executor {
    Serial,
    Threads,
    Pool(rayon::ThreadPool),
}

impl Executor {
    /// Build the executor for `backend` with `workers` threads.
    pub fn build(backend: Backend, workers: usize) -> Result<Self, EngineError> {
        Ok(match backend {
            Backend::Serial => Executor::Serial,
            Backend::Threads => Executor::Threads,
            Backend::Pool => Executor::Pool(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("life-worker-{i}"))
                    .build()?,
            ),
        })
    }

    pub fn backend(&self) -> Backend {
        match self {
            Executor::Serial => Backend::Serial,
            Executor::Threads => Backend::Threads,
            Executor::Pool(_) => Backend::Pool,
        }
    }

    /// Evolve every partition and return the slabs in partition order.
    /// Returns only after all workers have finished.
    pub fn run(&self, grid: &Grid, partitions: &[Partition], cell_size: f64) -> Vec<Slab> {
        match self {
            Executor::Serial => partitions
                .iter()
                .map(|&part| evolve_slab(grid, part, cell_size))
                .collect(),
            Executor::Threads => std::thread::scope(|scope| {
                let handles: Vec<_> = partitions
                    .iter()
                    .map(|&part| scope.spawn(move || evolve_slab(grid, part, cell_size)))
                    .collect();
                // Joined in spawn order, not completion order
                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                    })
                    .collect()
            }),
            Executor::Pool(pool) => pool.install(|| {
                partitions
                    .par_iter()
                    .map(|&part| evolve_slab(grid, part, cell_size))
                    .collect()
            }),
        }
    }
}
