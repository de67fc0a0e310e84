use crate::domain::{Backend, worker_count};
use crate::error::EngineError;

/// Seed used when the host does not choose one, so runs are reproducible.
pub const DEFAULT_SEED: u64 = 7;

/// Override keys understood by [`EngineConfig::with_overrides`]
pub const BACKEND_KEY: &str = "LIFE_BACKEND";
pub const WORKERS_KEY: &str = "LIFE_WORKERS";
pub const SEED_KEY: &str = "LIFE_SEED";

/// Everything fixed at `init`.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f64,
    pub seed: u64,
    pub backend: Backend,
    /// None = one worker per available core
    pub workers: Option<usize>,
}

impl EngineConfig {
    pub fn new(rows: usize, cols: usize, cell_size: f64) -> Self {
        Self {
            rows,
            cols,
            cell_size,
            seed: DEFAULT_SEED,
            backend: Backend::default(),
            workers: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(EngineError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(EngineError::InvalidCellSize(self.cell_size));
        }
        if self.workers == Some(0) {
            return Err(EngineError::InvalidWorkers);
        }
        Ok(())
    }

    /// Workers actually used: the requested count (or available parallelism)
    /// clamped to `[1, rows]`. The serial backend always uses one.
    pub fn effective_workers(&self) -> usize {
        if self.backend == Backend::Serial {
            return 1;
        }
        let requested = self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1)
        });
        worker_count(requested, self.rows)
    }

    /// Apply string overrides for backend, worker count and seed.
    /// Keys the lookup does not know are left untouched.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(BACKEND_KEY) {
            self.backend = value.parse()?;
        }
        if let Some(value) = lookup(WORKERS_KEY) {
            let workers = value.trim().parse().map_err(|_| EngineError::InvalidSetting {
                key: WORKERS_KEY,
                value: value.clone(),
            })?;
            self.workers = Some(workers);
        }
        if let Some(value) = lookup(SEED_KEY) {
            self.seed = value.trim().parse().map_err(|_| EngineError::InvalidSetting {
                key: SEED_KEY,
                value: value.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn with_env_overrides(self) -> Result<Self, EngineError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }
}
