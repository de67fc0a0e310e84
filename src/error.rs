//! Error type for the engine.

use thiserror::Error;

/// Errors raised by the engine API.
///
/// Lifecycle and argument errors are contract violations: the FFI layer turns
/// them into panics instead of reporting them to the host.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Grid needs at least one row and one column.
    #[error("invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Cell size must be finite and positive.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f64),

    /// Explicit worker count of zero.
    #[error("worker count must be at least 1")]
    InvalidWorkers,

    /// Explicit grid does not match the configured dimensions.
    #[error("grid size mismatch: expected {}x{}, got {got} cells", .expected.0, .expected.1)]
    GridSizeMismatch { expected: (usize, usize), got: usize },

    /// Operation requires `init` first.
    #[error("engine is not initialized")]
    NotInitialized,

    /// Operation on an engine that was already torn down.
    #[error("engine has been destroyed")]
    Destroyed,

    /// More alive cells than buffer slots. Unreachable unless bookkeeping is broken.
    #[error("alive buffer overflow: {needed} cells for {capacity} slots")]
    CapacityExceeded { needed: usize, capacity: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("unknown backend: {0:?}")]
    UnknownBackend(String),

    /// Setting override that could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },
}

impl EngineError {
    /// True for misuse of the engine API rather than an internal failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidDimensions { .. }
                | EngineError::InvalidCellSize(_)
                | EngineError::InvalidWorkers
                | EngineError::GridSizeMismatch { .. }
                | EngineError::NotInitialized
                | EngineError::Destroyed
        )
    }
}
