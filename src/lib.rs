// Domain layer - rule, grid, partitioning, workers, merge
pub mod domain;

// Application layer - configuration and engine lifecycle
pub mod application;

// Infrastructure layer - C ABI for the host renderer
pub mod ffi;

pub mod error;

// Re-exports for convenience
pub use application::{DEFAULT_SEED, Engine, EngineConfig, EngineState, SharedEngine};
pub use domain::{AliveBuffer, Backend, Cell, Grid, Partition, Pattern, presets};
pub use error::EngineError;
