mod config;
mod engine;
mod shared;

pub use config::{BACKEND_KEY, DEFAULT_SEED, EngineConfig, SEED_KEY, WORKERS_KEY};
pub use engine::{Engine, EngineState};
pub use shared::SharedEngine;
