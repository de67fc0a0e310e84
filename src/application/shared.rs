use super::{Engine, EngineConfig, EngineState};
use crate::domain::{AliveBuffer, Grid};
use crate::error::EngineError;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An [`Engine`] behind one exclusive lock.
///
/// Each call holds the lock for its whole duration, so two generations are
/// never computed at once and `destruct` cannot race an update in flight.
pub struct SharedEngine {
    inner: Mutex<Engine>,
}

impl Default for SharedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedEngine {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Engine::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        // Poison ignored: a panicked update already left the engine undefined.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> EngineState {
        self.lock().state()
    }

    pub fn init(&self, config: EngineConfig) -> Result<(), EngineError> {
        self.lock().init(config)
    }

    pub fn init_with_grid(&self, config: EngineConfig, grid: Grid) -> Result<(), EngineError> {
        self.lock().init_with_grid(config, grid)
    }

    /// Advance one generation and hand the fresh buffer to `f` while the lock is held.
    pub fn update_with<R>(&self, f: impl FnOnce(&AliveBuffer) -> R) -> Result<R, EngineError> {
        let mut engine = self.lock();
        engine.update().map(f)
    }

    /// Advance one generation and return the buffer start and the valid pair count.
    ///
    /// The pointer outlives the lock. It stays valid until the next `init`,
    /// `update` or `destruct` on this engine; the caller must not free it.
    pub fn update_raw(&self) -> Result<(*const f32, usize), EngineError> {
        self.update_with(|alive| (alive.as_ptr(), alive.len()))
    }

    /// Valid pairs published by the last update
    pub fn alive_count(&self) -> Result<usize, EngineError> {
        self.lock().alive().map(AliveBuffer::len)
    }

    pub fn generation(&self) -> Result<u64, EngineError> {
        self.lock().generation()
    }

    pub fn destruct(&self) -> Result<(), EngineError> {
        self.lock().destruct()
    }

    /// Replace the engine with a fresh one and initialize it, whatever state
    /// the old one was in. Both steps happen under one lock, so no other
    /// caller ever observes the fresh engine uninitialized.
    pub fn reinit(&self, config: EngineConfig) -> Result<(), EngineError> {
        let mut engine = self.lock();
        *engine = Engine::new();
        engine.init(config)
    }
}
