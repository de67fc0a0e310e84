use super::EngineConfig;
use crate::domain::{AliveBuffer, Backend, Executor, Grid, Partition, collect, partition};
use crate::error::EngineError;
use std::mem;
use std::time::Instant;

/// Externally visible lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initialized,
    Updated,
    Destroyed,
}

/// Everything owned by a live engine.
struct Simulation {
    config: EngineConfig,
    current: Grid,
    /// Spare grid the collector writes into; swapped with `current` each update
    next: Grid,
    alive: AliveBuffer,
    partitions: Vec<Partition>,
    executor: Executor,
    generation: u64,
}

impl Simulation {
    fn new(config: EngineConfig, grid: Grid) -> Result<Self, EngineError> {
        let workers = config.effective_workers();
        let executor = Executor::build(config.backend, workers)?;
        let partitions = partition(config.rows, workers);
        Ok(Self {
            next: Grid::new(config.rows, config.cols),
            alive: AliveBuffer::new(config.rows * config.cols),
            current: grid,
            partitions,
            executor,
            generation: 0,
            config,
        })
    }

    fn step(&mut self) -> Result<&AliveBuffer, EngineError> {
        let start = Instant::now();

        let slabs = self
            .executor
            .run(&self.current, &self.partitions, self.config.cell_size);
        let alive = collect(&slabs, &mut self.next, &mut self.alive).inspect_err(|err| {
            log::error!("generation {} aborted: {err}", self.generation + 1);
        })?;
        mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;

        log::trace!(
            "generation {}: {} alive, {:.3} ms",
            self.generation,
            alive,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(&self.alive)
    }
}

enum Lifecycle {
    Uninitialized,
    Running(Box<Simulation>),
    Destroyed,
}

/// Generation-update engine: `init` once, `update` repeatedly, `destruct` once.
///
/// Not synchronized on its own; wrap it in [`super::SharedEngine`] to share
/// between threads.
pub struct Engine {
    lifecycle: Lifecycle,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub const fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn state(&self) -> EngineState {
        match &self.lifecycle {
            Lifecycle::Uninitialized => EngineState::Uninitialized,
            Lifecycle::Running(sim) if sim.generation == 0 => EngineState::Initialized,
            Lifecycle::Running(_) => EngineState::Updated,
            Lifecycle::Destroyed => EngineState::Destroyed,
        }
    }

    /// Allocate the grid and alive buffer and seed a random population.
    /// Re-initializing a live engine drops and re-allocates everything.
    pub fn init(&mut self, config: EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        let grid = Grid::seeded(config.rows, config.cols, config.seed);
        self.start(config, grid)
    }

    /// Like [`Engine::init`] but starts from `grid` instead of a seeded population.
    pub fn init_with_grid(&mut self, config: EngineConfig, grid: Grid) -> Result<(), EngineError> {
        config.validate()?;
        if (grid.rows(), grid.cols()) != (config.rows, config.cols) {
            return Err(EngineError::GridSizeMismatch {
                expected: (config.rows, config.cols),
                got: grid.cells().len(),
            });
        }
        self.start(config, grid)
    }

    fn start(&mut self, config: EngineConfig, grid: Grid) -> Result<(), EngineError> {
        if matches!(self.lifecycle, Lifecycle::Destroyed) {
            return Err(EngineError::Destroyed);
        }
        let sim = Simulation::new(config, grid)?;
        log::info!(
            "engine initialized: {}x{} cells, cell size {}, backend {}, {} workers, seed {}",
            sim.config.rows,
            sim.config.cols,
            sim.config.cell_size,
            sim.executor.backend(),
            sim.partitions.len(),
            sim.config.seed
        );
        self.lifecycle = Lifecycle::Running(Box::new(sim));
        Ok(())
    }

    fn running(&self) -> Result<&Simulation, EngineError> {
        match &self.lifecycle {
            Lifecycle::Running(sim) => Ok(sim),
            Lifecycle::Uninitialized => Err(EngineError::NotInitialized),
            Lifecycle::Destroyed => Err(EngineError::Destroyed),
        }
    }

    /// Advance one generation and return the refreshed alive buffer.
    ///
    /// The returned borrow ends before the next `update` or `destruct`, which
    /// is exactly how long the buffer contents stay valid.
    pub fn update(&mut self) -> Result<&AliveBuffer, EngineError> {
        match &mut self.lifecycle {
            Lifecycle::Running(sim) => sim.step(),
            Lifecycle::Uninitialized => Err(EngineError::NotInitialized),
            Lifecycle::Destroyed => Err(EngineError::Destroyed),
        }
    }

    /// Release all owned memory. Repeated calls are no-ops; a call before
    /// `init` is rejected and leaves the engine uninitialized.
    pub fn destruct(&mut self) -> Result<(), EngineError> {
        match &self.lifecycle {
            Lifecycle::Uninitialized => Err(EngineError::NotInitialized),
            Lifecycle::Destroyed => {
                log::debug!("destruct on destroyed engine ignored");
                Ok(())
            }
            Lifecycle::Running(sim) => {
                log::debug!("engine destroyed after {} generations", sim.generation);
                self.lifecycle = Lifecycle::Destroyed;
                Ok(())
            }
        }
    }

    pub fn generation(&self) -> Result<u64, EngineError> {
        self.running().map(|sim| sim.generation)
    }

    pub fn grid(&self) -> Result<&Grid, EngineError> {
        self.running().map(|sim| &sim.current)
    }

    /// Buffer published by the last update (all zeros before the first one)
    pub fn alive(&self) -> Result<&AliveBuffer, EngineError> {
        self.running().map(|sim| &sim.alive)
    }

    pub fn config(&self) -> Result<&EngineConfig, EngineError> {
        self.running().map(|sim| &sim.config)
    }

    pub fn backend(&self) -> Result<Backend, EngineError> {
        self.running().map(|sim| sim.executor.backend())
    }

    pub fn partitions(&self) -> Result<&[Partition], EngineError> {
        self.running().map(|sim| sim.partitions.as_slice())
    }

    pub fn worker_count(&self) -> Result<usize, EngineError> {
        self.partitions().map(<[Partition]>::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, Pattern, presets};

    fn blinker_engine(backend: Backend, workers: usize) -> Engine {
        let mut grid = Grid::new(3, 3);
        presets::blinker().place_on(&mut grid, 0, 0);
        let config = EngineConfig::new(3, 3, 10.0)
            .with_backend(backend)
            .with_workers(workers);
        let mut engine = Engine::new();
        engine.init_with_grid(config, grid).unwrap();
        engine
    }

    fn alive_cells(engine: &Engine) -> Vec<(usize, usize)> {
        engine.grid().unwrap().iter_alive().collect()
    }

    #[test]
    fn test_lifecycle_states() {
        let mut engine = Engine::new();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        engine.init(EngineConfig::new(4, 4, 1.0)).unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);
        engine.update().unwrap();
        engine.update().unwrap();
        assert_eq!(engine.state(), EngineState::Updated);
        assert_eq!(engine.generation().unwrap(), 2);
        engine.destruct().unwrap();
        assert_eq!(engine.state(), EngineState::Destroyed);
    }

    #[test]
    fn test_update_before_init_is_rejected() {
        let mut engine = Engine::new();
        let err = engine.update().unwrap_err();
        assert!(matches!(err, EngineError::NotInitialized));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_update_after_destruct_is_rejected() {
        let mut engine = Engine::new();
        engine.init(EngineConfig::new(4, 4, 1.0)).unwrap();
        engine.destruct().unwrap();
        assert!(matches!(engine.update(), Err(EngineError::Destroyed)));
        assert!(matches!(engine.grid(), Err(EngineError::Destroyed)));
    }

    #[test]
    fn test_destruct_twice_is_noop() {
        let mut engine = Engine::new();
        engine.init(EngineConfig::new(2, 2, 1.0)).unwrap();
        engine.destruct().unwrap();
        engine.destruct().unwrap();
        assert_eq!(engine.state(), EngineState::Destroyed);
    }

    #[test]
    fn test_destruct_before_init_is_rejected() {
        let mut engine = Engine::new();
        let err = engine.destruct().unwrap_err();
        assert!(matches!(err, EngineError::NotInitialized));
        assert!(err.is_contract_violation());
        assert_eq!(engine.state(), EngineState::Uninitialized);

        // The stray call must not poison the engine
        engine.init(EngineConfig::new(2, 2, 1.0)).unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);
    }

    #[test]
    fn test_destroyed_engine_cannot_be_reinitialized() {
        let mut engine = Engine::new();
        engine.init(EngineConfig::new(2, 2, 1.0)).unwrap();
        engine.destruct().unwrap();
        assert!(matches!(
            engine.init(EngineConfig::new(2, 2, 1.0)),
            Err(EngineError::Destroyed)
        ));
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let mut engine = Engine::new();
        assert!(engine.init(EngineConfig::new(0, 3, 1.0)).is_err());
        assert!(engine.init(EngineConfig::new(3, 3, 0.0)).is_err());
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn test_init_with_mismatched_grid() {
        let mut engine = Engine::new();
        let result = engine.init_with_grid(EngineConfig::new(3, 3, 1.0), Grid::new(3, 4));
        assert!(matches!(result, Err(EngineError::GridSizeMismatch { expected: (3, 3), got: 12 })));
    }

    #[test]
    fn test_reinit_reallocates() {
        let mut engine = Engine::new();
        engine.init(EngineConfig::new(4, 4, 1.0)).unwrap();
        engine.update().unwrap();
        engine.init(EngineConfig::new(6, 5, 2.0)).unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);
        assert_eq!(engine.alive().unwrap().capacity(), 30);
        assert_eq!(engine.grid().unwrap().rows(), 6);
    }

    #[test]
    fn test_blinker_oscillates() {
        for backend in Backend::all() {
            for workers in 1..=3 {
                let mut engine = blinker_engine(backend, workers);

                let alive = engine.update().unwrap();
                assert_eq!(alive.coords(), &[15.0, 5.0, 15.0, 15.0, 15.0, 25.0]);
                assert_eq!(alive_cells(&engine), vec![(1, 0), (1, 1), (1, 2)]);

                let alive = engine.update().unwrap();
                assert_eq!(alive.coords(), &[5.0, 15.0, 15.0, 15.0, 25.0, 15.0]);
                assert_eq!(alive_cells(&engine), vec![(0, 1), (1, 1), (2, 1)]);
            }
        }
    }

    fn centered(pattern: &Pattern, rows: usize, cols: usize) -> Grid {
        let (width, height) = pattern.size();
        let mut grid = Grid::new(rows, cols);
        pattern.place_on(&mut grid, (cols - width) / 2, (rows - height) / 2);
        grid
    }

    #[test]
    fn test_period_two_oscillators() {
        for pattern in [presets::toad(), presets::beacon()] {
            let start = centered(&pattern, 6, 6);
            let mut engine = Engine::new();
            engine
                .init_with_grid(EngineConfig::new(6, 6, 1.0).with_workers(2), start.clone())
                .unwrap();

            engine.update().unwrap();
            assert_ne!(engine.grid().unwrap(), &start, "{} did not change", pattern.name);
            engine.update().unwrap();
            assert_eq!(engine.grid().unwrap(), &start, "{} is not period 2", pattern.name);
        }
    }

    #[test]
    fn test_glider_moves_one_cell_diagonally() {
        let glider = presets::glider();
        let start = centered(&glider, 10, 10);
        let mut engine = Engine::new();
        engine
            .init_with_grid(EngineConfig::new(10, 10, 1.0).with_workers(3), start.clone())
            .unwrap();
        for _ in 0..4 {
            assert_eq!(engine.update().unwrap().len(), 5);
        }

        let moved: Vec<_> = start.iter_alive().map(|(x, y)| (x + 1, y + 1)).collect();
        assert_eq!(alive_cells(&engine), moved);
    }

    #[test]
    fn test_lone_cell_dies() {
        for (rows, cols) in [(1, 1), (1, 5), (4, 1), (3, 3), (8, 13)] {
            let mut grid = Grid::new(rows, cols);
            grid.set(cols / 2, rows / 2, Cell::Alive);
            let mut engine = Engine::new();
            engine
                .init_with_grid(EngineConfig::new(rows, cols, 1.0), grid)
                .unwrap();
            let alive = engine.update().unwrap();
            assert!(alive.is_empty(), "{rows}x{cols}");
            assert!(alive.as_slice().iter().all(|&v| v == 0.0));
            assert_eq!(engine.grid().unwrap().alive_count(), 0);
        }
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = Grid::new(4, 4);
        presets::block().place_on(&mut grid, 1, 1);
        let mut engine = Engine::new();
        engine
            .init_with_grid(EngineConfig::new(4, 4, 1.0), grid.clone())
            .unwrap();
        for _ in 0..5 {
            assert_eq!(engine.update().unwrap().len(), 4);
        }
        assert_eq!(engine.grid().unwrap(), &grid);
    }

    #[test]
    fn test_buffer_size_and_bound() {
        let mut engine = Engine::new();
        engine.init(EngineConfig::new(12, 9, 1.0)).unwrap();
        for _ in 0..10 {
            let alive = engine.update().unwrap();
            assert_eq!(alive.as_slice().len(), 12 * 9 * 2);
            assert!(alive.len() <= 12 * 9);
            assert!(alive.as_slice()[alive.len() * 2..].iter().all(|&v| v == 0.0));
        }
        let grid_alive = engine.grid().unwrap().alive_count();
        assert_eq!(engine.alive().unwrap().len(), grid_alive);
    }

    #[test]
    fn test_same_seed_same_generations() {
        let run = || {
            let mut engine = Engine::new();
            engine.init(EngineConfig::new(20, 30, 2.0).with_seed(42)).unwrap();
            (0..5)
                .map(|_| engine.update().unwrap().coords().to_vec())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_deterministic_across_backends_and_workers() {
        let reference = {
            let mut engine = Engine::new();
            engine
                .init(EngineConfig::new(33, 27, 3.0).with_backend(Backend::Serial))
                .unwrap();
            (0..8)
                .map(|_| {
                    let coords = engine.update().unwrap().as_slice().to_vec();
                    (engine.grid().unwrap().clone(), coords)
                })
                .collect::<Vec<_>>()
        };

        for backend in [Backend::Threads, Backend::Pool] {
            for workers in [1, 2, 4, 7, 33] {
                let mut engine = Engine::new();
                engine
                    .init(
                        EngineConfig::new(33, 27, 3.0)
                            .with_backend(backend)
                            .with_workers(workers),
                    )
                    .unwrap();
                assert_eq!(engine.worker_count().unwrap(), workers);
                for (generation, (grid, coords)) in reference.iter().enumerate() {
                    let alive = engine.update().unwrap().as_slice().to_vec();
                    assert_eq!(&alive, coords, "{backend}/{workers} generation {generation}");
                    assert_eq!(engine.grid().unwrap(), grid);
                }
            }
        }
    }

    #[test]
    fn test_workers_never_exceed_rows() {
        let mut engine = Engine::new();
        engine
            .init(EngineConfig::new(2, 50, 1.0).with_workers(16))
            .unwrap();
        assert_eq!(engine.worker_count().unwrap(), 2);
        assert_eq!(engine.backend().unwrap(), Backend::Pool);
    }
}
