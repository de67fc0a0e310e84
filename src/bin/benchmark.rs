//! Per-generation timing of every backend across grid sizes and worker counts

use std::time::Instant;
use life_engine::{Backend, Engine, EngineConfig, EngineError};

fn benchmark(
    size: usize,
    backend: Backend,
    workers: usize,
    iterations: u32,
) -> Result<(f64, usize), EngineError> {
    let mut engine = Engine::new();
    engine.init(
        EngineConfig::new(size, size, 1.0)
            .with_backend(backend)
            .with_workers(workers),
    )?;

    let start = Instant::now();
    let mut alive = 0;
    for _ in 0..iterations {
        alive = engine.update()?.len();
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;
    engine.destruct()?;
    Ok((ms, alive))
}

fn main() -> Result<(), EngineError> {
    println!("=== Game of Life Engine Benchmark ===\n");

    let sizes = [64, 256, 1000, 2000];
    let cores = std::thread::available_parallelism().map(usize::from).unwrap_or(1);
    let iterations = 10;

    println!(
        "{:>10} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "Size", "Serial", "Threads", "Pool", "Pool/1", "Speedup"
    );
    println!("{:-<74}", "");

    for size in sizes {
        let (serial_ms, serial_alive) = benchmark(size, Backend::Serial, 1, iterations)?;
        let (threads_ms, threads_alive) = benchmark(size, Backend::Threads, cores, iterations)?;
        let (pool_ms, pool_alive) = benchmark(size, Backend::Pool, cores, iterations)?;
        let (pool_one_ms, _) = benchmark(size, Backend::Pool, 1, iterations)?;

        // Every backend must land on the same generation
        assert_eq!(serial_alive, threads_alive);
        assert_eq!(serial_alive, pool_alive);

        println!(
            "{:>10} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>9.1}x",
            format!("{}x{}", size, size),
            serial_ms,
            threads_ms,
            pool_ms,
            pool_one_ms,
            serial_ms / pool_ms.min(threads_ms)
        );
    }

    println!("\n=== Alive buffer (2000x2000) ===\n");
    let cells = 2000 * 2000;
    let bytes = cells * 2 * std::mem::size_of::<f32>();
    println!("Capacity: {:>10} pairs ({:.1} MB)", cells, bytes as f64 / 1_000_000.0);
    println!("Workers:  {:>10}", cores);

    Ok(())
}
