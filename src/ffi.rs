//! C ABI for hosts that drive one engine per process.
//!
//! Call sequence: `life_init` once, `life_update` per frame, `life_destruct`
//! at shutdown. The pointer returned by `life_update` addresses
//! `rows * cols * 2` floats owned by the engine: the first
//! `2 * life_alive_count()` hold `(x, y)` pairs, the rest are zero. The host
//! borrows it until its next call into this module and never frees it.
//!
//! Misuse (bad dimensions, update or destruct before init, update after
//! destruct) panics.
//! A panic cannot unwind out of an `extern "C"` function, so it aborts the
//! process.

use crate::application::{EngineConfig, SharedEngine};
use crate::error::EngineError;
use std::ffi::{c_double, c_float, c_int};

static ENGINE: SharedEngine = SharedEngine::new();

fn fatal(op: &str, err: EngineError) -> ! {
    log::error!("{op}: {err}");
    panic!("{op}: {err}");
}

/// (Re-)create the process engine with a seeded random population.
///
/// Backend, worker count and seed can be overridden through the
/// `LIFE_BACKEND`, `LIFE_WORKERS` and `LIFE_SEED` environment variables.
#[unsafe(no_mangle)]
pub extern "C" fn life_init(rows: c_int, cols: c_int, cell_size: c_double) {
    let rows = usize::try_from(rows).unwrap_or(0);
    let cols = usize::try_from(cols).unwrap_or(0);
    let result = EngineConfig::new(rows, cols, cell_size)
        .with_env_overrides()
        .and_then(|config| ENGINE.reinit(config));
    if let Err(err) = result {
        fatal("life_init", err);
    }
}

/// Advance one generation and return the alive buffer.
#[unsafe(no_mangle)]
pub extern "C" fn life_update() -> *const c_float {
    match ENGINE.update_raw() {
        Ok((ptr, _)) => ptr,
        Err(err) => fatal("life_update", err),
    }
}

/// Number of valid `(x, y)` pairs written by the last `life_update`.
#[unsafe(no_mangle)]
pub extern "C" fn life_alive_count() -> usize {
    match ENGINE.alive_count() {
        Ok(count) => count,
        Err(err) => fatal("life_alive_count", err),
    }
}

/// Release the engine's memory. Safe to call more than once, but not
/// before the first `life_init`.
#[unsafe(no_mangle)]
pub extern "C" fn life_destruct() {
    if let Err(err) = ENGINE.destruct() {
        fatal("life_destruct", err);
    }
}
