//! Conway's B3/S23 transition rule.

/// Pure transition function for one cell:
/// 1. Live cell with 2-3 neighbors survives
/// 2. Dead cell with exactly 3 neighbors becomes alive
/// 3. Live cell with fewer than 2 or more than 3 neighbors dies
/// 4. Any other dead cell stays dead
pub const fn transition(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 2 | 3) => true,
        (false, 3) => true,
        _ => false,
    }
}
