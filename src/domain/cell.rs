use super::rule;

/// State of a single grid cell.
/// Stored one byte per cell so a grid row is a plain `[Cell]` slice.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    /// Check if the cell is currently alive
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    pub const fn from_alive(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }

    /// Next state given the number of live Moore neighbors.
    pub const fn evolve(self, neighbors: u8) -> Self {
        Cell::from_alive(rule::transition(self.is_alive(), neighbors))
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        Cell::from_alive(alive)
    }
}
