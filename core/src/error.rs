use thiserror::Error;

/// Errors raised by the maze engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MazeError {
    /// A maze needs at least a 2x2 grid.
    #[error("invalid maze size {size}: must be at least 2")]
    InvalidSize { size: usize },

    /// Saved path selection outside the recorded history.
    #[error("invalid path index {index}: {len} path(s) saved")]
    InvalidIndex { index: usize, len: usize },

    /// A serialized grid whose cell buffer does not match its size.
    #[error("grid of size {size} needs {expected} cells, found {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },

    /// The solver ran out of cells before reaching the goal.
    ///
    /// Only reachable on a grid that is not a perfect maze.
    #[error("solver exhausted a {size}x{size} grid without reaching the goal")]
    Disconnected { size: usize },
}
