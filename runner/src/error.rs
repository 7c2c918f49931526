use maze_core::MazeError;
use thiserror::Error;

/// Errors surfaced by a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Maze(#[from] MazeError),

    /// A newer `select` took over before this replay finished.
    #[error("replay of path {index} was interrupted by a newer replay")]
    ReplayInterrupted { index: usize },
}
