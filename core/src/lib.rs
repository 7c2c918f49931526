//! Shared types, constants, and logic for the maze simulator
//!
//! This crate provides the deterministic engine: the grid model, the
//! movement validator, perfect-maze generation, the stepwise
//! depth-first solver, and path recording bookkeeping. It has no
//! notion of time; pacing, cancellation, and logging live in the
//! runner crate.

pub mod error;
pub mod grid;
pub mod maze_gen;
pub mod movement;
pub mod recorder;
pub mod rng;
pub mod solver;

// Re-export commonly used types for convenience
pub use error::MazeError;
pub use grid::{Cell, Direction, Grid, Position, Walls, MIN_SIZE};
pub use maze_gen::{generate, generate_seeded};
pub use movement::{can_move, legal_moves};
pub use recorder::{PathRecorder, Replay};
pub use rng::{RandomSource, SimpleLCG};
pub use solver::{Solver, SolverStep};

/// Default maze dimension (cells per side)
pub const DEFAULT_SIZE: usize = 20;

/// Default pause between solver steps, in milliseconds
pub const DEFAULT_STEP_DELAY_MS: u64 = 100;

/// Recommended solver step delay window, in milliseconds
pub const MIN_STEP_DELAY_MS: u64 = 50;
pub const MAX_STEP_DELAY_MS: u64 = 500;

/// Fixed cadence of saved-path replays, in milliseconds
pub const REPLAY_INTERVAL_MS: u64 = 200;
