//! Timed orchestration of the maze engine
//!
//! Wraps `maze-core` with everything that involves time or ownership:
//! paced, cancellable solver runs, 200 ms path replays, and a
//! [`Session`] that owns the current maze and hands out snapshots.

pub mod config;
pub mod error;
pub mod pathfinder;
pub mod render;
pub mod replay;
pub mod session;

pub use config::SimConfig;
pub use error::SessionError;
pub use pathfinder::RunOutcome;
pub use replay::ReplayOutcome;
pub use session::{GameMode, Session, Snapshot};
