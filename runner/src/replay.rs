//! Paced playback of saved paths
//!
//! Frames are emitted at a fixed interval. Like solver runs, playback
//! only checks for cancellation between frames.

use std::time::Duration;

use maze_core::{Position, Replay};
use tokio_util::sync::CancellationToken;

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every frame was shown; `reached_goal` signals a win.
    Completed {
        final_position: Position,
        reached_goal: bool,
    },
    /// Superseded before the last frame settled.
    Interrupted,
}

/// Step through `replay`, handing each frame to `on_frame` and pausing
/// `interval` after it.
pub async fn play<F>(
    replay: Replay,
    goal: Position,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_frame: F,
) -> ReplayOutcome
where
    F: FnMut(Position),
{
    let reached_goal = replay.ends_at(goal);
    let Some(final_position) = replay.final_position() else {
        return ReplayOutcome::Interrupted;
    };

    tracing::info!("Replaying {} frames towards {}", replay.len(), final_position);

    for pos in replay {
        if cancel.is_cancelled() {
            tracing::info!("Replay interrupted before {}", pos);
            return ReplayOutcome::Interrupted;
        }

        tracing::debug!(%pos, "replay frame");
        on_frame(pos);
        tokio::time::sleep(interval).await;
    }

    // A replay superseded during its last pause must not signal a win
    if cancel.is_cancelled() {
        return ReplayOutcome::Interrupted;
    }

    ReplayOutcome::Completed {
        final_position,
        reached_goal,
    }
}
