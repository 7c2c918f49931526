//! Timed, cancellable solver runs
//!
//! Drives a [`Solver`] one step at a time with a fixed pause between
//! steps. The pause is the only suspension point: every step's state
//! change and notification complete before the next one starts, and a
//! cancellation request is only observed at the next step boundary.

use std::time::Duration;

use maze_core::{Grid, MazeError, Position, Solver, SolverStep};
use tokio_util::sync::CancellationToken;

/// How a solver run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The goal was reached; `path` is the final stack, entrance first.
    Finished {
        path: Vec<Position>,
        advances: usize,
        backtracks: usize,
    },
    /// Stopped early at the step boundary after a cancel request.
    Cancelled { at: Position },
}

/// Solve `grid` step by step, pausing `step_delay` between steps.
///
/// `on_step` sees every step together with the solver state right after
/// it; `on_finish` fires once, only when the goal is reached. When
/// `cancel` is triggered the run stops before mutating anything further
/// and `on_finish` never fires. A grid whose goal cannot be reached from
/// the entrance yields [`MazeError::Disconnected`].
pub async fn run<S, F>(
    grid: &Grid,
    step_delay: Duration,
    cancel: &CancellationToken,
    mut on_step: S,
    on_finish: F,
) -> Result<RunOutcome, MazeError>
where
    S: FnMut(SolverStep, &Solver),
    F: FnOnce(&Solver),
{
    let mut solver = Solver::new(grid);
    tracing::info!(
        "Solver started on {}x{} maze ({}ms per step)",
        grid.size(),
        grid.size(),
        step_delay.as_millis()
    );

    loop {
        if cancel.is_cancelled() {
            tracing::info!("Solver cancelled at {}", solver.current());
            return Ok(RunOutcome::Cancelled {
                at: solver.current(),
            });
        }

        let step = solver.step().map_err(|e| {
            tracing::error!("Solver failed: {}", e);
            e
        })?;
        tracing::debug!(?step, depth = solver.stack().len(), "solver step");
        on_step(step, &solver);

        if let SolverStep::Finished(goal) = step {
            tracing::info!(
                "Solver reached {} ({} forward, {} backtracks)",
                goal,
                solver.advances(),
                solver.backtracks()
            );
            on_finish(&solver);
            return Ok(RunOutcome::Finished {
                path: solver.stack().to_vec(),
                advances: solver.advances(),
                backtracks: solver.backtracks(),
            });
        }

        tokio::time::sleep(step_delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{generate_seeded, Direction};
    use std::cell::Cell;

    /// 2x2 grid: (0,0) <-> (1,0) <-> (1,1), everything else closed.
    fn corridor() -> Grid {
        let mut grid = Grid::new(2).unwrap();
        grid.carve(Position::new(0, 0), Direction::Right);
        grid.carve(Position::new(1, 0), Direction::Down);
        grid
    }

    #[tokio::test(start_paused = true)]
    async fn test_corridor_run() {
        let grid = corridor();
        let token = CancellationToken::new();
        let mut stacks = Vec::new();
        let finished = Cell::new(0);

        let outcome = run(
            &grid,
            Duration::from_millis(100),
            &token,
            |_, solver| stacks.push(solver.stack().to_vec()),
            |_| finished.set(finished.get() + 1),
        )
        .await
        .unwrap();

        assert_eq!(
            stacks,
            vec![
                vec![Position::new(0, 0), Position::new(1, 0)],
                vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            ]
        );
        assert_eq!(finished.get(), 1);
        assert_eq!(
            outcome,
            RunOutcome::Finished {
                path: vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
                advances: 2,
                backtracks: 0,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_first_step() {
        let grid = corridor();
        let token = CancellationToken::new();
        let finished = Cell::new(false);
        let mut steps = 0;

        let outcome = run(
            &grid,
            Duration::from_millis(100),
            &token,
            |_, _| {
                steps += 1;
                token.cancel();
            },
            |_| finished.set(true),
        )
        .await
        .unwrap();

        assert_eq!(steps, 1);
        assert!(!finished.get());
        assert_eq!(outcome, RunOutcome::Cancelled { at: Position::new(1, 0) });
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start() {
        let token = CancellationToken::new();
        token.cancel();

        let outcome = run(&corridor(), Duration::from_millis(50), &token, |_, _| panic!(), |_| panic!())
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Cancelled { at: Position::ORIGIN });
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_are_paced() {
        let grid = generate_seeded(6, 31).unwrap();
        let token = CancellationToken::new();
        let start = tokio::time::Instant::now();
        let mut steps = 0u32;

        run(&grid, Duration::from_millis(50), &token, |_, _| steps += 1, |_| {})
            .await
            .unwrap();

        // No pause after the final, goal-reaching step
        assert_eq!(start.elapsed(), Duration::from_millis(50) * (steps - 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_grid() {
        let mut grid = Grid::new(2).unwrap();
        grid.carve(Position::ORIGIN, Direction::Down);
        let token = CancellationToken::new();

        let err = run(&grid, Duration::from_millis(50), &token, |_, _| {}, |_| panic!())
            .await
            .unwrap_err();

        assert_eq!(err, MazeError::Disconnected { size: 2 });
    }
}
