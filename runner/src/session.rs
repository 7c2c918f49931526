//! Game session: the single owner of the current maze
//!
//! A [`Session`] accepts the simulator's commands (generate, move, run,
//! cancel, save, select, reset) and publishes an immutable [`Snapshot`]
//! after every change. Only one solver run and one replay can be active
//! at a time; each is tagged with an id so a run or replay that has been
//! superseded can never write into the session again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use maze_core::{can_move, generate_seeded, Direction, Grid, PathRecorder, Position};
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::{clamp_step_delay, SimConfig};
use crate::error::SessionError;
use crate::pathfinder::{self, RunOutcome};
use crate::replay::{self, ReplayOutcome};

/// Who is driving the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Manual movement and path recording.
    Player,
    /// Automated depth-first solving.
    Solver,
}

/// Read-only view of a session, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub seed: Option<u32>,
    pub mode: GameMode,
    pub player: Position,
    pub solver: Position,
    pub solver_stack: Vec<Position>,
    pub won: bool,
    pub solver_running: bool,
    pub current_path: Vec<Position>,
    /// Length of each saved path, oldest first.
    pub saved_paths: Vec<usize>,
    pub selected_path: Option<usize>,
}

#[derive(Debug)]
struct Task {
    id: u64,
    token: CancellationToken,
}

impl Task {
    fn stop(self) {
        self.token.cancel();
    }
}

#[derive(Debug)]
struct State {
    config: SimConfig,
    grid: Grid,
    seed: Option<u32>,
    mode: GameMode,
    player: Position,
    solver: Position,
    solver_stack: Vec<Position>,
    won: bool,
    recorder: PathRecorder,
    run: Option<Task>,
    replay: Option<Task>,
    next_task_id: u64,
}

impl State {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            seed: self.seed,
            mode: self.mode,
            player: self.player,
            solver: self.solver,
            solver_stack: self.solver_stack.clone(),
            won: self.won,
            solver_running: self.run.is_some(),
            current_path: self.recorder.current_path().to_vec(),
            saved_paths: self.recorder.path_lengths(),
            selected_path: self.recorder.selected(),
        }
    }

    fn new_task(&mut self) -> Task {
        self.next_task_id += 1;
        Task {
            id: self.next_task_id,
            token: CancellationToken::new(),
        }
    }

    /// Whether run `id` is still the one allowed to write.
    fn owns_run(&self, id: u64) -> bool {
        self.run
            .as_ref()
            .is_some_and(|task| task.id == id && !task.token.is_cancelled())
    }

    fn owns_replay(&self, id: u64) -> bool {
        self.replay
            .as_ref()
            .is_some_and(|task| task.id == id && !task.token.is_cancelled())
    }

    fn stop_run(&mut self) -> bool {
        match self.run.take() {
            Some(task) => {
                task.stop();
                true
            }
            None => false,
        }
    }

    fn stop_replay(&mut self) {
        if let Some(task) = self.replay.take() {
            task.stop();
        }
    }

    /// Back to a fresh game on the same maze.
    fn reset(&mut self) {
        self.stop_run();
        self.stop_replay();
        self.mode = GameMode::Player;
        self.player = Position::ORIGIN;
        self.solver = Position::ORIGIN;
        self.solver_stack.clear();
        self.won = false;
        self.recorder.reset();
        self.grid.clear_annotations();
    }
}

/// Shared handle to a running simulator.
///
/// Clones refer to the same session, so a presenter can keep one handle
/// for queries and `cancel` while another awaits `run` or `select`.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<State>>,
    snapshots: Arc<watch::Sender<Snapshot>>,
}

impl Session {
    /// Start a session on a freshly generated maze.
    pub fn new(config: SimConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let grid = generate_seeded(config.size, seed)?;
        tracing::info!("Generated {}x{} maze from seed {}", config.size, config.size, seed);

        Ok(Self::build(config, grid, Some(seed)))
    }

    /// Start a session on an existing maze.
    pub fn with_grid(config: SimConfig, mut grid: Grid) -> Self {
        grid.clear_annotations();
        let config = SimConfig {
            size: grid.size(),
            ..config
        };
        Self::build(config, grid, None)
    }

    fn build(config: SimConfig, grid: Grid, seed: Option<u32>) -> Self {
        let state = State {
            config,
            grid,
            seed,
            mode: GameMode::Player,
            player: Position::ORIGIN,
            solver: Position::ORIGIN,
            solver_stack: Vec::new(),
            won: false,
            recorder: PathRecorder::new(),
            run: None,
            replay: None,
            next_task_id: 0,
        };
        let (snapshots, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            snapshots: Arc::new(snapshots),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the state and publish the resulting snapshot.
    fn update<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut *state);
            (result, state.snapshot())
        };
        self.snapshots.send_replace(snapshot);
        result
    }

    /// Replace the maze with a new one, resetting all derived state.
    ///
    /// Any solver run or replay in flight is cancelled first. Returns the
    /// seed the maze was generated from.
    pub fn generate(&self, size: usize, seed: Option<u32>) -> Result<u32, SessionError> {
        let seed = seed.unwrap_or_else(rand::random);
        let grid = generate_seeded(size, seed)?;
        tracing::info!("Generated {}x{} maze from seed {}", size, size, seed);

        self.update(|state| {
            state.reset();
            state.grid = grid;
            state.seed = Some(seed);
            state.config.size = size;
        });
        Ok(seed)
    }

    /// Clear progress, paths and annotations, keeping the current maze.
    pub fn reset(&self) {
        tracing::info!("Resetting game");
        self.update(State::reset);
    }

    /// Switch between manual play and solver mode.
    ///
    /// Leaving solver mode cancels a run in flight.
    pub fn set_mode(&self, mode: GameMode) {
        self.update(|state| {
            if mode == GameMode::Player && state.stop_run() {
                tracing::info!("Solver cancelled by mode switch");
            }
            state.mode = mode;
        });
    }

    /// Change the solver pace used by [`Session::step_delay`].
    pub fn set_step_delay(&self, ms: u64) -> Duration {
        self.update(|state| {
            state.config.step_delay_ms = clamp_step_delay(ms);
            state.config.step_delay()
        })
    }

    pub fn step_delay(&self) -> Duration {
        self.lock().config.step_delay()
    }

    /// Move the player one cell; returns whether the move happened.
    ///
    /// Ignored outside player mode, after a win, while the solver runs or
    /// a replay plays, and when a wall or the grid edge is in the way.
    /// Reaching the bottom-right corner wins the game.
    pub fn move_player(&self, dir: Direction) -> bool {
        self.update(|state| {
            if state.mode != GameMode::Player || state.won || state.run.is_some() || state.replay.is_some() {
                tracing::warn!("Move {:?} ignored: player input is locked", dir);
                return false;
            }

            let from = state.player;
            let Some(to) = from.step(dir, state.grid.size()) else {
                tracing::debug!("Move {:?} from {} blocked by the edge", dir, from);
                return false;
            };
            if !can_move(from, to, &state.grid) {
                tracing::debug!("Move {:?} from {} blocked by a wall", dir, from);
                return false;
            }

            state.player = to;
            state.recorder.record(to);
            if to == state.grid.goal() {
                state.won = true;
                tracing::info!("Player reached the goal in {} moves", state.recorder.current_path().len() - 1);
            }
            true
        })
    }

    /// Save the path walked since the last save.
    ///
    /// Does nothing when the player has not moved or the solver or a
    /// replay is running. A saved path sends the player back to the entrance.
    pub fn save(&self) -> bool {
        self.update(|state| {
            if state.run.is_some() || state.replay.is_some() {
                tracing::warn!("Save ignored while the solver or a replay is running");
                return false;
            }

            let State { recorder, grid, .. } = &mut *state;
            if !recorder.save(grid) {
                return false;
            }

            state.player = Position::ORIGIN;
            tracing::info!(
                "Saved path {} ({} positions)",
                state.recorder.paths().len(),
                state.recorder.path_lengths().last().copied().unwrap_or(0)
            );
            true
        })
    }

    /// Run the solver on the current maze, pausing `step_delay` per step.
    ///
    /// Returns `Ok(None)` without doing anything when a run is already
    /// active. A run cancelled through [`Session::cancel`] reports
    /// [`RunOutcome::Cancelled`]; one detached by a new maze, a reset, or
    /// a mode switch stops writing to the session at its next step.
    pub async fn run(&self, step_delay: Duration) -> Result<Option<RunOutcome>, SessionError> {
        let started = self.update(|state| {
            if state.run.is_some() {
                return None;
            }

            let task = state.new_task();
            let started = (task.id, task.token.clone(), state.grid.clone());
            state.run = Some(task);
            state.mode = GameMode::Solver;
            state.won = false;
            state.solver = Position::ORIGIN;
            state.solver_stack = vec![Position::ORIGIN];
            state.grid.clear_search_flags();
            Some(started)
        });

        let Some((id, token, grid)) = started else {
            tracing::warn!("Run ignored: the solver is already running");
            return Ok(None);
        };

        let result = pathfinder::run(
            &grid,
            step_delay,
            &token,
            |_, solver| {
                self.update(|state| {
                    if state.owns_run(id) {
                        state.grid = solver.grid().clone();
                        state.solver = solver.current();
                        state.solver_stack = solver.stack().to_vec();
                    }
                });
            },
            |_| {
                self.update(|state| {
                    if state.owns_run(id) {
                        state.won = true;
                    }
                });
            },
        )
        .await;

        self.update(|state| {
            if state.run.as_ref().is_some_and(|task| task.id == id) {
                state.run = None;
            }
        });

        Ok(Some(result?))
    }

    /// Ask the running solver to stop at its next step boundary.
    ///
    /// Returns `false` when no run is active.
    pub fn cancel(&self) -> bool {
        let state = self.lock();
        match &state.run {
            Some(task) => {
                tracing::info!("Solver cancellation requested");
                task.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Replay saved path `index`, moving the player one frame at a time.
    ///
    /// A replay already in flight is cancelled and returns
    /// [`SessionError::ReplayInterrupted`]. Completing on the goal wins
    /// the game; otherwise the replayed path becomes the current path so
    /// later moves extend it. Player input is locked while frames play.
    pub async fn select(&self, index: usize) -> Result<ReplayOutcome, SessionError> {
        let (id, token, replay, goal, interval) = self.update(|state| {
            let replay = state.recorder.select(index)?;
            state.stop_replay();

            let task = state.new_task();
            let started = (
                task.id,
                task.token.clone(),
                replay,
                state.grid.goal(),
                state.config.replay_interval(),
            );
            state.replay = Some(task);
            Ok::<_, SessionError>(started)
        })?;
        let replayed = replay.clone();

        let outcome = replay::play(replay, goal, interval, &token, |pos| {
            self.update(|state| {
                if state.owns_replay(id) {
                    state.player = pos;
                }
            });
        })
        .await;

        self.update(|state| {
            if state.replay.as_ref().is_some_and(|task| task.id == id) {
                state.replay = None;
                match outcome {
                    ReplayOutcome::Completed { reached_goal: true, .. } => state.won = true,
                    // Manual play picks up where the replay stopped
                    ReplayOutcome::Completed { final_position, .. } => {
                        state.recorder.resume(&replayed);
                        state.player = final_position;
                    }
                    ReplayOutcome::Interrupted => {}
                }
            }
        });

        match outcome {
            ReplayOutcome::Interrupted => Err(SessionError::ReplayInterrupted { index }),
            completed => Ok(completed),
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn grid(&self) -> Grid {
        self.lock().grid.clone()
    }

    pub fn player_position(&self) -> Position {
        self.lock().player
    }

    pub fn solver_position(&self) -> Position {
        self.lock().solver
    }

    pub fn solver_stack(&self) -> Vec<Position> {
        self.lock().solver_stack.clone()
    }

    pub fn is_won(&self) -> bool {
        self.lock().won
    }

    pub fn is_running(&self) -> bool {
        self.lock().run.is_some()
    }

    pub fn mode(&self) -> GameMode {
        self.lock().mode
    }

    pub fn seed(&self) -> Option<u32> {
        self.lock().seed
    }

    /// Length of each saved path, oldest first.
    pub fn saved_paths(&self) -> Vec<usize> {
        self.lock().recorder.path_lengths()
    }

    pub fn current_path(&self) -> Vec<Position> {
        self.lock().recorder.current_path().to_vec()
    }
}
