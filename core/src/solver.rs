//! Stepwise depth-first solver with backtracking
//!
//! The solver owns a working copy of the maze and advances one move per
//! [`Solver::step`] call, so a caller can pace, render, or abandon the
//! search between steps. Neighbours are always tried in scan order
//! (up, right, down, left): the same maze always yields the same trace.

use crate::error::MazeError;
use crate::grid::{Grid, Position};
use crate::movement::legal_moves;

/// What a single solver step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStep {
    /// Moved forward onto a fresh cell.
    Advanced(Position),
    /// Hit a dead end and fell back to the new top of the stack.
    Backtracked(Position),
    /// Moved forward onto the goal; the search is over.
    Finished(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Searching,
    Finished,
    Exhausted,
}

/// Depth-first search state over a private copy of a maze.
#[derive(Debug, Clone)]
pub struct Solver {
    grid: Grid,
    visited: Vec<bool>,
    stack: Vec<Position>,
    current: Position,
    status: Status,
    advances: usize,
    backtracks: usize,
}

impl Solver {
    /// Start a search at (0, 0) over a copy of `grid`.
    ///
    /// Solver marks left on the copy by a previous run are cleared;
    /// walls and player annotations are kept as-is.
    pub fn new(grid: &Grid) -> Self {
        let mut grid = grid.clone();
        grid.clear_search_flags();
        if let Some(entrance) = grid.cell_mut(Position::ORIGIN) {
            entrance.is_path = true;
        }

        let size = grid.size();
        let mut visited = vec![false; size * size];
        visited[0] = true;

        Self {
            grid,
            visited,
            stack: vec![Position::ORIGIN],
            current: Position::ORIGIN,
            status: Status::Searching,
            advances: 0,
            backtracks: 0,
        }
    }

    /// Working copy with the solver's `is_path` / `is_backtrack` marks.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Live DFS stack, entrance first, frontier last.
    pub fn stack(&self) -> &[Position] {
        &self.stack
    }

    /// Frontier cell.
    pub fn current(&self) -> Position {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    /// Forward moves taken so far.
    pub fn advances(&self) -> usize {
        self.advances
    }

    /// Dead ends backed out of so far.
    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    fn visited_index(&self, pos: Position) -> usize {
        pos.y * self.grid.size() + pos.x
    }

    fn is_visited(&self, pos: Position) -> bool {
        self.visited[self.visited_index(pos)]
    }

    /// Perform one bounded unit of search.
    ///
    /// Stepping a finished solver reports `Finished` again without
    /// touching any state. Running out of stack before reaching the goal
    /// is reported as [`MazeError::Disconnected`]; a maze produced by the
    /// generator never triggers it.
    pub fn step(&mut self) -> Result<SolverStep, MazeError> {
        match self.status {
            Status::Finished => return Ok(SolverStep::Finished(self.current)),
            Status::Exhausted => return Err(self.disconnected()),
            Status::Searching => {}
        }

        let next = legal_moves(self.current, &self.grid).find(|&pos| !self.is_visited(pos));

        match next {
            Some(next) => Ok(self.advance(next)),
            None => self.backtrack(),
        }
    }

    fn advance(&mut self, next: Position) -> SolverStep {
        let idx = self.visited_index(next);
        self.visited[idx] = true;
        self.stack.push(next);
        self.current = next;
        self.advances += 1;

        // Cells below the new top were already marked when pushed
        if let Some(cell) = self.grid.cell_mut(next) {
            cell.is_path = true;
            cell.is_backtrack = false;
        }

        if next == self.grid.goal() {
            self.status = Status::Finished;
            SolverStep::Finished(next)
        } else {
            SolverStep::Advanced(next)
        }
    }

    fn backtrack(&mut self) -> Result<SolverStep, MazeError> {
        // The stack never holds duplicates, so the popped cell is the
        // only one whose marks change: visited and off the stack
        if let Some(dead_end) = self.stack.pop() {
            if let Some(cell) = self.grid.cell_mut(dead_end) {
                cell.is_path = false;
                cell.is_backtrack = true;
            }
        }

        match self.stack.last() {
            Some(&top) => {
                self.current = top;
                self.backtracks += 1;
                Ok(SolverStep::Backtracked(top))
            }
            None => {
                self.status = Status::Exhausted;
                Err(self.disconnected())
            }
        }
    }

    fn disconnected(&self) -> MazeError {
        MazeError::Disconnected {
            size: self.grid.size(),
        }
    }

    /// Step until the goal is reached, returning the number of steps taken.
    pub fn run_to_goal(&mut self) -> Result<usize, MazeError> {
        let mut steps = 0;
        while !self.is_finished() {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }
}
