//! Recording and replay bookkeeping for manual attempts
//!
//! The recorder keeps the path being walked right now plus every path
//! saved so far, and paints saved paths onto the grid's annotation
//! fields. It never looks at walls: callers only record moves that
//! [`can_move`](crate::movement::can_move) already approved.

use crate::error::MazeError;
use crate::grid::{Grid, Position};

/// In-progress path plus the history of saved attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecorder {
    current: Vec<Position>,
    history: Vec<Vec<Position>>,
    selected: Option<usize>,
}

impl Default for PathRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathRecorder {
    pub fn new() -> Self {
        Self {
            current: vec![Position::ORIGIN],
            history: Vec::new(),
            selected: None,
        }
    }

    /// Append an approved move to the path being walked.
    pub fn record(&mut self, pos: Position) {
        self.current.push(pos);
    }

    /// Path being walked, always starting at the entrance.
    pub fn current_path(&self) -> &[Position] {
        &self.current
    }

    /// Saved paths, oldest first.
    pub fn paths(&self) -> &[Vec<Position>] {
        &self.history
    }

    /// Number of positions in each saved path, oldest first.
    pub fn path_lengths(&self) -> Vec<usize> {
        self.history.iter().map(Vec::len).collect()
    }

    /// Index of the last path picked for replay.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Commit the current path to history and repaint the grid.
    ///
    /// A path that never left the entrance is not saved and `false` is
    /// returned. Otherwise the current path restarts at (0, 0) and every
    /// saved path is re-applied to `grid` oldest first, so a cell shared
    /// by several paths carries the number of the newest one.
    pub fn save(&mut self, grid: &mut Grid) -> bool {
        if self.current.len() <= 1 {
            return false;
        }

        let path = std::mem::replace(&mut self.current, vec![Position::ORIGIN]);
        self.history.push(path);
        self.annotate(grid);
        true
    }

    /// Repaint `is_player_path` and `path_number` from the saved history.
    pub fn annotate(&self, grid: &mut Grid) {
        grid.clear_player_marks();

        for (index, path) in self.history.iter().enumerate() {
            for &pos in path {
                if let Some(cell) = grid.cell_mut(pos) {
                    cell.is_player_path = true;
                    cell.path_number = Some(index + 1);
                }
            }
        }
    }

    /// Pick a saved path for replay.
    pub fn select(&mut self, index: usize) -> Result<Replay, MazeError> {
        let path = self.history.get(index).ok_or(MazeError::InvalidIndex {
            index,
            len: self.history.len(),
        })?;

        self.selected = Some(index);
        Ok(Replay::new(path.clone()))
    }

    /// Continue walking from the end of a replayed path.
    ///
    /// The replayed positions become the current path, so the next
    /// recorded move extends it from where the replay stopped. Paths that
    /// do not start at the entrance are ignored.
    pub fn resume(&mut self, replay: &Replay) {
        if replay.positions().first() == Some(&Position::ORIGIN) {
            self.current = replay.positions().to_vec();
        }
    }

    /// Forget every saved path, the current path, and the selection.
    pub fn reset(&mut self) {
        self.current = vec![Position::ORIGIN];
        self.history.clear();
        self.selected = None;
    }
}

/// Frame-by-frame walk through a saved path.
///
/// Yields each position of the path in order; the caller paces the frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    path: Vec<Position>,
    next: usize,
}

impl Replay {
    fn new(path: Vec<Position>) -> Self {
        Self { path, next: 0 }
    }

    /// Position the replay ends on.
    pub fn final_position(&self) -> Option<Position> {
        self.path.last().copied()
    }

    /// Whether the replayed path finishes on `goal`.
    pub fn ends_at(&self, goal: Position) -> bool {
        self.final_position() == Some(goal)
    }

    /// Every position of the replayed path, including frames already yielded.
    pub fn positions(&self) -> &[Position] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl Iterator for Replay {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.path.get(self.next).copied()?;
        self.next += 1;
        Some(pos)
    }
}
