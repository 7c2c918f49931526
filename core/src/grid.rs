//! Grid model: an N x N matrix of walled cells stored row-major
//!
//! Each cell carries its four walls plus the annotation flags the
//! solver and the path recorder paint onto it. Walls are only ever
//! removed in symmetric pairs, so the side of a shared edge seen from
//! either cell always agrees.

use crate::error::MazeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest grid a maze can be carved into.
pub const MIN_SIZE: usize = 2;

/// A cell coordinate; `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// The entrance of every maze.
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbour one step in `dir`, if it stays inside a `size` x `size` grid.
    pub fn step(self, dir: Direction, size: usize) -> Option<Position> {
        let (x, y) = match dir {
            Direction::Up => (Some(self.x), self.y.checked_sub(1)),
            Direction::Right => (self.x.checked_add(1), Some(self.y)),
            Direction::Down => (Some(self.x), self.y.checked_add(1)),
            Direction::Left => (self.x.checked_sub(1), Some(self.y)),
        };

        match (x, y) {
            (Some(x), Some(y)) if x < size && y < size => Some(Position { x, y }),
            _ => None,
        }
    }

    /// Direction leading from `self` to `other` when they are 4-adjacent.
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        let dx = other.x as i64 - self.x as i64;
        let dy = other.y as i64 - self.y as i64;

        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (1, 0) => Some(Direction::Right),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Fixed neighbour order used by the solver and the generator's scan.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "r" | "right" => Ok(Direction::Right),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            _ => Err(format!("Invalid direction: '{}'. Must be one of U, R, D, L", s)),
        }
    }
}

/// Wall flags of a cell; `true` means closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn is_closed(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    fn open(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.top = false,
            Direction::Right => self.right = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::CLOSED
    }
}

/// A single maze cell with its walls and annotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub walls: Walls,
    /// Generation bookkeeping; always false once a maze is handed out.
    pub visited: bool,
    /// On the solver's live stack.
    pub is_path: bool,
    /// Explored by the solver but popped off its stack.
    pub is_backtrack: bool,
    /// Covered by at least one saved player path.
    pub is_player_path: bool,
    /// 1-based number of the last saved path applied over this cell.
    pub path_number: Option<usize>,
}

impl Cell {
    /// Reset every flag except the walls.
    pub fn clear_annotations(&mut self) {
        self.visited = false;
        self.is_path = false;
        self.is_backtrack = false;
        self.is_player_path = false;
        self.path_number = None;
    }
}

/// Square maze grid backed by a flat row-major buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

/// Unchecked wire form of [`Grid`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGrid {
    size: usize,
    cells: Vec<Cell>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = MazeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let RawGrid { size, cells } = raw;
        if size < MIN_SIZE {
            return Err(MazeError::InvalidSize { size });
        }
        let Some(expected) = size.checked_mul(size) else {
            return Err(MazeError::InvalidSize { size });
        };
        if cells.len() != expected {
            return Err(MazeError::CellCount {
                size,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }
}

impl Grid {
    /// Create a `size` x `size` grid with every wall closed.
    pub fn new(size: usize) -> Result<Self, MazeError> {
        if size < MIN_SIZE {
            return Err(MazeError::InvalidSize { size });
        }

        Ok(Self {
            size,
            cells: vec![Cell::default(); size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Bottom-right corner, the cell every maze is solved towards.
    pub fn goal(&self) -> Position {
        Position::new(self.size - 1, self.size - 1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.size + pos.x)
    }

    /// Bounds-checked access to the cell at `pos`.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Bounds-checked mutable access to the cell at `pos`.
    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Position::new(x, y)))
    }

    /// Remove the wall between `from` and its neighbour in `dir`.
    ///
    /// Both sides of the shared edge are opened together. Returns the
    /// neighbour, or `None` (leaving the grid untouched) when the
    /// neighbour would fall outside the grid.
    pub fn carve(&mut self, from: Position, dir: Direction) -> Option<Position> {
        let to = from.step(dir, self.size)?;
        let a = self.index(from)?;
        let b = self.index(to)?;

        self.cells[a].walls.open(dir);
        self.cells[b].walls.open(dir.opposite());
        Some(to)
    }

    /// Clear the solver and generation flags, keeping player annotations.
    pub fn clear_search_flags(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
            cell.is_path = false;
            cell.is_backtrack = false;
        }
    }

    /// Clear the saved-path marks, keeping solver marks.
    pub fn clear_player_marks(&mut self) {
        for cell in &mut self.cells {
            cell.is_player_path = false;
            cell.path_number = None;
        }
    }

    /// Clear every annotation field; walls are left intact.
    pub fn clear_annotations(&mut self) {
        for cell in &mut self.cells {
            cell.clear_annotations();
        }
    }

    /// Number of open passages, each shared edge counted once.
    pub fn open_passages(&self) -> usize {
        self.positions()
            .filter_map(|pos| self.cell(pos).map(|cell| (pos, cell)))
            .map(|(pos, cell)| {
                let right = pos.x + 1 < self.size && !cell.walls.right;
                let down = pos.y + 1 < self.size && !cell.walls.bottom;
                right as usize + down as usize
            })
            .sum()
    }

    /// Check that every shared edge reads the same from both sides.
    pub fn walls_symmetric(&self) -> bool {
        self.positions().all(|pos| {
            [Direction::Right, Direction::Down].iter().all(|&dir| {
                match (pos.step(dir, self.size), self.cell(pos)) {
                    (Some(next), Some(cell)) => self
                        .cell(next)
                        .map(|other| cell.walls.is_closed(dir) == other.walls.is_closed(dir.opposite()))
                        .unwrap_or(false),
                    _ => true,
                }
            })
        })
    }

    /// Convert the maze to a binary grid representation
    ///
    /// - 0 = wall
    /// - 1 = path (walkable cell or open passage)
    ///
    /// For a maze of size N the result is (N*2 + 1) x (N*2 + 1), indexed
    /// `[row][col]`, with cell centres at `(y*2 + 1, x*2 + 1)`.
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let grid_size = self.size * 2 + 1;
        let mut grid = vec![vec![0u8; grid_size]; grid_size];

        for pos in self.positions() {
            let Some(cell) = self.cell(pos) else { continue };

            let gr = pos.y * 2 + 1;
            let gc = pos.x * 2 + 1;

            grid[gr][gc] = 1;

            if !cell.walls.top {
                grid[gr - 1][gc] = 1;
            }
            if !cell.walls.bottom {
                grid[gr + 1][gc] = 1;
            }
            if !cell.walls.right {
                grid[gr][gc + 1] = 1;
            }
            if !cell.walls.left {
                grid[gr][gc - 1] = 1;
            }
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_fully_walled() {
        let grid = Grid::new(4).unwrap();

        assert_eq!(grid.cells().len(), 16);
        assert!(grid.cells().iter().all(|c| c.walls == Walls::CLOSED));
        assert_eq!(grid.open_passages(), 0);
        assert!(grid.walls_symmetric());
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert_eq!(Grid::new(1), Err(MazeError::InvalidSize { size: 1 }));
        assert_eq!(Grid::new(0), Err(MazeError::InvalidSize { size: 0 }));
    }

    #[test]
    fn test_cell_access_is_bounds_checked() {
        let grid = Grid::new(3).unwrap();

        assert!(grid.cell(Position::new(2, 2)).is_some());
        assert!(grid.cell(Position::new(3, 0)).is_none());
        assert!(grid.cell(Position::new(0, 3)).is_none());
    }

    #[test]
    fn test_carve_is_symmetric() {
        let mut grid = Grid::new(3).unwrap();

        let next = grid.carve(Position::new(1, 1), Direction::Left);
        assert_eq!(next, Some(Position::new(0, 1)));

        let a = grid.cell(Position::new(1, 1)).unwrap();
        let b = grid.cell(Position::new(0, 1)).unwrap();
        assert!(!a.walls.left);
        assert!(!b.walls.right);
        assert!(grid.walls_symmetric());
        assert_eq!(grid.open_passages(), 1);
    }

    #[test]
    fn test_carve_out_of_bounds_is_noop() {
        let mut grid = Grid::new(2).unwrap();

        assert_eq!(grid.carve(Position::ORIGIN, Direction::Up), None);
        assert_eq!(grid.carve(Position::new(1, 0), Direction::Right), None);
        assert!(grid.cells().iter().all(|c| c.walls == Walls::CLOSED));
    }

    #[test]
    fn test_step_and_direction_to() {
        let p = Position::new(0, 0);
        assert_eq!(p.step(Direction::Up, 3), None);
        assert_eq!(p.step(Direction::Left, 3), None);
        assert_eq!(p.step(Direction::Right, 3), Some(Position::new(1, 0)));
        assert_eq!(p.step(Direction::Down, 3), Some(Position::new(0, 1)));
        assert_eq!(Position::new(2, 2).step(Direction::Right, 3), None);

        for dir in Direction::SCAN_ORDER {
            let from = Position::new(1, 1);
            let to = from.step(dir, 3).unwrap();
            assert_eq!(from.direction_to(to), Some(dir));
        }
        assert_eq!(p.direction_to(Position::new(1, 1)), None);
        assert_eq!(p.direction_to(p), None);
    }

    #[test]
    fn test_clear_annotations_keeps_walls() {
        let mut grid = Grid::new(2).unwrap();
        grid.carve(Position::ORIGIN, Direction::Right);
        {
            let cell = grid.cell_mut(Position::ORIGIN).unwrap();
            cell.visited = true;
            cell.is_path = true;
            cell.is_backtrack = true;
            cell.is_player_path = true;
            cell.path_number = Some(3);
        }

        grid.clear_annotations();

        let cell = grid.cell(Position::ORIGIN).unwrap();
        assert_eq!(*cell, Cell {
            walls: Walls { right: false, ..Walls::CLOSED },
            ..Cell::default()
        });
    }

    #[test]
    fn test_clear_search_flags_keeps_player_marks() {
        let mut grid = Grid::new(2).unwrap();
        {
            let cell = grid.cell_mut(Position::ORIGIN).unwrap();
            cell.is_path = true;
            cell.is_player_path = true;
            cell.path_number = Some(1);
        }

        grid.clear_search_flags();

        let cell = grid.cell(Position::ORIGIN).unwrap();
        assert!(!cell.is_path);
        assert!(cell.is_player_path);
        assert_eq!(cell.path_number, Some(1));
    }

    #[test]
    fn test_binary_grid() {
        let mut grid = Grid::new(2).unwrap();
        grid.carve(Position::ORIGIN, Direction::Right);
        grid.carve(Position::new(1, 0), Direction::Down);

        let binary = grid.to_binary_grid();

        assert_eq!(binary.len(), 5);
        assert_eq!(binary[1], vec![0, 1, 1, 1, 0]);
        assert_eq!(binary[2], vec![0, 0, 0, 1, 0]);
        assert_eq!(binary[3], vec![0, 1, 0, 1, 0]);
        // Outer frame stays closed
        assert!(binary[0].iter().all(|&v| v == 0));
        assert!(binary[4].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("U".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("right".parse::<Direction>(), Ok(Direction::Right));
        assert!("x".parse::<Direction>().is_err());
    }
}
