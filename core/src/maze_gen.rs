//! Maze generation using Recursive Backtracker algorithm
//!
//! Algorithm: Recursive Backtracker (DFS with backtracking), iterative
//! 1. Start at (0, 0), mark as visited, push it to the stack
//! 2. While stack is not empty:
//!    - Get unvisited neighbors of current cell
//!    - If neighbors exist:
//!      * Choose random neighbor
//!      * Remove wall between current and neighbor
//!      * Mark neighbor as visited, push current to stack, move to neighbor
//!    - Else: backtrack (pop from stack into current)
//!
//! Pushing the cell we leave (rather than the one we enter) keeps the
//! stack equal to the route from the entrance to `current`, so a pop
//! always lands on the nearest ancestor that may still have unexplored
//! neighbours.

use crate::error::MazeError;
use crate::grid::{Direction, Grid, Position};
use crate::rng::{RandomSource, SimpleLCG};

/// Carve a perfect maze into a fresh `size` x `size` grid.
///
/// Every cell ends up reachable from (0, 0) and exactly `size² - 1`
/// walls are opened. The only randomness comes from `rng`.
pub fn generate<R: RandomSource + ?Sized>(size: usize, rng: &mut R) -> Result<Grid, MazeError> {
    let mut grid = Grid::new(size)?;
    recursive_backtracker(&mut grid, rng);

    // Generation bookkeeping must not leak into the handed-out maze
    grid.clear_annotations();
    Ok(grid)
}

/// Generate a maze from a seed with the default [`SimpleLCG`] source.
///
/// Same seed and size always produce the same maze.
pub fn generate_seeded(size: usize, seed: u32) -> Result<Grid, MazeError> {
    let mut rng = SimpleLCG::new(seed);
    generate(size, &mut rng)
}

fn recursive_backtracker<R: RandomSource + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let mut stack = Vec::with_capacity(grid.size() * grid.size());
    let mut current = Position::ORIGIN;

    mark_visited(grid, current);
    stack.push(current);

    while !stack.is_empty() {
        let neighbors = unvisited_neighbors(grid, current);

        if neighbors.is_empty() {
            // Dead end: resume from the cell we came from
            if let Some(prev) = stack.pop() {
                current = prev;
            }
            continue;
        }

        // Out-of-range picks from a misbehaving source wrap around
        let dir = neighbors[rng.choice_index(neighbors.len()) % neighbors.len()];
        if let Some(next) = grid.carve(current, dir) {
            mark_visited(grid, next);
            stack.push(current);
            current = next;
        }
    }
}

/// Directions from `pos` that lead to an in-bounds, unvisited cell.
fn unvisited_neighbors(grid: &Grid, pos: Position) -> Vec<Direction> {
    Direction::SCAN_ORDER
        .into_iter()
        .filter(|&dir| {
            pos.step(dir, grid.size())
                .and_then(|next| grid.cell(next))
                .map(|cell| !cell.visited)
                .unwrap_or(false)
        })
        .collect()
}

fn mark_visited(grid: &mut Grid, pos: Position) {
    if let Some(cell) = grid.cell_mut(pos) {
        cell.visited = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::legal_moves;
    use std::collections::HashSet;

    fn reachable_from_origin(grid: &Grid) -> HashSet<Position> {
        let mut seen = HashSet::from([Position::ORIGIN]);
        let mut frontier = vec![Position::ORIGIN];

        while let Some(pos) = frontier.pop() {
            for next in legal_moves(pos, grid) {
                if seen.insert(next) {
                    frontier.push(next);
                }
            }
        }

        seen
    }

    /// Always picks the first candidate, for hand-checkable layouts.
    struct FirstChoice;

    impl RandomSource for FirstChoice {
        fn choice_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    /// Ignores the `[0, len)` contract entirely.
    struct OutOfRange;

    impl RandomSource for OutOfRange {
        fn choice_index(&mut self, len: usize) -> usize {
            len + 7
        }
    }

    #[test]
    fn test_out_of_range_source_still_carves_perfect_maze() {
        let grid = generate(6, &mut OutOfRange).unwrap();

        assert_eq!(reachable_from_origin(&grid).len(), 36);
        assert_eq!(grid.open_passages(), 35);
        assert!(grid.walls_symmetric());
    }

    #[test]
    fn test_spanning_tree_property() {
        for size in [2, 3, 5, 8, 14, 20] {
            for seed in [1, 12345, 99999, 2918957128] {
                let grid = generate_seeded(size, seed).unwrap();

                assert_eq!(
                    reachable_from_origin(&grid).len(),
                    size * size,
                    "size {} seed {}: not every cell reachable",
                    size,
                    seed
                );
                assert_eq!(
                    grid.open_passages(),
                    size * size - 1,
                    "size {} seed {}: maze is not a tree",
                    size,
                    seed
                );
            }
        }
    }

    #[test]
    fn test_wall_symmetry() {
        for seed in [7, 42, 31337] {
            let grid = generate_seeded(12, seed).unwrap();
            assert!(grid.walls_symmetric(), "seed {} broke wall symmetry", seed);
        }
    }

    #[test]
    fn test_no_bookkeeping_leaks() {
        let grid = generate_seeded(10, 4242).unwrap();

        for cell in grid.cells() {
            assert!(!cell.visited);
            assert!(!cell.is_path);
            assert!(!cell.is_backtrack);
            assert!(!cell.is_player_path);
            assert_eq!(cell.path_number, None);
        }
    }

    #[test]
    fn test_determinism() {
        let grid1 = generate_seeded(10, 99999).unwrap();
        let grid2 = generate_seeded(10, 99999).unwrap();

        // Same seed should produce identical mazes
        assert_eq!(grid1, grid2);
    }

    #[test]
    fn test_different_seeds() {
        let grid1 = generate_seeded(10, 11111).unwrap();
        let grid2 = generate_seeded(10, 22222).unwrap();

        // Different seeds should (almost certainly) produce different mazes
        assert_ne!(grid1.to_binary_grid(), grid2.to_binary_grid());
    }

    #[test]
    fn test_first_choice_carves_serpentine() {
        // Scan order is up, right, down, left: always taking the first
        // candidate runs right along the top row, then snakes down
        let grid = generate(3, &mut FirstChoice).unwrap();
        let binary = grid.to_binary_grid();

        assert_eq!(binary[1], vec![0, 1, 1, 1, 1, 1, 0]);
        assert_eq!(grid.open_passages(), 8);
        assert!(!grid.cell(Position::new(2, 0)).unwrap().walls.bottom);
    }

    #[test]
    fn test_rejects_invalid_size() {
        assert_eq!(
            generate_seeded(1, 5).unwrap_err(),
            MazeError::InvalidSize { size: 1 }
        );
    }

    #[test]
    fn test_grid_size_20x20() {
        let grid = generate_seeded(20, 2918957128).unwrap();
        let binary = grid.to_binary_grid();

        // Grid should be 20*2+1 = 41 x 41
        assert_eq!(binary.len(), 41);
        assert_eq!(binary[0].len(), 41);

        // Corners should be walls
        assert_eq!(binary[0][0], 0);
        assert_eq!(binary[0][40], 0);
        assert_eq!(binary[40][0], 0);
        assert_eq!(binary[40][40], 0);

        // Start and end should be paths
        assert_eq!(binary[1][1], 1);
        assert_eq!(binary[39][39], 1);
    }
}
