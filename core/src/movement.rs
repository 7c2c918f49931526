//! Movement validation shared by manual play and the solver
//!
//! [`can_move`] is the only place that reads walls to decide whether a
//! step is legal; every consumer goes through it.

use crate::grid::{Direction, Grid, Position};

/// Check whether a single step from `from` to `to` is legal.
///
/// `to` must be inside the grid and exactly one cardinal step away from
/// `from`; any other displacement (diagonal, longer jump, standing
/// still) is rejected. The step is legal when the wall on `from`'s side
/// facing `to` is open.
pub fn can_move(from: Position, to: Position, grid: &Grid) -> bool {
    if !grid.contains(to) {
        return false;
    }

    let Some(dir) = from.direction_to(to) else {
        return false;
    };

    grid.cell(from)
        .map(|cell| !cell.walls.is_closed(dir))
        .unwrap_or(false)
}

/// Legal moves out of `from`, in scan order (up, right, down, left).
pub fn legal_moves(from: Position, grid: &Grid) -> impl Iterator<Item = Position> + '_ {
    Direction::SCAN_ORDER
        .into_iter()
        .filter_map(move |dir| from.step(dir, grid.size()))
        .filter(move |&to| can_move(from, to, grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 grid: (0,0) <-> (1,0) <-> (1,1), everything else closed.
    fn corridor() -> Grid {
        let mut grid = Grid::new(2).unwrap();
        grid.carve(Position::new(0, 0), Direction::Right);
        grid.carve(Position::new(1, 0), Direction::Down);
        grid
    }

    #[test]
    fn test_open_walls_allow_moves_both_ways() {
        let grid = corridor();

        assert!(can_move(Position::new(0, 0), Position::new(1, 0), &grid));
        assert!(can_move(Position::new(1, 0), Position::new(0, 0), &grid));
        assert!(can_move(Position::new(1, 0), Position::new(1, 1), &grid));
        assert!(can_move(Position::new(1, 1), Position::new(1, 0), &grid));
    }

    #[test]
    fn test_closed_walls_block() {
        let grid = corridor();

        assert!(!can_move(Position::new(0, 0), Position::new(0, 1), &grid));
        assert!(!can_move(Position::new(0, 1), Position::new(1, 1), &grid));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let grid = corridor();

        assert!(!can_move(Position::new(1, 0), Position::new(2, 0), &grid));
        assert!(!can_move(Position::new(1, 1), Position::new(1, 2), &grid));
    }

    #[test]
    fn test_non_adjacent_rejected() {
        let mut grid = corridor();
        grid.carve(Position::new(0, 0), Direction::Down);
        grid.carve(Position::new(0, 1), Direction::Right);

        // Diagonal, standing still and a two-cell jump all fall through
        assert!(!can_move(Position::new(0, 0), Position::new(1, 1), &grid));
        assert!(!can_move(Position::new(0, 0), Position::new(0, 0), &grid));

        let mut wide = Grid::new(3).unwrap();
        wide.carve(Position::new(0, 0), Direction::Right);
        wide.carve(Position::new(1, 0), Direction::Right);
        assert!(!can_move(Position::new(0, 0), Position::new(2, 0), &wide));
    }

    #[test]
    fn test_legal_moves_in_scan_order() {
        let mut grid = Grid::new(3).unwrap();
        let centre = Position::new(1, 1);
        for dir in [Direction::Left, Direction::Down, Direction::Up] {
            grid.carve(centre, dir);
        }

        let moves: Vec<_> = legal_moves(centre, &grid).collect();
        assert_eq!(
            moves,
            vec![Position::new(1, 0), Position::new(1, 2), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_agrees_with_walls_everywhere() {
        let grid = corridor();

        for from in grid.positions() {
            for dir in Direction::SCAN_ORDER {
                if let Some(to) = from.step(dir, grid.size()) {
                    let open = !grid.cell(from).unwrap().walls.is_closed(dir);
                    assert_eq!(can_move(from, to, &grid), open, "{} -> {}", from, to);
                }
            }
        }
    }
}
