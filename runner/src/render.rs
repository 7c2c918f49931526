//! Plain-text view of a snapshot for the terminal CLI

use maze_core::Position;

use crate::session::{GameMode, Snapshot};

const WALL: char = '#';
const OPEN: char = ' ';

/// Draw the maze with its annotations, one text row per binary-grid row.
///
/// Legend: `@` active marker (player or solver frontier), `G` goal,
/// `o` solver stack, `x` backtracked cell, digits for saved paths.
pub fn render_ascii(snapshot: &Snapshot) -> String {
    let grid = &snapshot.grid;
    let mut rows: Vec<Vec<char>> = grid
        .to_binary_grid()
        .into_iter()
        .map(|row| row.into_iter().map(|v| if v == 0 { WALL } else { OPEN }).collect())
        .collect();

    let marker = match snapshot.mode {
        GameMode::Player => snapshot.player,
        GameMode::Solver => snapshot.solver,
    };

    for pos in grid.positions() {
        let Some(cell) = grid.cell(pos) else { continue };

        let glyph = if pos == marker {
            '@'
        } else if pos == grid.goal() {
            'G'
        } else if cell.is_path {
            'o'
        } else if cell.is_backtrack {
            'x'
        } else if let Some(n) = cell.path_number {
            char::from_digit((n % 10) as u32, 10).unwrap_or('+')
        } else {
            OPEN
        };

        let (row, col) = centre(pos);
        rows[row][col] = glyph;
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn centre(pos: Position) -> (usize, usize) {
    (pos.y * 2 + 1, pos.x * 2 + 1)
}
