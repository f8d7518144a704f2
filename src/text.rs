//! Plain text board rendering.
//!
//! Settled cells draw as `#`, the active piece as `@` and its landing
//! position as `:`. Only the visible rows are drawn.

use std::fmt::Write;

use crate::core::BoardSnapshot;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS};

const SETTLED: char = '#';
const ACTIVE: char = '@';
const GHOST: char = ':';
const EMPTY: char = '.';

/// Render `snapshot` into `out`, replacing its contents
pub fn render_into(snapshot: &BoardSnapshot, out: &mut String) {
    out.clear();

    let width = BOARD_WIDTH as usize;
    let composited = snapshot.composited();
    let mut ghost = [[false; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
    if let (Some(active), Some(ghost_y)) = (snapshot.active, snapshot.ghost_y) {
        for (i, j) in active.mask.filled_cells() {
            let x = active.x + j as i32;
            let y = ghost_y + i as i32;
            if (0..width as i32).contains(&x) && (0..ghost.len() as i32).contains(&y) {
                ghost[y as usize][x as usize] = true;
            }
        }
    }

    let hidden = HIDDEN_ROWS as usize;
    for (offset, row) in BoardSnapshot::visible_rows(&composited).iter().enumerate() {
        let y = offset + hidden;
        out.push('|');
        for (x, &code) in row.iter().enumerate() {
            let ch = if snapshot.cells[y][x] != 0 {
                SETTLED
            } else if code != 0 {
                ACTIVE
            } else if ghost[y][x] {
                GHOST
            } else {
                EMPTY
            };
            out.push(ch);
        }
        out.push_str("|\n");
    }
    out.push('+');
    out.extend(std::iter::repeat('-').take(width));
    out.push_str("+\n");

    if let Some(next) = snapshot.next {
        let _ = writeln!(out, "next: {}", next.as_str());
    }
    if snapshot.game_over {
        out.push_str("GAME OVER\n");
    }
}

pub fn render(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    render_into(snapshot, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActionLog, BoardState, ShapeFeed, SpawnCursor};
    use crate::types::ShapeKind;

    fn board_with(kinds: &[ShapeKind]) -> BoardState {
        let mut log = ActionLog::new();
        for &kind in kinds {
            log.record_spawn(kind);
        }
        let (_, spawns): (_, SpawnCursor) = log.into_cursors();
        BoardState::new(ShapeFeed::Recorded(spawns))
    }

    #[test]
    fn test_empty_board_frame() {
        let text = render(&BoardSnapshot::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "|..........|");
        assert_eq!(lines[20], "+----------+");
    }

    #[test]
    fn test_settled_and_ghost() {
        let mut board = board_with(&[ShapeKind::O, ShapeKind::O, ShapeKind::O]);
        board.spawn();
        board.hard_drop();

        let text = render(&board.snapshot());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[16], "|....::....|");
        assert_eq!(lines[17], "|....::....|");
        assert_eq!(lines[18], "|....##....|");
        assert_eq!(lines[19], "|....##....|");
        assert!(text.contains("next: o"));
    }
}
