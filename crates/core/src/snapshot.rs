use crate::board_state::{ActivePiece, Phase};
use crate::catalog::Bitmask;
use crate::types::{ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS};

const W: usize = BOARD_WIDTH as usize;
const H: usize = BOARD_HEIGHT as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub x: i32,
    pub y: i32,
    pub mask: Bitmask,
    /// Color code of the piece's cells
    pub code: u8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.piece.kind(),
            x: value.x,
            y: value.y,
            mask: *value.piece.mask(),
            code: value.piece.color().code(),
        }
    }
}

/// Presentation view of a board, rebuilt from logical state on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    /// Settled cells: 0 = empty, otherwise the color code
    pub cells: [[u8; W]; H],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i32>,
    pub next: Option<ShapeKind>,
    pub phase: Phase,
    pub game_over: bool,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.cells = [[0u8; W]; H];
        self.active = None;
        self.ghost_y = None;
        self.next = None;
        self.phase = Phase::Empty;
        self.game_over = false;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && self.active.is_some()
    }

    /// Settled cells with the active piece drawn on top
    pub fn composited(&self) -> [[u8; W]; H] {
        let mut out = self.cells;
        if let Some(active) = self.active {
            for (i, j) in active.mask.filled_cells() {
                let x = active.x + j as i32;
                let y = active.y + i as i32;
                if (0..W as i32).contains(&x) && (0..H as i32).contains(&y) {
                    out[y as usize][x as usize] = active.code;
                }
            }
        }
        out
    }

    /// Rows below the hidden spawn area
    pub fn visible_rows(grid: &[[u8; W]; H]) -> &[[u8; W]] {
        &grid[HIDDEN_ROWS as usize..]
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            cells: [[0u8; W]; H],
            active: None,
            ghost_y: None,
            next: None,
            phase: Phase::Empty,
            game_over: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_state::BoardState;
    use crate::types::VISIBLE_ROWS;

    #[test]
    fn composited_overlays_active_piece() {
        let mut board = BoardState::with_seed(5);
        board.spawn();
        let snap = board.snapshot();
        let active = snap.active.unwrap();

        let grid = snap.composited();
        let painted = grid.iter().flatten().filter(|&&c| c == active.code).count();
        assert_eq!(painted, 4);
        assert_eq!(snap.cells.iter().flatten().filter(|&&c| c != 0).count(), 0);
    }

    #[test]
    fn visible_rows_skip_hidden_area() {
        let snap = BoardSnapshot::default();
        assert_eq!(BoardSnapshot::visible_rows(&snap.cells).len(), VISIBLE_ROWS as usize);
    }

    #[test]
    fn clear_resets_to_default() {
        let mut board = BoardState::with_seed(5);
        board.spawn();
        board.hard_drop();
        let mut snap = board.snapshot();
        snap.clear();
        assert_eq!(snap, BoardSnapshot::default());
    }
}
