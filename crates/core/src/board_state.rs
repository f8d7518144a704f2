//! Board state module - the falling-piece state machine
//!
//! Ties the grid, the active piece and the lookahead queue together:
//!
//! ```text
//! Empty -> Spawning -> Falling -> Locking -> RowClearing -> Spawning -> ...
//!                                   \-> GameOver
//! ```
//!
//! Every operation is synchronous. Mutations are validated with
//! [`Grid::intersects`] before they are committed, so the active piece never
//! overlaps a settled cell or leaves the grid. Once the board reaches
//! [`Phase::GameOver`] all mutating calls are no-ops until it is reset.
//!
//! Operations push [`BoardEvent`]s into an outbox that the owner drains with
//! [`BoardState::take_events`].

use std::collections::VecDeque;
use std::ops::Range;

use crate::grid::Grid;
use crate::pieces::Piece;
use crate::rng::ShapeFeed;
use crate::snapshot::{ActiveSnapshot, BoardSnapshot};
use crate::types::{Direction, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, LOOKAHEAD_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No active piece and nothing pending (fresh, stopped or feed exhausted)
    Empty,
    Spawning,
    Falling,
    Locking,
    RowClearing,
    GameOver,
}

/// The piece under player control, anchored by the top-left of its mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub piece: Piece,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Absolute grid coordinates of the filled sub-cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.piece
            .mask()
            .filled_cells()
            .map(move |(i, j)| (self.x + j as i32, self.y + i as i32))
    }
}

/// Result of a fall attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to move (no active piece, or the board is over)
    Idle,
    /// The piece is still falling
    Falling,
    /// The piece merged into the grid; a new piece was spawned if one was available
    Locked { rows_cleared: usize },
    GameOver,
}

/// Result of [`BoardState::lock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    NoPiece,
    Merged,
    GameOver,
}

/// Notifications produced by board operations, in order of occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A shape entered the lookahead queue
    ShapeQueued(ShapeKind),
    Spawned(ShapeKind),
    Locked(ShapeKind),
    RowsEliminated(usize),
    GameOver,
    /// A recorded feed ran out of shapes; no piece was spawned
    FeedExhausted,
}

#[derive(Debug, Clone)]
pub struct BoardState {
    grid: Grid,
    active: Option<ActivePiece>,
    lookahead: VecDeque<ShapeKind>,
    feed: ShapeFeed,
    phase: Phase,
    /// Set between the two halves of a fall step: the piece is visually on its
    /// way into the next row but its anchor has not moved yet.
    in_transit: bool,
    /// Rows touched by the last locked piece, scanned by `scan_and_clear_rows`
    locked_span: Option<Range<usize>>,
    events: Vec<BoardEvent>,
}

impl BoardState {
    pub fn new(feed: ShapeFeed) -> Self {
        Self {
            grid: Grid::new(),
            active: None,
            lookahead: VecDeque::with_capacity(LOOKAHEAD_MIN + 1),
            feed,
            phase: Phase::Empty,
            in_transit: false,
            locked_span: None,
            events: Vec::new(),
        }
    }

    /// Board drawing random shapes from `seed`
    pub fn with_seed(seed: u32) -> Self {
        Self::new(ShapeFeed::seeded(seed))
    }

    /// Empty the board and switch to a new shape feed
    pub fn reset(&mut self, feed: ShapeFeed) {
        self.clear();
        self.feed = feed;
    }

    /// Drop all settled cells, the active piece and the lookahead queue
    pub fn clear(&mut self) {
        self.grid.clear();
        self.active = None;
        self.lookahead.clear();
        self.phase = Phase::Empty;
        self.in_transit = false;
        self.locked_span = None;
        self.events.clear();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for setting up positions
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn in_transit(&self) -> bool {
        self.in_transit
    }

    /// Upcoming shapes, next first
    pub fn lookahead(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        self.lookahead.iter().copied()
    }

    pub fn feed(&self) -> &ShapeFeed {
        &self.feed
    }

    /// Take all events produced since the last call
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    fn falling_piece(&self) -> Option<ActivePiece> {
        self.active.filter(|_| self.phase == Phase::Falling)
    }

    /// Pop the next shape and place it centered on row 0.
    ///
    /// The queue is topped up to [`LOOKAHEAD_MIN`] entries first. The spawn
    /// happens even if the spawn position overlaps settled cells; that is
    /// resolved by the first fall attempt. Returns false when there is
    /// nothing to spawn.
    pub fn spawn(&mut self) -> bool {
        if self.phase == Phase::GameOver || self.active.is_some() {
            return false;
        }
        self.phase = Phase::Spawning;
        self.in_transit = false;

        while self.lookahead.len() < LOOKAHEAD_MIN {
            match self.feed.next_shape() {
                Some(kind) => {
                    self.lookahead.push_back(kind);
                    self.events.push(BoardEvent::ShapeQueued(kind));
                }
                None => break,
            }
        }

        let Some(kind) = self.lookahead.pop_front() else {
            tracing::debug!("shape feed exhausted, nothing to spawn");
            self.phase = Phase::Empty;
            self.events.push(BoardEvent::FeedExhausted);
            return false;
        };

        let piece = Piece::new(kind);
        // Odd leftovers round toward the left.
        let x = (BOARD_WIDTH as i32 - piece.mask().size() as i32) / 2;
        self.active = Some(ActivePiece { piece, x, y: 0 });
        self.phase = Phase::Falling;
        self.events.push(BoardEvent::Spawned(kind));
        tracing::debug!(kind = kind.as_str(), x, "spawned piece");
        true
    }

    /// Whether `piece`'s mask at (x, y) hits a wall, the floor or a settled cell
    pub fn intersects(&self, piece: &Piece, x: i32, y: i32) -> bool {
        self.grid.intersects(piece.mask(), x, y)
    }

    /// Shift the active piece one column.
    ///
    /// While a fall step is in transit the piece must also fit one row lower,
    /// so it cannot slide over a cell it is about to land on.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        let Some(active) = self.falling_piece() else {
            return false;
        };

        let x = active.x + direction.dx() as i32;
        let mask = active.piece.mask();
        let blocked = self.grid.intersects(mask, x, active.y)
            || (self.in_transit && self.grid.intersects(mask, x, active.y + 1));

        if blocked {
            tracing::trace!(direction = direction.as_str(), x, y = active.y, "move blocked");
            return false;
        }

        if let Some(piece) = self.active.as_mut() {
            piece.x = x;
        }
        true
    }

    /// Rotate the active piece in place. There is no kick search; a blocked
    /// rotation is simply rejected.
    pub fn try_rotate(&mut self, direction: Direction) -> bool {
        let Some(active) = self.falling_piece() else {
            return false;
        };

        let rotated = active.piece.rotated_mask(direction);
        if self.grid.intersects(&rotated, active.x, active.y) {
            tracing::trace!(direction = direction.as_str(), "rotation blocked");
            return false;
        }

        if let Some(piece) = self.active.as_mut() {
            piece.piece.set_mask(rotated);
        }
        true
    }

    /// First half of a fall step: lock if the row below is blocked, otherwise
    /// put the piece in transit toward it.
    pub fn begin_fall(&mut self) -> StepOutcome {
        let Some(active) = self.falling_piece() else {
            return StepOutcome::Idle;
        };

        if self.intersects(&active.piece, active.x, active.y + 1) {
            return self.lock_sequence();
        }
        self.in_transit = true;
        StepOutcome::Falling
    }

    /// Second half of a fall step: commit the move into the next row.
    ///
    /// The row is checked again because a rotation during transit only
    /// validated the current row. Returns whether the piece moved.
    pub fn complete_fall(&mut self) -> bool {
        if !self.in_transit {
            return false;
        }
        self.in_transit = false;

        let Some(active) = self.falling_piece() else {
            return false;
        };
        if self.intersects(&active.piece, active.x, active.y + 1) {
            return false;
        }
        if let Some(piece) = self.active.as_mut() {
            piece.y += 1;
        }
        true
    }

    /// Abandon an in-transit fall step without moving
    pub fn cancel_fall(&mut self) {
        self.in_transit = false;
    }

    /// Descend one row, or run the lock sequence if the piece cannot
    pub fn step_down(&mut self) -> StepOutcome {
        self.in_transit = false;
        match self.begin_fall() {
            StepOutcome::Falling => {
                self.complete_fall();
                StepOutcome::Falling
            }
            other => other,
        }
    }

    /// Lowest anchor row the active piece can reach from where it is
    pub fn drop_target_y(&self) -> Option<i32> {
        let active = self.active?;
        let mut y = active.y;
        while !self.intersects(&active.piece, active.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Move straight to [`drop_target_y`](Self::drop_target_y) and lock
    pub fn hard_drop(&mut self) -> StepOutcome {
        if self.falling_piece().is_none() {
            return StepOutcome::Idle;
        }
        self.in_transit = false;

        if let Some(y) = self.drop_target_y() {
            if let Some(piece) = self.active.as_mut() {
                piece.y = y;
            }
        }
        self.lock_sequence()
    }

    /// Merge the active piece into the grid.
    ///
    /// A piece that never left row 0 ends the game instead; the grid and the
    /// active piece are then left untouched for inspection. Sub-cells outside
    /// the grid are dropped on merge.
    pub fn lock(&mut self) -> LockOutcome {
        if self.phase == Phase::GameOver {
            return LockOutcome::NoPiece;
        }
        let Some(active) = self.active else {
            return LockOutcome::NoPiece;
        };
        self.phase = Phase::Locking;
        self.in_transit = false;

        if active.y == 0 {
            tracing::debug!(kind = active.piece.kind().as_str(), "piece locked at spawn row");
            self.phase = Phase::GameOver;
            self.lookahead.clear();
            self.events.push(BoardEvent::GameOver);
            return LockOutcome::GameOver;
        }

        let mask = active.piece.mask();
        self.grid
            .merge(mask, active.x, active.y, active.piece.color());

        let top = active.y.clamp(0, BOARD_HEIGHT as i32) as usize;
        let bottom = (active.y + mask.size() as i32).clamp(0, BOARD_HEIGHT as i32) as usize;
        self.locked_span = Some(top..bottom);

        self.active = None;
        self.phase = Phase::RowClearing;
        self.events.push(BoardEvent::Locked(active.piece.kind()));
        tracing::debug!(
            kind = active.piece.kind().as_str(),
            x = active.x,
            y = active.y,
            "piece locked"
        );
        LockOutcome::Merged
    }

    /// Remove the complete rows touched by the last locked piece and let
    /// everything above fall into the gap. Scans the whole grid when no piece
    /// was locked since the last scan. Returns the number of rows removed.
    pub fn scan_and_clear_rows(&mut self) -> usize {
        if self.phase == Phase::GameOver {
            return 0;
        }

        let span = self
            .locked_span
            .take()
            .unwrap_or(0..BOARD_HEIGHT as usize);
        let cleared = self.grid.clear_full_rows_in(span);
        let count = cleared.len();

        if count > 0 {
            tracing::debug!(rows = ?cleared.as_slice(), "rows eliminated");
            self.events.push(BoardEvent::RowsEliminated(count));
        }
        if self.phase == Phase::RowClearing {
            self.phase = Phase::Spawning;
        }
        count
    }

    /// lock, then clear rows and spawn unless the game ended
    fn lock_sequence(&mut self) -> StepOutcome {
        match self.lock() {
            LockOutcome::NoPiece => StepOutcome::Idle,
            LockOutcome::GameOver => StepOutcome::GameOver,
            LockOutcome::Merged => {
                let rows_cleared = self.scan_and_clear_rows();
                self.spawn();
                StepOutcome::Locked { rows_cleared }
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.grid.write_u8_grid(&mut out.cells);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.falling_piece().and_then(|_| self.drop_target_y());
        out.next = self.lookahead.front().copied();
        out.phase = self.phase;
        out.game_over = self.is_game_over();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::with_seed(1)
    }
}
