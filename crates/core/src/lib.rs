//! Core board engine - pure, deterministic, and testable
//!
//! This crate holds the game rules of a falling-block puzzle: the shape
//! catalog, live pieces, the settled-cell grid, the board state machine and
//! the action log used for deterministic replays. It has no dependencies on
//! rendering, timing or input devices, which makes it:
//!
//! - **Deterministic**: a seed (or a recorded spawn list) reproduces a game exactly
//! - **Synchronous**: every operation returns immediately
//! - **Headless**: presentation layers only read snapshots and events
//!
//! # Module Structure
//!
//! - [`catalog`]: the seven shapes as square bitmasks plus color tags
//! - [`pieces`]: live pieces with two-phase rotation
//! - [`grid`]: 10x22 settled-cell matrix, intersection tests and row compaction
//! - [`board_state`]: spawn, move, rotate, fall, lock and row clearing
//! - [`rng`]: seeded shape generation and recorded shape feeds
//! - [`replay`]: append-only action/spawn log and playback cursors
//! - [`scoring`]: points per row elimination
//! - [`snapshot`]: read-only views for presentation
//!
//! # Example
//!
//! ```
//! use tetris_board_core::{BoardState, StepOutcome};
//! use tetris_board_core::types::Direction;
//!
//! let mut board = BoardState::with_seed(12345);
//! assert!(board.spawn());
//!
//! board.try_move(Direction::Left);
//! board.try_rotate(Direction::Right);
//! assert!(matches!(board.hard_drop(), StepOutcome::Locked { .. }));
//!
//! assert_eq!(board.grid().occupied_count(), 4);
//! ```

pub mod board_state;
pub mod catalog;
pub mod grid;
pub mod pieces;
pub mod replay;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_board_types as types;

// Re-export commonly used types for convenience
pub use board_state::{ActivePiece, BoardEvent, BoardState, LockOutcome, Phase, StepOutcome};
pub use catalog::{definition, random_shape, Bitmask, ShapeDefinition, CATALOG};
pub use grid::Grid;
pub use pieces::Piece;
pub use replay::{ActionCursor, ActionLog, ActionRecord, ReplayError, SpawnCursor};
pub use rng::{ShapeFeed, SimpleRng};
pub use scoring::row_score;
pub use snapshot::{ActiveSnapshot, BoardSnapshot};
