//! Falling-block board engine (workspace facade crate).
//!
//! The game rules live in `tetris_board_core`, session control in
//! `tetris_board_session`; this package re-exports both and adds the plain
//! text renderer used by the headless binary.

pub use tetris_board_core as core;
pub use tetris_board_session as session;
pub use tetris_board_types as types;

pub mod text;
