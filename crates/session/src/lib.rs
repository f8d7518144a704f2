//! Game session control on top of the board engine
//!
//! [`GameSession`] drives a [`BoardState`](tetris_board_core::BoardState) on a
//! logical clock, records every action for replay, and fans out
//! [`GameEvent`]s to listeners. Input arrives either through direct calls or
//! through the bounded command queue, which is also how the autoplay bot
//! plays.
//!
//! ```
//! use tetris_board_session::{GameSession, ScoreKeeper, SessionConfig};
//! use tetris_board_session::types::Direction;
//!
//! let mut session = GameSession::new(SessionConfig::default().with_seed(Some(7)));
//! let score = ScoreKeeper::new();
//! score.attach(&mut session);
//!
//! session.start();
//! session.move_piece(Direction::Left);
//! session.advance(900);
//! session.hard_drop();
//!
//! assert_eq!(session.board().grid().occupied_count(), 4);
//! assert_eq!(score.score(), 0);
//! ```

pub mod autoplay;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod score;
pub mod session;

pub use tetris_board_core as core;
pub use tetris_board_types as types;

pub use autoplay::{Autoplay, BotPlanner};
pub use command::Command;
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use events::{EventBus, GameEvent, SessionMode, SubscriptionId};
pub use score::ScoreKeeper;
pub use session::{GameSession, SessionState};
