//! Commands delivered to a session through its queue.
//!
//! Every input producer (keyboard glue, the autoplay bot, tests) sends the
//! same commands; the session applies them on its owner's thread so the board
//! only ever has one mutator.

use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Rotate(Direction),
    SoftDrop,
    HardDrop,
    Pause,
    Resume,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Move(Direction::Left) => "moveLeft",
            Command::Move(Direction::Right) => "moveRight",
            Command::Rotate(Direction::Left) => "rotateLeft",
            Command::Rotate(Direction::Right) => "rotateRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::Pause => "pause",
            Command::Resume => "resume",
        }
    }
}
