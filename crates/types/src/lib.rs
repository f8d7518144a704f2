//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the board engine, the session
//! controller and any presentation layer.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible rows**: 20
//! - **Hidden rows**: 2 above the visible field, so pieces can spawn partially
//!   off-screen and fall into view
//! - **Height**: 22 rows in total (indexed 0-21, row 0 is the top hidden row)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds of logical session time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FALL_STEP_MS` | 300 | Each half of a fall cycle (move down, then pause) |
//! | `AUTOPLAY_INTERVAL_MS` | 1500 | Cadence of the random autoplay bot |
//!
//! # Examples
//!
//! ```
//! use tetris_board_types::{ActionKind, Direction, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let shape = ShapeKind::from_index(3).unwrap();
//! assert_eq!(shape, ShapeKind::O);
//!
//! assert_eq!(ActionKind::from_code(2), Some(ActionKind::MoveLeft));
//! assert_eq!(ActionKind::moving(Direction::Right), ActionKind::MoveRight);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Rows shown to the player
pub const VISIBLE_ROWS: u8 = 20;

/// Rows above the visible field where pieces spawn
pub const HIDDEN_ROWS: u8 = 2;

/// Board height in cells, hidden rows included (22 rows)
pub const BOARD_HEIGHT: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Number of shapes in the catalog
pub const SHAPE_COUNT: usize = 7;

/// Minimum number of upcoming shapes held in the lookahead queue before a spawn
pub const LOOKAHEAD_MIN: usize = 2;

/// Duration of each half of the fall cycle.
///
/// A piece spends one half moving into the next row and one half resting there,
/// so it descends one row every `2 * FALL_STEP_MS`.
pub const FALL_STEP_MS: u64 = 300;

/// Cadence of the random autoplay bot
pub const AUTOPLAY_INTERVAL_MS: u64 = 1500;

/// Points per elimination, indexed by the exact number of rows cleared in one lock.
///
/// - 1 row: 5 points
/// - 2 rows: 20 points
/// - 3 rows: 50 points
/// - 4 rows: 100 points
pub const ROW_SCORES: [u32; 5] = [0, 5, 20, 50, 100];

/// The seven shapes, in catalog order.
///
/// The discriminant is the catalog index recorded in replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ShapeKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

impl ShapeKind {
    /// All shapes, in catalog order
    pub const ALL: [ShapeKind; SHAPE_COUNT] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    /// Look up a shape by catalog index
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_board_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_index(0), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_index(6), Some(ShapeKind::Z));
    /// assert_eq!(ShapeKind::from_index(7), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Catalog index in `[0, 7)`
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Parse shape kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "o" => Some(ShapeKind::O),
            "s" => Some(ShapeKind::S),
            "t" => Some(ShapeKind::T),
            "z" => Some(ShapeKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::O => "o",
            ShapeKind::S => "s",
            ShapeKind::T => "t",
            ShapeKind::Z => "z",
        }
    }
}

/// Raised when a persisted shape index lies outside the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidShapeIndex(pub u8);

impl fmt::Display for InvalidShapeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape index {} is outside [0, {})", self.0, SHAPE_COUNT)
    }
}

impl std::error::Error for InvalidShapeIndex {}

impl TryFrom<u8> for ShapeKind {
    type Error = InvalidShapeIndex;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ShapeKind::from_index(value).ok_or(InvalidShapeIndex(value))
    }
}

impl From<ShapeKind> for u8 {
    fn from(value: ShapeKind) -> Self {
        value.index()
    }
}

/// Color tag carried by a shape and by the cells it settles into.
///
/// Only presentation cares about the color; the board logic treats any tagged
/// cell as occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    Red,
    Blue,
    Orange,
    Green,
    DarkGray,
    Brown,
    OrangeRed,
}

impl ColorTag {
    /// Non-zero code used by `u8` grid snapshots (0 means empty)
    pub fn code(self) -> u8 {
        match self {
            ColorTag::Red => 1,
            ColorTag::Blue => 2,
            ColorTag::Orange => 3,
            ColorTag::Green => 4,
            ColorTag::DarkGray => 5,
            ColorTag::Brown => 6,
            ColorTag::OrangeRed => 7,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(ColorTag)`: Settled cell with the color of the piece that left it
pub type Cell = Option<ColorTag>;

/// Horizontal direction for moves and rotations.
///
/// For rotations `Right` is clockwise and `Left` counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta for a one-cell move
    pub fn dx(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Action kinds recorded in the replay log.
///
/// `Rotate` is the counter-clockwise rotation bound to the primary rotate key.
/// The numeric codes are the persisted wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "rotate")]
    Rotate = 1,
    #[serde(rename = "left")]
    MoveLeft = 2,
    #[serde(rename = "right")]
    MoveRight = 3,
    #[serde(rename = "drop")]
    Drop = 4,
    #[serde(rename = "rotate_right")]
    RotateRight = 5,
    #[serde(rename = "soft_drop")]
    SoftDrop = 6,
}

impl ActionKind {
    /// Persisted action code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a persisted action code
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_board_types::ActionKind;
    ///
    /// assert_eq!(ActionKind::from_code(1), Some(ActionKind::Rotate));
    /// assert_eq!(ActionKind::from_code(4), Some(ActionKind::Drop));
    /// assert_eq!(ActionKind::from_code(0), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ActionKind::Rotate),
            2 => Some(ActionKind::MoveLeft),
            3 => Some(ActionKind::MoveRight),
            4 => Some(ActionKind::Drop),
            5 => Some(ActionKind::RotateRight),
            6 => Some(ActionKind::SoftDrop),
            _ => None,
        }
    }

    /// Action recorded for a one-cell move
    pub fn moving(direction: Direction) -> Self {
        match direction {
            Direction::Left => ActionKind::MoveLeft,
            Direction::Right => ActionKind::MoveRight,
        }
    }

    /// Action recorded for a rotation
    pub fn rotating(direction: Direction) -> Self {
        match direction {
            Direction::Left => ActionKind::Rotate,
            Direction::Right => ActionKind::RotateRight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Rotate => "rotate",
            ActionKind::MoveLeft => "left",
            ActionKind::MoveRight => "right",
            ActionKind::Drop => "drop",
            ActionKind::RotateRight => "rotate_right",
            ActionKind::SoftDrop => "soft_drop",
        }
    }
}
