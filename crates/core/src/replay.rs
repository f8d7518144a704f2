//! Action log and replay cursors
//!
//! A session records two append-only sequences: timestamped actions and the
//! order in which shapes entered the lookahead queue. Replaying feeds both back
//! in order against a fresh board, which reproduces the recorded game exactly.
//!
//! Timestamps are logical session milliseconds. They are expected to be
//! non-decreasing but are not validated; playback always follows log order.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ActionKind, ShapeKind};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, unknown action names and out-of-range shape indices
    #[error("invalid replay data: {0}")]
    Format(#[from] serde_json::Error),
}

/// One recorded input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub elapsed_time: u64,
    pub action: ActionKind,
}

/// Append-only action and spawn record of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    actions: Vec<ActionRecord>,
    spawns: Vec<ShapeKind>,
    /// Session time at which recording stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ended_at: Option<u64>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action stamped with `elapsed_time`
    pub fn record(&mut self, action: ActionKind, elapsed_time: u64) {
        if let Some(last) = self.actions.last() {
            if elapsed_time < last.elapsed_time {
                tracing::trace!(
                    elapsed_time,
                    previous = last.elapsed_time,
                    "action recorded out of time order"
                );
            }
        }
        self.actions.push(ActionRecord {
            elapsed_time,
            action,
        });
    }

    /// Append a shape to the spawn sequence
    pub fn record_spawn(&mut self, kind: ShapeKind) {
        self.spawns.push(kind);
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn spawns(&self) -> &[ShapeKind] {
        &self.spawns
    }

    /// Mark the session end; the first mark wins
    pub fn mark_end(&mut self, elapsed_time: u64) {
        if self.ended_at.is_none() {
            self.ended_at = Some(elapsed_time);
        }
    }

    pub fn ended_at(&self) -> Option<u64> {
        self.ended_at
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.spawns.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.spawns.clear();
        self.ended_at = None;
    }

    /// Split into independent playback cursors
    pub fn into_cursors(self) -> (ActionCursor, SpawnCursor) {
        (
            ActionCursor {
                actions: self.actions,
                next: 0,
            },
            SpawnCursor {
                spawns: self.spawns,
                next: 0,
            },
        )
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ReplayError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReplayError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Playback position in the recorded actions
#[derive(Debug, Clone, Default)]
pub struct ActionCursor {
    actions: Vec<ActionRecord>,
    next: usize,
}

impl ActionCursor {
    pub fn has_next_action(&self) -> bool {
        self.next < self.actions.len()
    }

    /// The next action without consuming it
    pub fn peek_action(&self) -> Option<&ActionRecord> {
        self.actions.get(self.next)
    }

    /// Consume the next action; `None` once exhausted
    pub fn next_action(&mut self) -> Option<ActionRecord> {
        let record = self.actions.get(self.next).copied()?;
        self.next += 1;
        Some(record)
    }

    pub fn remaining(&self) -> usize {
        self.actions.len() - self.next
    }
}

/// Playback position in the recorded spawn order
#[derive(Debug, Clone, Default)]
pub struct SpawnCursor {
    spawns: Vec<ShapeKind>,
    next: usize,
}

impl SpawnCursor {
    pub fn has_next_spawn(&self) -> bool {
        self.next < self.spawns.len()
    }

    /// Consume the next shape; `None` once exhausted
    pub fn next_spawn(&mut self) -> Option<ShapeKind> {
        let kind = self.spawns.get(self.next).copied()?;
        self.next += 1;
        Some(kind)
    }

    pub fn remaining(&self) -> usize {
        self.spawns.len() - self.next
    }
}
