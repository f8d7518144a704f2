//! Score tracking driven by session events

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::core::row_score;
use crate::events::{GameEvent, SubscriptionId};
use crate::GameSession;

/// Shared score counter.
///
/// Clones share the same counters, so one handle can be moved into a session
/// listener while another is read by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct ScoreKeeper {
    score: Arc<AtomicU32>,
    rows: Arc<AtomicU32>,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score.load(Ordering::Relaxed)
    }

    /// Total rows eliminated since the last reset
    pub fn rows(&self) -> u32 {
        self.rows.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.score.store(0, Ordering::Relaxed);
        self.rows.store(0, Ordering::Relaxed);
    }

    pub fn observe(&self, event: &GameEvent) {
        match *event {
            GameEvent::Started { .. } | GameEvent::Stopped => self.reset(),
            GameEvent::RowsEliminated(rows) => {
                self.score.fetch_add(row_score(rows), Ordering::Relaxed);
                self.rows.fetch_add(rows as u32, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Subscribe a handle of this keeper to `session`
    pub fn attach(&self, session: &mut GameSession) -> SubscriptionId {
        let keeper = self.clone();
        session.subscribe(move |event| keeper.observe(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SessionMode;

    #[test]
    fn test_scores_by_row_count() {
        let keeper = ScoreKeeper::new();
        keeper.observe(&GameEvent::RowsEliminated(1));
        assert_eq!(keeper.score(), 5);
        keeper.observe(&GameEvent::RowsEliminated(2));
        keeper.observe(&GameEvent::RowsEliminated(3));
        keeper.observe(&GameEvent::RowsEliminated(4));
        assert_eq!(keeper.score(), 5 + 20 + 50 + 100);
        assert_eq!(keeper.rows(), 10);
    }

    #[test]
    fn test_resets_on_lifecycle() {
        let keeper = ScoreKeeper::new();
        let shared = keeper.clone();

        keeper.observe(&GameEvent::RowsEliminated(4));
        assert_eq!(shared.score(), 100);

        keeper.observe(&GameEvent::Stopped);
        assert_eq!(shared.score(), 0);

        keeper.observe(&GameEvent::RowsEliminated(1));
        keeper.observe(&GameEvent::Started {
            mode: SessionMode::Manual,
        });
        assert_eq!(shared.score(), 0);
        assert_eq!(shared.rows(), 0);
    }

    #[test]
    fn test_ignores_other_events() {
        let keeper = ScoreKeeper::new();
        keeper.observe(&GameEvent::GameOver);
        keeper.observe(&GameEvent::InvalidMove);
        assert_eq!(keeper.score(), 0);
    }
}
