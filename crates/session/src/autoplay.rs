//! Autoplay bot.
//!
//! Bridges a background timer task with the synchronous session: the bot
//! runs on its own tokio runtime and only ever talks to the session through
//! the bounded command queue.

use std::time::Duration;

use arrayvec::ArrayVec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::command::Command;
use crate::error::Result;
use crate::types::Direction;

/// Commands issued in a single bot turn
pub type Burst = ArrayVec<Command, 3>;

/// Decides what the bot presses each turn.
///
/// A turn is an optional hard drop (one chance in five), then a rotation or
/// a move toward a random side (alternating between turns), then one more
/// move toward the same side.
#[derive(Debug, Clone)]
pub struct BotPlanner {
    rng: StdRng,
    rotate_next: bool,
}

impl BotPlanner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rotate_next: false,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            rotate_next: false,
        }
    }

    pub fn next_burst(&mut self) -> Burst {
        let mut burst = Burst::new();

        if self.rng.random_ratio(1, 5) {
            burst.push(Command::HardDrop);
        }

        let direction = if self.rng.random_bool(0.5) {
            Direction::Left
        } else {
            Direction::Right
        };
        if self.rotate_next {
            burst.push(Command::Rotate(direction));
        } else {
            burst.push(Command::Move(direction));
        }
        self.rotate_next = !self.rotate_next;
        burst.push(Command::Move(direction));

        burst
    }
}

/// Running bot instance. Dropping it stops the bot.
pub struct Autoplay {
    rt: Option<Runtime>,
}

impl Autoplay {
    /// Start sending bot bursts to `tx` every `interval`
    pub fn spawn(
        tx: mpsc::Sender<Command>,
        interval: Duration,
        mut planner: BotPlanner,
    ) -> Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tetris-autoplay")
            .enable_time()
            .build()?;

        rt.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                for command in planner.next_burst() {
                    if tx.send(command).await.is_err() {
                        tracing::debug!("command queue closed, autoplay exiting");
                        return;
                    }
                }
            }
        });

        tracing::info!(interval_ms = interval.as_millis() as u64, "autoplay started");
        Ok(Self { rt: Some(rt) })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
            tracing::info!("autoplay stopped");
        }
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Autoplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autoplay")
            .field("running", &self.rt.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_shape() {
        let mut planner = BotPlanner::new(42);
        for turn in 0..200 {
            let burst = planner.next_burst();
            let body = match burst.first() {
                Some(Command::HardDrop) => &burst[1..],
                _ => &burst[..],
            };
            assert_eq!(body.len(), 2, "turn {turn}: {burst:?}");

            let Command::Move(dir) = body[1] else {
                panic!("turn {turn} should end with a move: {burst:?}");
            };
            let expected = if turn % 2 == 1 {
                Command::Rotate(dir)
            } else {
                Command::Move(dir)
            };
            assert_eq!(body[0], expected, "turn {turn}");
        }
    }

    #[test]
    fn test_seeded_planner_is_deterministic() {
        let mut a = BotPlanner::new(7);
        let mut b = BotPlanner::new(7);
        for _ in 0..50 {
            assert_eq!(a.next_burst(), b.next_burst());
        }
    }

    #[test]
    fn test_hard_drops_happen_sometimes() {
        let mut planner = BotPlanner::new(3);
        let drops = (0..500)
            .filter(|_| planner.next_burst().first() == Some(&Command::HardDrop))
            .count();
        assert!(drops > 50 && drops < 200, "drops = {drops}");
    }

    #[test]
    fn test_autoplay_sends_commands() {
        let (tx, mut rx) = mpsc::channel(16);
        let autoplay =
            Autoplay::spawn(tx, Duration::from_millis(5), BotPlanner::new(1)).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut received = 0;
        while received < 4 && std::time::Instant::now() < deadline {
            match rx.try_recv() {
                Ok(_) => received += 1,
                Err(_) => std::thread::sleep(Duration::from_millis(2)),
            }
        }
        autoplay.stop();
        assert!(received >= 4);
    }
}
