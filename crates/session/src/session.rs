//! Game session controller.
//!
//! A [`GameSession`] owns one board and drives it on a logical millisecond
//! clock. The host calls [`advance`](GameSession::advance) with the time that
//! passed; every fall step is split in two halves of `fall_step_ms` each
//! (begin: lock or go in transit, complete: move one row down). User input
//! is applied at the current clock and recorded in the session's
//! [`ActionLog`], which can later be replayed against the same shape sequence.
//!
//! During a replay recorded actions are merged with fall boundaries by time.
//! When both fall on the same millisecond the fall boundary goes first, which
//! is the order a live session observes them in.

use std::io::Read;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::autoplay::{Autoplay, BotPlanner};
use crate::command::Command;
use crate::config::SessionConfig;
use crate::core::{
    ActionCursor, ActionLog, BoardEvent, BoardSnapshot, BoardState, Phase, ShapeFeed, StepOutcome,
};
use crate::error::Result;
use crate::events::{EventBus, GameEvent, SessionMode, SubscriptionId};
use crate::types::{ActionKind, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Not started, or stopped
    Idle,
    Running,
    Paused,
    GameOver,
    /// A replay reached the end of its recording
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallPhase {
    Begin,
    Complete,
}

#[derive(Debug)]
struct Playback {
    actions: ActionCursor,
    ends_at: Option<u64>,
}

#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    board: BoardState,
    log: ActionLog,
    playback: Option<Playback>,
    mode: SessionMode,
    state: SessionState,
    clock_ms: u64,
    next_fall: Option<(u64, FallPhase)>,
    events: EventBus,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
    autoplay: Option<Autoplay>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_queue_capacity.max(1));
        Self {
            config,
            board: BoardState::default(),
            log: ActionLog::new(),
            playback: None,
            mode: SessionMode::Manual,
            state: SessionState::Idle,
            clock_ms: 0,
            next_fall: None,
            events: EventBus::new(),
            cmd_tx,
            cmd_rx,
            autoplay: None,
        }
    }

    // ---- lifecycle ----

    /// Start a manual game, seeded from the config or at random
    pub fn start(&mut self) {
        let seed = self.game_seed();
        self.start_with_seed(seed);
    }

    pub fn start_with_seed(&mut self, seed: u32) {
        self.begin(SessionMode::Manual, ShapeFeed::seeded(seed), None);
    }

    /// Start a game played by a randomly seeded bot
    pub fn start_with_random_autoplay(&mut self) -> Result<()> {
        self.start_autoplay(BotPlanner::from_entropy())
    }

    pub fn start_autoplay(&mut self, planner: BotPlanner) -> Result<()> {
        let interval = Duration::from_millis(self.config.autoplay_interval_ms.max(1));
        let bot = Autoplay::spawn(self.cmd_tx.clone(), interval, planner)?;
        let seed = self.game_seed();
        self.begin(SessionMode::Autoplay, ShapeFeed::seeded(seed), None);
        self.autoplay = Some(bot);
        Ok(())
    }

    /// Play back a recorded game. Manual input is ignored until it ends.
    pub fn start_replay(&mut self, log: ActionLog) {
        let ends_at = log.ended_at();
        let (actions, spawns) = log.into_cursors();
        tracing::info!(
            actions = actions.remaining(),
            spawns = spawns.remaining(),
            ?ends_at,
            "loading replay"
        );
        self.begin(
            SessionMode::Replay,
            ShapeFeed::Recorded(spawns),
            Some(Playback { actions, ends_at }),
        );
    }

    pub fn start_replay_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let log = ActionLog::from_reader(reader)?;
        self.start_replay(log);
        Ok(())
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Paused;
        tracing::info!(clock_ms = self.clock_ms, "session paused");
        self.events.emit(&GameEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.state = SessionState::Running;
        tracing::info!(clock_ms = self.clock_ms, "session resumed");
        self.events.emit(&GameEvent::Resumed);
        true
    }

    /// End the game and clear the board. The action log stays readable
    /// until the next start.
    pub fn stop(&mut self) {
        self.stop_autoplay();
        if self.state == SessionState::Idle {
            return;
        }
        self.log.mark_end(self.clock_ms);
        self.board.clear();
        self.playback = None;
        self.next_fall = None;
        self.state = SessionState::Idle;
        tracing::info!(clock_ms = self.clock_ms, "session stopped");
        self.events.emit(&GameEvent::Stopped);
    }

    // ---- input ----

    pub fn move_piece(&mut self, direction: Direction) -> bool {
        self.accepts_input() && self.perform(ActionKind::moving(direction))
    }

    pub fn rotate(&mut self, direction: Direction) -> bool {
        self.accepts_input() && self.perform(ActionKind::rotating(direction))
    }

    /// Push the piece one row down now and restart the fall cycle
    pub fn soft_drop(&mut self) -> bool {
        self.accepts_input() && self.perform(ActionKind::SoftDrop)
    }

    pub fn hard_drop(&mut self) -> bool {
        self.accepts_input() && self.perform(ActionKind::Drop)
    }

    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Move(direction) => self.move_piece(direction),
            Command::Rotate(direction) => self.rotate(direction),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
        }
    }

    /// Sender half of the command queue, for producers on other threads
    pub fn command_sender(&self) -> mpsc::Sender<Command> {
        self.cmd_tx.clone()
    }

    /// Apply every queued command; returns how many were taken
    pub fn pump_commands(&mut self) -> usize {
        let mut taken = 0;
        while let Ok(command) = self.cmd_rx.try_recv() {
            tracing::trace!(command = command.as_str(), "queued command");
            self.apply(command);
            taken += 1;
        }
        taken
    }

    // ---- time ----

    /// Move the logical clock forward by `elapsed_ms`, running every fall
    /// boundary and replayed action that comes due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.state != SessionState::Running {
            return;
        }
        let target = self.clock_ms.saturating_add(elapsed_ms);
        let ends_at = self
            .playback
            .as_ref()
            .and_then(|p| p.ends_at)
            .filter(|&end| end <= target);
        let horizon = ends_at.unwrap_or(target);

        while self.state == SessionState::Running {
            let fall_at = self.next_fall.map(|(at, _)| at).filter(|&at| at <= horizon);
            let action_at = self
                .playback
                .as_ref()
                .and_then(|p| p.actions.peek_action())
                .map(|record| record.elapsed_time)
                .filter(|&at| at <= horizon);

            match (fall_at, action_at) {
                (Some(fall), Some(action)) if fall <= action => self.run_fall_phase(fall),
                (_, Some(action)) => self.replay_next_action(action),
                (Some(fall), None) => self.run_fall_phase(fall),
                (None, None) => break,
            }
        }

        if self.state == SessionState::Running {
            self.clock_ms = self.clock_ms.max(horizon);
            if ends_at.is_some() {
                self.finish_replay();
            }
        }
    }

    // ---- observation ----

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&GameEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_autoplay_running(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Logical milliseconds since the game started
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.board.snapshot_into(out);
    }

    // ---- internals ----

    fn game_seed(&self) -> u32 {
        self.config.seed.unwrap_or_else(rand::random)
    }

    fn fall_step(&self) -> u64 {
        self.config.fall_step_ms.max(1)
    }

    fn accepts_input(&self) -> bool {
        self.state == SessionState::Running && self.mode != SessionMode::Replay
    }

    fn begin(&mut self, mode: SessionMode, feed: ShapeFeed, playback: Option<Playback>) {
        self.stop_autoplay();
        while self.cmd_rx.try_recv().is_ok() {}

        self.board.reset(feed);
        self.log = ActionLog::new();
        self.playback = playback;
        self.mode = mode;
        self.state = SessionState::Running;
        self.clock_ms = 0;
        self.next_fall = None;

        tracing::info!(?mode, "session started");
        self.events.emit(&GameEvent::Started { mode });

        self.board.spawn();
        self.start_fall_cycle();
        self.flush_board_events();
    }

    fn stop_autoplay(&mut self) {
        if let Some(bot) = self.autoplay.take() {
            bot.stop();
        }
    }

    /// Put a freshly spawned piece in transit at the current clock.
    fn start_fall_cycle(&mut self) {
        self.next_fall = None;
        while self.board.phase() == Phase::Falling {
            match self.board.begin_fall() {
                StepOutcome::Falling => {
                    self.next_fall = Some((self.clock_ms + self.fall_step(), FallPhase::Complete));
                    break;
                }
                StepOutcome::Locked { .. } => continue,
                StepOutcome::Idle | StepOutcome::GameOver => break,
            }
        }
    }

    fn run_fall_phase(&mut self, at: u64) {
        let Some((_, phase)) = self.next_fall.take() else {
            return;
        };
        self.clock_ms = self.clock_ms.max(at);
        let next_at = self.clock_ms + self.fall_step();

        match phase {
            FallPhase::Begin => match self.board.begin_fall() {
                StepOutcome::Falling => self.next_fall = Some((next_at, FallPhase::Complete)),
                StepOutcome::Locked { .. } => self.start_fall_cycle(),
                StepOutcome::Idle | StepOutcome::GameOver => {}
            },
            FallPhase::Complete => {
                self.board.complete_fall();
                if self.board.phase() == Phase::Falling {
                    self.next_fall = Some((next_at, FallPhase::Begin));
                }
            }
        }
        self.flush_board_events();
    }

    fn replay_next_action(&mut self, at: u64) {
        let Some(record) = self.playback.as_mut().and_then(|p| p.actions.next_action()) else {
            return;
        };
        self.clock_ms = self.clock_ms.max(at);
        tracing::trace!(action = record.action.as_str(), at, "replaying action");
        self.perform(record.action);
    }

    /// Record and apply one action at the current clock
    fn perform(&mut self, action: ActionKind) -> bool {
        self.log.record(action, self.clock_ms);

        let accepted = match action {
            ActionKind::MoveLeft => self.shift(Direction::Left),
            ActionKind::MoveRight => self.shift(Direction::Right),
            ActionKind::Rotate => self.turn(Direction::Left),
            ActionKind::RotateRight => self.turn(Direction::Right),
            ActionKind::SoftDrop => match self.board.step_down() {
                StepOutcome::Falling => {
                    self.next_fall = Some((self.clock_ms + self.fall_step(), FallPhase::Begin));
                    true
                }
                StepOutcome::Locked { .. } => {
                    self.start_fall_cycle();
                    true
                }
                StepOutcome::GameOver => true,
                StepOutcome::Idle => false,
            },
            ActionKind::Drop => match self.board.hard_drop() {
                StepOutcome::Locked { .. } => {
                    self.start_fall_cycle();
                    true
                }
                StepOutcome::Falling | StepOutcome::GameOver => true,
                StepOutcome::Idle => false,
            },
        };

        self.flush_board_events();
        accepted
    }

    fn shift(&mut self, direction: Direction) -> bool {
        let moved = self.board.try_move(direction);
        self.events.emit(&if moved {
            GameEvent::Moved(direction)
        } else {
            GameEvent::InvalidMove
        });
        moved
    }

    fn turn(&mut self, direction: Direction) -> bool {
        let rotated = self.board.try_rotate(direction);
        self.events.emit(&if rotated {
            GameEvent::Rotated(direction)
        } else {
            GameEvent::InvalidMove
        });
        rotated
    }

    fn finish_replay(&mut self) {
        self.state = SessionState::Finished;
        self.next_fall = None;
        self.log.mark_end(self.clock_ms);
        tracing::info!(clock_ms = self.clock_ms, "replay finished");
        self.events.emit(&GameEvent::ReplayFinished);
    }

    /// Translate the board outbox into log entries and session events
    fn flush_board_events(&mut self) {
        for event in self.board.take_events() {
            match event {
                BoardEvent::ShapeQueued(kind) => self.log.record_spawn(kind),
                BoardEvent::Spawned(kind) => self.events.emit(&GameEvent::PieceSpawned(kind)),
                BoardEvent::Locked(kind) => self.events.emit(&GameEvent::PieceLocked(kind)),
                BoardEvent::RowsEliminated(rows) => {
                    tracing::debug!(rows, clock_ms = self.clock_ms, "rows eliminated");
                    self.events.emit(&GameEvent::RowsEliminated(rows));
                }
                BoardEvent::GameOver => {
                    self.state = SessionState::GameOver;
                    self.next_fall = None;
                    self.log.mark_end(self.clock_ms);
                    tracing::info!(clock_ms = self.clock_ms, "game over");
                    self.events.emit(&GameEvent::GameOver);
                }
                BoardEvent::FeedExhausted => {
                    if self.mode == SessionMode::Replay {
                        self.finish_replay();
                    } else {
                        tracing::warn!("shape feed exhausted outside of a replay");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn capture(session: &mut GameSession) -> Arc<Mutex<Vec<GameEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |event| sink.lock().unwrap().push(*event));
        seen
    }

    fn active_xy(session: &GameSession) -> (i32, i32) {
        let active = session.board().active().expect("active piece");
        (active.x, active.y)
    }

    fn replay_of(json: &str) -> GameSession {
        let mut session = GameSession::default();
        session.start_replay(ActionLog::from_json(json).unwrap());
        session
    }

    #[test]
    fn test_start_spawns_and_records_queue() {
        let mut session = GameSession::default();
        let seen = capture(&mut session);
        session.start_with_seed(5);

        assert!(session.is_running());
        assert_eq!(session.clock_ms(), 0);
        assert!(session.board().in_transit());
        assert_eq!(session.log().spawns().len(), 2);

        let events = seen.lock().unwrap();
        assert_eq!(
            events[0],
            GameEvent::Started {
                mode: SessionMode::Manual
            }
        );
        assert!(matches!(events[1], GameEvent::PieceSpawned(_)));
    }

    #[test]
    fn test_fall_cycle_halves() {
        let mut session = GameSession::default();
        session.start_with_seed(11);
        let (_, y0) = active_xy(&session);

        session.advance(299);
        assert_eq!(active_xy(&session).1, y0);

        session.advance(1);
        assert_eq!(active_xy(&session).1, y0 + 1);
        assert!(!session.board().in_transit());

        session.advance(300);
        assert!(session.board().in_transit());
        session.advance(300);
        assert_eq!(active_xy(&session).1, y0 + 2);
        assert_eq!(session.clock_ms(), 900);
    }

    #[test]
    fn test_pause_freezes_clock_and_input() {
        let mut session = GameSession::default();
        session.start_with_seed(3);
        session.advance(100);

        assert!(session.pause());
        assert!(!session.pause());
        session.advance(5_000);
        assert_eq!(session.clock_ms(), 100);
        assert!(!session.move_piece(Direction::Left));
        assert!(session.log().actions().is_empty());

        assert!(session.resume());
        session.advance(50);
        assert_eq!(session.clock_ms(), 150);
    }

    #[test]
    fn test_actions_are_stamped_with_clock() {
        let mut session = GameSession::default();
        session.start_with_seed(8);
        session.advance(120);
        session.move_piece(Direction::Left);
        session.advance(400);
        session.rotate(Direction::Right);
        session.hard_drop();

        let stamped: Vec<(u64, ActionKind)> = session
            .log()
            .actions()
            .iter()
            .map(|r| (r.elapsed_time, r.action))
            .collect();
        assert_eq!(
            stamped,
            vec![
                (120, ActionKind::MoveLeft),
                (520, ActionKind::RotateRight),
                (520, ActionKind::Drop),
            ]
        );
    }

    #[test]
    fn test_soft_drop_restarts_cycle() {
        let mut session = GameSession::default();
        session.start_with_seed(21);
        let (_, y0) = active_xy(&session);

        session.advance(100);
        assert!(session.soft_drop());
        assert_eq!(active_xy(&session).1, y0 + 1);
        assert!(!session.board().in_transit());

        // next begin is one full step after the soft drop
        session.advance(299);
        assert!(!session.board().in_transit());
        session.advance(1);
        assert!(session.board().in_transit());
    }

    #[test]
    fn test_commands_through_queue() {
        let mut session = GameSession::default();
        session.start_with_seed(13);
        let (x0, _) = active_xy(&session);

        let tx = session.command_sender();
        tx.try_send(Command::Move(Direction::Left)).unwrap();
        tx.try_send(Command::Pause).unwrap();
        tx.try_send(Command::Move(Direction::Left)).unwrap();

        assert_eq!(session.pump_commands(), 3);
        assert_eq!(active_xy(&session).0, x0 - 1);
        assert_eq!(session.state(), SessionState::Paused);
    }

    #[test]
    fn test_hard_drops_end_in_game_over() {
        let mut session = GameSession::default();
        let seen = capture(&mut session);
        session.start_with_seed(17);

        for _ in 0..100 {
            if session.state() == SessionState::GameOver {
                break;
            }
            session.hard_drop();
        }

        assert_eq!(session.state(), SessionState::GameOver);
        assert!(seen.lock().unwrap().contains(&GameEvent::GameOver));
        assert!(session.log().ended_at().is_some());
        assert!(!session.hard_drop());
        assert_eq!(session.board().lookahead().count(), 0);
    }

    #[test]
    fn test_stop_clears_board_and_keeps_log() {
        let mut session = GameSession::default();
        let seen = capture(&mut session);
        session.start_with_seed(2);
        session.advance(700);
        session.hard_drop();
        session.stop();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.board().grid().occupied_count(), 0);
        assert!(session.board().active().is_none());
        assert_eq!(session.log().ended_at(), Some(700));
        assert_eq!(seen.lock().unwrap().last(), Some(&GameEvent::Stopped));

        seen.lock().unwrap().clear();
        session.stop();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_replay_drop_at_time_zero() {
        let mut session = replay_of(
            r#"{"actions":[{"elapsed_time":0,"action":"drop"}],"spawns":[3,3,3]}"#,
        );
        session.advance(0);

        let grid = session.board().grid();
        for (x, y) in [(4, 20), (5, 20), (4, 21), (5, 21)] {
            assert!(grid.is_occupied(x, y), "({x}, {y})");
        }
        assert_eq!(active_xy(&session), (4, 0));
    }

    #[test]
    fn test_replay_ignores_manual_input() {
        let mut session = replay_of(r#"{"actions":[],"spawns":[0,1,2]}"#);
        assert_eq!(session.mode(), SessionMode::Replay);
        assert!(!session.move_piece(Direction::Left));
        assert!(!session.hard_drop());
        assert!(session.log().actions().is_empty());
    }

    #[test]
    fn test_replay_without_spawns_finishes() {
        let mut session = GameSession::default();
        let seen = capture(&mut session);
        session.start_replay(ActionLog::new());

        assert_eq!(session.state(), SessionState::Finished);
        assert!(seen.lock().unwrap().contains(&GameEvent::ReplayFinished));
    }

    #[test]
    fn test_replay_stops_at_recorded_end() {
        let mut session = replay_of(r#"{"actions":[],"spawns":[4,5,6],"ended_at":1000}"#);
        session.advance(999);
        assert!(session.is_running());
        session.advance(5_000);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.clock_ms(), 1000);
    }

    #[test]
    fn test_replay_reproduces_recording() {
        let mut live = GameSession::default();
        live.start_with_seed(4242);

        let script: &[(u64, Option<ActionKind>)] = &[
            (250, Some(ActionKind::MoveLeft)),
            (300, Some(ActionKind::Rotate)),
            (0, Some(ActionKind::MoveLeft)),
            (600, Some(ActionKind::Drop)),
            (150, Some(ActionKind::MoveRight)),
            (450, Some(ActionKind::SoftDrop)),
            (300, Some(ActionKind::RotateRight)),
            (900, None),
            (10, Some(ActionKind::Drop)),
            (1200, Some(ActionKind::MoveRight)),
            (0, Some(ActionKind::MoveRight)),
            (0, Some(ActionKind::Drop)),
            (777, None),
        ];
        for &(wait, action) in script {
            live.advance(wait);
            match action {
                Some(ActionKind::MoveLeft) => live.move_piece(Direction::Left),
                Some(ActionKind::MoveRight) => live.move_piece(Direction::Right),
                Some(ActionKind::Rotate) => live.rotate(Direction::Left),
                Some(ActionKind::RotateRight) => live.rotate(Direction::Right),
                Some(ActionKind::SoftDrop) => live.soft_drop(),
                Some(ActionKind::Drop) => live.hard_drop(),
                None => false,
            };
        }

        let recorded_cells = live.snapshot().cells;
        let recorded_active = live.board().active().copied();
        let recorded_clock = live.clock_ms();
        live.stop();
        let log = live.log().clone();

        let mut replay = GameSession::default();
        replay.start_replay(log.clone());
        replay.advance(60_000);

        assert_eq!(replay.state(), SessionState::Finished);
        assert_eq!(replay.clock_ms(), recorded_clock);
        assert_eq!(replay.snapshot().cells, recorded_cells);
        assert_eq!(replay.board().active().copied(), recorded_active);
        assert_eq!(replay.log(), &log);
    }
}
