use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_board::core::{BoardState, Grid};
use tetris_board::session::{BotPlanner, GameSession};
use tetris_board::types::{ColorTag, Direction, BOARD_WIDTH};

fn bench_advance(c: &mut Criterion) {
    let mut session = GameSession::default();
    session.start_with_seed(12345);

    c.bench_function("session_advance_16ms", |b| {
        b.iter(|| {
            if !session.is_running() {
                session.start_with_seed(12345);
            }
            session.advance(black_box(16));
        })
    });
}

fn bench_row_clear(c: &mut Criterion) {
    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut grid = Grid::new();
            for y in 18..22 {
                for x in 0..BOARD_WIDTH as i32 {
                    grid.set(x, y, Some(ColorTag::Red));
                }
            }
            grid.clear_full_rows()
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut board = BoardState::with_seed(12345);
    board.spawn();

    c.bench_function("try_move", |b| {
        b.iter(|| {
            board.try_move(black_box(Direction::Right));
            board.try_move(black_box(Direction::Left))
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut board = BoardState::with_seed(12345);
    board.spawn();

    c.bench_function("try_rotate", |b| {
        b.iter(|| board.try_rotate(black_box(Direction::Right)))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut board = BoardState::with_seed(12345);
    board.spawn();
    board.hard_drop();
    let mut out = board.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| board.snapshot_into(black_box(&mut out)))
    });
}

fn bench_replay(c: &mut Criterion) {
    let mut live = GameSession::default();
    live.start_with_seed(777);
    let mut planner = BotPlanner::new(1);
    for _ in 0..200 {
        for command in planner.next_burst() {
            live.apply(command);
        }
        live.advance(500);
    }
    live.stop();
    let log = live.log().clone();

    c.bench_function("replay_recorded_game", |b| {
        b.iter(|| {
            let mut replay = GameSession::default();
            replay.start_replay(log.clone());
            replay.advance(u64::MAX / 2);
            replay.clock_ms()
        })
    });
}

criterion_group!(
    benches,
    bench_advance,
    bench_row_clear,
    bench_try_move,
    bench_try_rotate,
    bench_snapshot,
    bench_replay
);
criterion_main!(benches);
