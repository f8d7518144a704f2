//! Headless board runner (default binary).
//!
//! `autoplay` lets the bot play against the wall clock and optionally saves
//! the recording; `replay` plays a saved recording back on the logical clock
//! and prints the final board.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tetris_board::session::{GameSession, ScoreKeeper, SessionConfig, SessionState};
use tetris_board::text;

/// tetris-board - deterministic falling-block engine with replays
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Let the bot play and record the game
    Autoplay {
        /// Shape RNG seed (overrides TETRIS_SEED)
        #[arg(short, long)]
        seed: Option<u32>,

        /// Stop after this many milliseconds of play
        #[arg(short, long, default_value_t = 30_000)]
        duration_ms: u64,

        /// Frame length of the host loop
        #[arg(short, long, default_value_t = 16)]
        tick_ms: u64,

        /// Write the recording here as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Play back a recording
    Replay {
        file: PathBuf,

        /// Logical milliseconds per replay step
        #[arg(short, long, default_value_t = 16)]
        tick_ms: u64,

        /// Give up after this much logical time if the recording has no end
        #[arg(long, default_value_t = 3_600_000)]
        max_ms: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.mode {
        Mode::Autoplay {
            seed,
            duration_ms,
            tick_ms,
            out,
        } => autoplay(seed, duration_ms, tick_ms, out),
        Mode::Replay {
            file,
            tick_ms,
            max_ms,
        } => replay(file, tick_ms, max_ms),
    }
}

fn autoplay(seed: Option<u32>, duration_ms: u64, tick_ms: u64, out: Option<PathBuf>) -> Result<()> {
    let mut config = SessionConfig::from_env();
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    let mut session = GameSession::new(config);
    let score = ScoreKeeper::new();
    score.attach(&mut session);

    session
        .start_with_random_autoplay()
        .context("failed to start autoplay")?;

    let tick = Duration::from_millis(tick_ms.max(1));
    let mut last_tick = Instant::now();

    while session.is_running() && session.clock_ms() < duration_ms {
        session.pump_commands();

        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        let remaining = duration_ms - session.clock_ms();
        session.advance((elapsed.as_millis() as u64).min(remaining));

        thread::sleep(tick.saturating_sub(last_tick.elapsed()));
    }

    print!("{}", text::render(&session.snapshot()));
    println!(
        "score: {}  rows: {}  time: {} ms",
        score.score(),
        score.rows(),
        session.clock_ms()
    );

    session.stop();

    if let Some(path) = out {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        session.log().to_writer(BufWriter::new(file))?;
        tracing::info!(
            path = %path.display(),
            actions = session.log().actions().len(),
            spawns = session.log().spawns().len(),
            "recording saved"
        );
    }
    Ok(())
}

fn replay(file: PathBuf, tick_ms: u64, max_ms: u64) -> Result<()> {
    let reader = File::open(&file)
        .with_context(|| format!("failed to open {}", file.display()))?;

    let mut session = GameSession::new(SessionConfig::from_env());
    let score = ScoreKeeper::new();
    score.attach(&mut session);

    session
        .start_replay_from_reader(BufReader::new(reader))
        .with_context(|| format!("failed to load replay {}", file.display()))?;

    let step = tick_ms.max(1);
    while session.is_running() && session.clock_ms() < max_ms {
        session.advance(step);
    }

    print!("{}", text::render(&session.snapshot()));
    let outcome = match session.state() {
        SessionState::GameOver => "game over",
        SessionState::Finished => "finished",
        _ => "timed out",
    };
    println!(
        "score: {}  rows: {}  time: {} ms  ({})",
        score.score(),
        score.rows(),
        session.clock_ms(),
        outcome
    );
    Ok(())
}
