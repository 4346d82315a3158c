//! Caro-Rust: play Caro against a minimax engine.
//!
//! ## Usage
//!
//! - `caro-rust` - Play an interactive game with default settings
//! - `caro-rust play --size 10 --depth 3 --side x` - Play an interactive game
//! - `caro-rust demo --seed 42` - Watch the engine play a random opponent
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`)
//! or `--verbose`.

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use caro_rust::board::Player;
use caro_rust::constants::{DEFAULT_DEPTH, DEFAULT_SIZE};
use caro_rust::game::{Game, GameConfig, Outcome};

/// Caro-Rust: a minimax Caro engine
#[derive(Parser)]
#[command(name = "caro-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log search progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game against the engine
    Play {
        /// Board size (NxN)
        #[arg(short, long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
        size: usize,

        /// Engine search depth in plies (clamped to 3..=5)
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,

        /// Your side (X moves first)
        #[arg(long, value_enum, default_value_t = Side::X)]
        side: Side,

        /// Disable ANSI colours
        #[arg(long)]
        plain: bool,
    },
    /// Run the engine against a random opponent
    Demo {
        /// Board size (NxN)
        #[arg(short, long, default_value_t = DEFAULT_SIZE, value_parser = parse_size)]
        size: usize,

        /// Engine search depth in plies
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,

        /// Seed for the random opponent
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Disable ANSI colours
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    X,
    O,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Player::X,
            Side::O => Player::O,
        }
    }
}

fn parse_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("board size must be positive".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Play {
            size,
            depth,
            side,
            plain,
        }) => run_play(size, depth, side.into(), !plain),
        Some(Commands::Demo {
            size,
            depth,
            seed,
            plain,
        }) => run_demo(size, depth, seed, !plain),
        None => run_play(DEFAULT_SIZE, DEFAULT_DEPTH, Player::X, true),
    }
}

fn run_play(size: usize, depth: u32, human: Player, color: bool) -> Result<()> {
    let config = GameConfig {
        color,
        ..GameConfig::new(size, depth, human)
    };
    println!(
        "Caro {size}x{size}: you are {human}{}",
        if human == Player::X { " (moving first)" } else { "" }
    );

    let mut game = Game::new(&config);
    let stdin = io::stdin();
    game.run(stdin.lock(), io::stdout())
        .context("interactive game failed")?;
    Ok(())
}

fn run_demo(size: usize, depth: u32, seed: u64, color: bool) -> Result<()> {
    // The random mover takes X.
    let config = GameConfig {
        size,
        depth,
        human: Player::X,
        color,
    };
    info!(size, depth, seed, "Starting demo");

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut game = Game::new(&config);
    let outcome = game.self_play(&mut rng).context("demo game failed")?;

    let mut stdout = io::stdout();
    game.show(&mut stdout)?;
    let result = match outcome {
        Outcome::Win(p) if p == game.engine() => format!("Engine ({p}) wins"),
        Outcome::Win(p) => format!("Random player ({p}) wins"),
        Outcome::Draw => "Draw".to_string(),
    };
    println!("{result} after {} moves", game.board().stones());
    Ok(())
}
