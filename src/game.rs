//! Game controller: configuration, turn order and the console loop.
//!
//! X always moves first. One side is played by a human (or, in the demo, a
//! random mover) and the other by the [`Solver`]. After every move the
//! controller checks for a winner, then for a full board.
//!
//! The console loop reads `row col` lines from any [`BufRead`] and writes to
//! any [`Write`], so it runs the same against stdin/stdout and in tests.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{Board, Move, MoveError, Player};
use crate::constants::{DEFAULT_DEPTH, DEFAULT_SIZE, MAX_DEPTH, MIN_DEPTH};
use crate::search::Solver;

/// Errors from driving a [`Game`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("It is not {0}'s turn")]
    NotYourTurn(Player),

    #[error("The game is already over")]
    GameOver,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors from reading a console command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Syntax error: expected 'row col', got '{0}'")]
    Syntax(String),
}

/// A line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Move),
    Quit,
}

/// Parse `row col`, `exit` or `quit`.
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Ok(Command::Quit);
    }

    let syntax = || InputError::Syntax(line.to_string());
    let mut parts = line.split_whitespace();
    let row = parts.next().ok_or_else(syntax)?;
    let col = parts.next().ok_or_else(syntax)?;
    if parts.next().is_some() {
        return Err(syntax());
    }
    let row = row.parse::<usize>().map_err(|_| syntax())?;
    let col = col.parse::<usize>().map_err(|_| syntax())?;
    Ok(Command::Play(Move::new(row, col)))
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// Settings for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Board size (NxN)
    pub size: usize,
    /// Engine search depth in plies
    pub depth: u32,
    /// Side played by the human; the engine takes the other
    pub human: Player,
    /// Print marks with ANSI colours
    pub color: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            depth: DEFAULT_DEPTH,
            human: Player::X,
            color: true,
        }
    }
}

impl GameConfig {
    /// Build a config, clamping `depth` to the interactive range.
    pub fn new(size: usize, depth: u32, human: Player) -> Self {
        let clamped = depth.clamp(MIN_DEPTH, MAX_DEPTH);
        if clamped != depth {
            warn!(
                requested = depth,
                used = clamped,
                "Search depth out of range, clamping"
            );
        }
        Self {
            size,
            depth: clamped,
            human,
            ..Self::default()
        }
    }

    #[inline]
    pub fn engine(&self) -> Player {
        self.human.opponent()
    }
}

/// One game between a human side and the engine.
pub struct Game {
    board: Board,
    solver: Solver,
    human: Player,
    to_move: Player,
    color: bool,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            board: Board::new(config.size),
            solver: Solver::new(config.depth, config.engine()),
            human: config.human,
            to_move: Player::X,
            color: config.color,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn human(&self) -> Player {
        self.human
    }

    #[inline]
    pub fn engine(&self) -> Player {
        self.solver.player()
    }

    #[inline]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// The result, once the game has one.
    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(p) = self.board.winner() {
            return Some(Outcome::Win(p));
        }
        self.board.is_full().then_some(Outcome::Draw)
    }

    fn check_turn(&self, player: Player) -> Result<(), GameError> {
        if self.outcome().is_some() {
            return Err(GameError::GameOver);
        }
        if self.to_move != player {
            return Err(GameError::NotYourTurn(player));
        }
        Ok(())
    }

    /// Play the human side's move.
    pub fn play_human(&mut self, mv: Move) -> Result<(), GameError> {
        self.check_turn(self.human)?;
        self.board.try_move(mv.row, mv.col, self.human)?;
        debug!(player = %self.human, mv = %mv, "Human move");
        self.to_move = self.to_move.opponent();
        Ok(())
    }

    /// Search and play the engine's move. `Ok(None)` means the engine found
    /// nothing to play and concedes the turn.
    pub fn play_engine(&mut self) -> Result<Option<Move>, GameError> {
        self.check_turn(self.engine())?;
        let outcome = self.solver.search(&self.board);
        let Some(mv) = outcome.best_move else {
            return Ok(None);
        };
        self.board.try_move(mv.row, mv.col, self.engine())?;
        self.to_move = self.to_move.opponent();
        Ok(Some(mv))
    }

    /// Play a uniformly random candidate move for the human side.
    pub fn play_random(&mut self, rng: &mut fastrand::Rng) -> Result<Option<Move>, GameError> {
        self.check_turn(self.human)?;
        let moves = self.board.legal_moves();
        if moves.is_empty() {
            return Ok(None);
        }
        let mv = moves[rng.usize(..moves.len())];
        self.play_human(mv)?;
        Ok(Some(mv))
    }

    /// Play the engine against a random mover until the game ends.
    pub fn self_play(&mut self, rng: &mut fastrand::Rng) -> Result<Outcome, GameError> {
        loop {
            if let Some(outcome) = self.outcome() {
                return Ok(outcome);
            }
            let played = if self.to_move == self.human {
                self.play_random(rng)?
            } else {
                self.play_engine()?
            };
            if played.is_none() {
                return Ok(Outcome::Draw);
            }
        }
    }

    /// Print the board using the configured colour mode.
    pub fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        let n = self.board.size();
        writeln!(out, "--- CARO {n}x{n}")?;
        if self.color {
            writeln!(out, "{}", self.board.colored())?;
        } else {
            writeln!(out, "{}", self.board)?;
        }
        Ok(())
    }

    /// Describe an outcome from the human's point of view.
    pub fn describe(&self, outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Win(p) if p == self.human => "You win!",
            Outcome::Win(_) => "Engine wins!",
            Outcome::Draw => "Draw!",
        }
    }

    /// Run the interactive loop.
    ///
    /// Returns the outcome, or `None` if the human quit or input ran out.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<Option<Outcome>> {
        info!(
            size = self.board.size(),
            depth = self.solver.depth(),
            human = %self.human,
            "Starting game"
        );
        let mut lines = input.lines();

        loop {
            self.show(&mut out)?;
            if let Some(outcome) = self.outcome() {
                writeln!(out, "{}", self.describe(outcome))?;
                info!(?outcome, "Game over");
                return Ok(Some(outcome));
            }

            if self.to_move == self.human {
                writeln!(out, "Your move ({})", self.human)?;
                loop {
                    write!(out, "Enter 'row col' (e.g. 5 5): ")?;
                    out.flush()?;
                    let Some(line) = lines.next() else {
                        info!("Input closed");
                        return Ok(None);
                    };
                    let line = line.context("failed to read move")?;
                    match parse_command(&line) {
                        Ok(Command::Quit) => {
                            info!("Player quit");
                            return Ok(None);
                        }
                        Ok(Command::Play(mv)) => match self.play_human(mv) {
                            Ok(()) => break,
                            Err(e) => writeln!(out, "{e}")?,
                        },
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
            } else {
                writeln!(out, "Engine ({}) is thinking...", self.engine())?;
                match self.play_engine()? {
                    Some(mv) => writeln!(out, "Engine plays {mv}")?,
                    None => {
                        writeln!(out, "Engine has no move and concedes.")?;
                        writeln!(out, "{}", self.describe(Outcome::Draw))?;
                        return Ok(Some(Outcome::Draw));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(size: usize, depth: u32, human: Player) -> Game {
        Game::new(&GameConfig {
            size,
            depth,
            human,
            color: false,
        })
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("5 5"),
            Ok(Command::Play(Move::new(5, 5)))
        );
        assert_eq!(
            parse_command("  2   7 \n"),
            Ok(Command::Play(Move::new(2, 7)))
        );
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(parse_command("QUIT"), Ok(Command::Quit));
        assert!(parse_command("5").is_err());
        assert!(parse_command("a b").is_err());
        assert!(parse_command("1 2 3").is_err());
        assert!(parse_command("-1 2").is_err());
        assert!(parse_command("").is_err());
    }

    #[test]
    fn test_config_clamps_depth() {
        assert_eq!(GameConfig::new(10, 1, Player::X).depth, 3);
        assert_eq!(GameConfig::new(10, 9, Player::X).depth, 5);
        assert_eq!(GameConfig::new(10, 4, Player::O).depth, 4);
        assert_eq!(GameConfig::new(10, 4, Player::O).engine(), Player::X);
    }

    #[test]
    fn test_turn_order() {
        let mut game = plain(5, 3, Player::O);
        assert_eq!(game.to_move(), Player::X);
        assert_eq!(
            game.play_human(Move::new(0, 0)),
            Err(GameError::NotYourTurn(Player::O))
        );
        assert_eq!(game.play_engine(), Ok(Some(Move::new(2, 2))));
        assert_eq!(game.to_move(), Player::O);
        assert_eq!(
            game.play_engine(),
            Err(GameError::NotYourTurn(Player::X))
        );
    }

    #[test]
    fn test_illegal_human_move_keeps_turn() {
        let mut game = plain(3, 3, Player::X);
        game.play_human(Move::new(1, 1)).unwrap();
        game.play_engine().unwrap();
        let before = game.board().clone();
        assert!(matches!(
            game.play_human(Move::new(1, 1)),
            Err(GameError::Move(MoveError::Occupied { .. }))
        ));
        assert!(matches!(
            game.play_human(Move::new(3, 0)),
            Err(GameError::Move(MoveError::OutOfBounds { .. }))
        ));
        assert_eq!(game.board(), &before);
        assert_eq!(game.to_move(), Player::X);
    }

    #[test]
    fn test_self_play_finishes() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut game = plain(3, 3, Player::X);
        let outcome = game.self_play(&mut rng).unwrap();
        assert_eq!(game.outcome(), Some(outcome));
        let board = game.board();
        assert!(board.is_full() || board.winner().is_some());
    }

    #[test]
    fn test_run_quit() {
        let mut game = plain(5, 3, Player::X);
        let mut out = Vec::new();
        let result = game.run("exit\n".as_bytes(), &mut out).unwrap();
        assert_eq!(result, None);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--- CARO 5x5"));
        assert!(text.contains("Your move (X)"));
    }

    #[test]
    fn test_run_reports_bad_input() {
        let mut game = plain(5, 3, Player::X);
        let mut out = Vec::new();
        let input = "hello\n9 9\n2 2\n2 2\n";
        let result = game.run(input.as_bytes(), &mut out).unwrap();
        assert_eq!(result, None);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Syntax error"));
        assert!(text.contains("outside the 5x5 board"));
        assert!(text.contains("Engine plays"));
        assert!(text.contains("is not empty"));
    }
}
