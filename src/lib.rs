//! Caro-Rust: a minimax Caro (k-in-a-row) engine.
//!
//! This crate provides a Minimax search with alpha-beta pruning for Caro,
//! the Tic-Tac-Toe/Gomoku family played on an NxN board. Boards smaller than
//! 5x5 play three in a row; larger boards play five.
//!
//! ## Modules
//!
//! - [`constants`] - Scores, defaults and rendering constants
//! - [`board`] - Board state, move generation, win detection, evaluation
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`game`] - Game controller and console loop
//!
//! ## Example
//!
//! ```
//! use caro_rust::board::{Board, Move, Player};
//! use caro_rust::search::best_move;
//!
//! let mut board = Board::new(3);
//! board.apply_move(0, 0, Player::X);
//! board.apply_move(0, 1, Player::X);
//! board.apply_move(1, 1, Player::O);
//!
//! // X completes the top row
//! assert_eq!(best_move(&board, 3, Player::X), Some(Move::new(0, 2)));
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod search;
