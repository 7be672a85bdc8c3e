//! Heuristic search agents for playing the board game 'Connect 4'
//!
//! Two agents are provided: a depth-limited minimax search with alpha-beta
//! pruning guided by a configurable [`Heuristic`](evaluator::Heuristic), and
//! a Monte Carlo Tree Search driven by random playouts. Both play the middle
//! column on the first move and can short-circuit the early game with an
//! [`OpeningBook`](opening_book::OpeningBook).
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{
//!     board::{Board, Piece},
//!     engine::Engine,
//!     minimax::{Minimax, MinimaxConfig},
//! };
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // player one has three pieces stacked in the first column
//! let board = Board::from_moves("121212")?;
//! let mut minimax = Minimax::new(Piece::PlayerOne, MinimaxConfig::default().with_seed(7));
//!
//! assert_eq!(minimax.get_move(&board, "121212"), Some(0));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod game;

pub mod evaluator;

pub mod opening_book;

pub mod engine;

pub mod minimax;

pub mod mcts;


pub use error::{Error, Result};

/// The default width of the game board in tiles
pub const WIDTH: usize = 7;

/// The default height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure a line of 4 fits and every column is a single digit in a move history
const_assert!(WIDTH >= 4 && WIDTH <= 9);
const_assert!(HEIGHT >= 4);
