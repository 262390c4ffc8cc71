//! A perfect agent for playing or analysing the game of tic-tac-toe
//!
//! This agent searches the full game tree with alpha-beta pruning to find
//! the mathematically optimal move for any position.
//!
//! # Basic Usage
//!
//! ```
//! use tictactoe_ai::{solver::Solver, board::Board};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut solver = Solver::new(Board::from_moves("1425")?);
//! let (score, best_move) = solver.solve();
//!
//! assert!((score, best_move) == (10, Some(2)));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod transposition_table;

pub mod board;

pub mod opening_book;

pub mod solver;

mod test;

pub use board::{Board, Cell, GameState, Player};
pub use opening_book::OpeningBook;
pub use solver::Solver;
pub use transposition_table::TranspositionTable;

/// The width and height of the game board in cells
pub const SIDE: usize = 3;

/// The total number of cells on the board
pub const CELLS: usize = SIDE * SIDE;

/// Base value for win scores; a win reached after `d` plies of search
/// scores `WIN_BASE - d`, so faster wins outrank slower wins and any win
/// outranks a draw
pub const WIN_BASE: i32 = CELLS as i32 + 1;

// ensure win scores stay ahead of every depth adjustment
const_assert!(WIN_BASE > CELLS as i32);
// ensure the base-3 position code fits in a u32
const_assert!(CELLS <= 16);
