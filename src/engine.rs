//! The interface shared by the move-selection engines

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::board::{Board, Piece};
use crate::opening_book::OpeningBook;

/// A move-selection engine playing one piece
pub trait Engine {
    /// A short name for reports
    fn name(&self) -> &str;

    /// The piece this engine plays
    fn piece(&self) -> Piece;

    /// Chooses a 0-indexed column to play on `board`
    ///
    /// `history` holds the moves made so far in the game as 1-indexed column
    /// digits. Returns `None` only if no column is playable.
    fn get_move(&mut self, board: &Board, history: &str) -> Option<usize>;
}

/// The opening policy applied before searching
///
/// The first move of a game is always the middle column. Up to `book_plies`
/// moves into the game the opening book is consulted with the move history,
/// and a playable recommendation is returned directly.
pub fn opening_move(
    board: &Board,
    history: &str,
    book: Option<&OpeningBook>,
    book_plies: usize,
) -> Option<usize> {
    let ply = board.move_count();
    if ply == 0 {
        return Some(board.columns() / 2);
    }
    if ply > book_plies || history.len() != ply {
        return None;
    }

    let digit = book?.lookup(ply, history)? as usize;
    match digit {
        1..=9 if board.is_valid_move(digit - 1) => {
            debug!("opening book move {} after {}", digit, history);
            Some(digit - 1)
        }
        _ => None,
    }
}

/// A random number generator seeded from `seed`, or from entropy if none is given
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
