//! Heuristic scoring of non-terminal positions
//!
//! A position is scored from the point of view of one piece as the
//! difference between that piece's score and its opponent's. Each side
//! earns points for every piece it has on the board, weighted towards the
//! middle columns, and for every line of 4 cells (a window) it could still
//! complete. A won position is worth the win value alone.

use crate::board::{Board, Cell, Piece, CONNECT, DIRECTIONS};
use crate::error::{Error, Result};

/// Weights used to score a position
///
/// The window weights must keep the order
/// `win > open_three > three > two > one`, and the win must outweigh
/// everything else a position can score, see [`Heuristic::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heuristic {
    /// A position with four in a line for the scored piece
    pub win: i64,
    /// Multiply the win weight by `depth + 1`, so that wins found nearer
    /// the root of the search (more depth remaining) score higher
    pub scale_win_by_depth: bool,
    /// Three in a line with the cells at both ends empty, scored on
    /// windows of 5 cells on top of the regular window scores
    pub open_three: Option<i64>,
    /// Three pieces and one empty cell in a window
    pub three: i64,
    /// Two pieces and two empty cells in a window
    pub two: i64,
    /// One piece and three empty cells in a window
    pub one: i64,
    /// Penalty for an opponent window of three pieces and one empty cell,
    /// applied only one ply from the search horizon
    pub block_threat: Option<i64>,
    /// Bonus per piece in the centre column
    pub center_column: i64,
    /// Bonus per piece, indexed by the distance of its column from the
    /// nearest edge. Columns further in than the table reach use the last weight.
    pub column_weights: Vec<i64>,
}

impl Heuristic {
    /// Window counts plus an open-three check, with a depth-scaled win
    /// and a block penalty near the horizon
    pub fn weighted() -> Self {
        Self {
            win: 10_000_000_000,
            scale_win_by_depth: true,
            open_three: Some(5_000_000),
            three: 900_000,
            two: 50_000,
            one: 10_000,
            block_threat: Some(2_000_000_000),
            center_column: 120,
            column_weights: vec![40, 70, 120, 200],
        }
    }

    /// Plain window counts and positional weights with a flat win value
    pub fn basic() -> Self {
        Self {
            win: 10_000_000_000,
            scale_win_by_depth: false,
            open_three: None,
            three: 900_000,
            two: 50_000,
            one: 10_000,
            block_threat: None,
            center_column: 120,
            column_weights: vec![40, 70, 120, 200],
        }
    }

    /// Checks that the window weights keep their ordering, and that a win
    /// outweighs the block penalty and the most a default-sized board can
    /// score without a line of four
    pub fn validate(&self) -> Result<()> {
        let mut order = vec![self.win];
        order.extend(self.open_three);
        order.extend([self.three, self.two, self.one, 0]);

        let ordered = order.windows(2).all(|pair| pair[0] > pair[1]);
        let blocks_below_win = self.block_threat.map_or(true, |block| block < self.win);
        let win_dominates = self.win > self.max_unwon_score(&Board::new());

        if ordered && blocks_below_win && win_dominates {
            Ok(())
        } else {
            Err(Error::HeuristicOrdering)
        }
    }

    /// Scores `board` for `piece`, with `depth` plies of search remaining
    pub fn evaluate(&self, board: &Board, piece: Piece, depth: usize) -> i64 {
        if board.check_winner(piece) {
            return self.win_value(depth);
        }
        if board.check_winner(piece.opponent()) {
            return -self.win_value(depth);
        }
        self.score_position(board, piece, depth)
            - self.score_position(board, piece.opponent(), depth)
    }

    /// An upper bound on one side's score for a board of this size with no
    /// line of four, the block penalty aside
    fn max_unwon_score(&self, board: &Board) -> i64 {
        let cells = (board.rows() * board.columns()) as i64;
        let positional = self.column_weights.iter().copied().max().unwrap_or(0) + self.center_column;

        let mut windows = 0;
        for_each_window::<CONNECT>(board, |_| windows += 1);
        let mut open_windows = 0;
        for_each_window::<{ CONNECT + 1 }>(board, |_| open_windows += 1);

        cells * positional.max(0)
            + windows * self.three
            + open_windows * self.open_three.unwrap_or(0)
    }

    fn score_position(&self, board: &Board, piece: Piece, depth: usize) -> i64 {
        let target = piece.cell();
        let mut score = 0;

        // positional weights
        let center = board.columns() / 2;
        for row in 0..board.rows() {
            for column in 0..board.columns() {
                if board.cell(row, column) != target {
                    continue;
                }
                let from_edge = column.min(board.columns() - 1 - column);
                score += self
                    .column_weights
                    .get(from_edge)
                    .or_else(|| self.column_weights.last())
                    .copied()
                    .unwrap_or(0);
                if column == center {
                    score += self.center_column;
                }
            }
        }

        for_each_window::<CONNECT>(board, |window| {
            score += self.score_window(window, piece, depth);
        });

        if let Some(open_three) = self.open_three {
            for_each_window::<{ CONNECT + 1 }>(board, |window| {
                if window[0].is_empty()
                    && window[CONNECT].is_empty()
                    && window[1..CONNECT].iter().all(|&cell| cell == target)
                {
                    score += open_three;
                }
            });
        }

        score
    }

    fn score_window(&self, window: &[Cell; CONNECT], piece: Piece, depth: usize) -> i64 {
        let mine = window.iter().filter(|&&cell| cell == piece.cell()).count();
        let empty = window.iter().filter(|cell| cell.is_empty()).count();
        let theirs = CONNECT - mine - empty;

        // won positions never get here
        match (mine, empty, theirs) {
            (3, 1, _) => self.three,
            (2, 2, _) => self.two,
            (1, 3, _) => self.one,
            (0, 1, 3) if depth == 1 => -self.block_threat.unwrap_or(0),
            _ => 0,
        }
    }

    fn win_value(&self, depth: usize) -> i64 {
        if self.scale_win_by_depth {
            self.win * (depth as i64 + 1)
        } else {
            self.win
        }
    }
}

impl Default for Heuristic {
    fn default() -> Self {
        Self::weighted()
    }
}

/// Calls `f` with every line of `N` consecutive cells on the board
fn for_each_window<const N: usize>(board: &Board, mut f: impl FnMut(&[Cell; N])) {
    for row in 0..board.rows() {
        for column in 0..board.columns() {
            'direction: for &direction in DIRECTIONS.iter() {
                let mut window = [Cell::Empty; N];
                for (step, cell) in window.iter_mut().enumerate() {
                    match board.offset(row, column, direction, step as isize) {
                        Some(found) => *cell = found,
                        None => continue 'direction,
                    }
                }
                f(&window);
            }
        }
    }
}
