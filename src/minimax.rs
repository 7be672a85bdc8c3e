//! A depth-limited minimax agent with alpha-beta pruning

use log::{debug, warn};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::board::{move_order, Board, Piece};
use crate::engine::{opening_move, seeded_rng, Engine};
use crate::evaluator::Heuristic;
use crate::opening_book::{OpeningBook, DEFAULT_BOOK_PLIES};

/// Settings for a [`Minimax`] agent
#[derive(Clone, Debug)]
pub struct MinimaxConfig {
    /// Plies searched from the root, at least 1
    pub depth: usize,
    pub heuristic: Heuristic,
    /// The opening book is consulted while at most this many moves have been played
    pub book_plies: usize,
    /// Seed for breaking ties between equally scored moves
    pub seed: Option<u64>,
}

impl MinimaxConfig {
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_book_plies(mut self, book_plies: usize) -> Self {
        self.book_plies = book_plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            heuristic: Heuristic::default(),
            book_plies: DEFAULT_BOOK_PLIES,
            seed: None,
        }
    }
}

/// An agent choosing moves by heuristic game tree search
///
/// # Notes
/// Positions at the search horizon, and won or drawn positions, are scored
/// by the configured [`Heuristic`] from the point of view of the agent's
/// piece. The agent maximizes that score on its own turns and the opponent
/// minimizes it.
pub struct Minimax {
    piece: Piece,
    config: MinimaxConfig,
    opening_book: Option<OpeningBook>,
    rng: StdRng,

    /// The number of nodes searched by this `Minimax` so far (for diagnostics only)
    pub node_count: usize,
}

impl Minimax {
    /// Creates a new `Minimax` agent playing `piece`
    pub fn new(piece: Piece, config: MinimaxConfig) -> Self {
        if let Err(err) = config.heuristic.validate() {
            warn!("{}, move choices may be poor", err);
        }
        Self {
            piece,
            rng: seeded_rng(config.seed),
            config,
            opening_book: None,
            node_count: 0,
        }
    }

    /// Adds an opening book to an existing `Minimax`
    pub fn with_opening_book(mut self, opening_book: OpeningBook) -> Self {
        self.opening_book = Some(opening_book);
        self
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    /// Performs game tree search
    ///
    /// Moves are played on `board` and taken back before returning, so the
    /// board is left as it was given. Returns the minimax value of the
    /// position within the window `alpha..beta`: a value at or below
    /// `alpha` is an upper bound and a value at or above `beta` a lower bound.
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
    ) -> i64 {
        self.node_count += 1;

        if depth == 0 || board.is_terminal() {
            return self.config.heuristic.evaluate(board, self.piece, depth);
        }

        let piece = if maximizing {
            self.piece
        } else {
            self.piece.opponent()
        };

        let mut best = if maximizing { i64::MIN } else { i64::MAX };
        for column in move_order(board.columns()) {
            if !board.is_valid_move(column) {
                continue;
            }
            let (row, _) = board
                .drop(column, piece)
                .expect("search played a column the board rejected");
            let value = self.search(board, depth - 1, alpha, beta, !maximizing);
            board.undo(row, column);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }
            // neither player will let the game reach this branch
            if beta <= alpha {
                break;
            }
        }
        best
    }

    /// Scores every legal column of `board` for the agent's piece
    ///
    /// Each column is searched with a full window, so every value is exact.
    pub fn score_moves(&mut self, board: &Board) -> Vec<(usize, i64)> {
        let mut board = board.clone();
        let mut scores = Vec::new();
        for column in board.legal_moves() {
            let value = self.score_column(&mut board, column, i64::MIN);
            scores.push((column, value));
        }
        scores
    }

    /// Plays `column` for the agent and searches the reply one ply shallower
    fn score_column(&mut self, board: &mut Board, column: usize, alpha: i64) -> i64 {
        let depth = self.config.depth.max(1);
        let (row, _) = board
            .drop(column, self.piece)
            .expect("root search played a column the board rejected");
        let value = self.search(board, depth - 1, alpha, i64::MAX, false);
        board.undo(row, column);
        value
    }

    /// Picks one of the highest scored columns at random
    pub fn pick_best(&mut self, scores: &[(usize, i64)]) -> Option<usize> {
        let best_value = scores.iter().map(|&(_, value)| value).max()?;
        let best_moves: Vec<usize> = scores
            .iter()
            .filter(|&&(_, value)| value == best_value)
            .map(|&(column, _)| column)
            .collect();
        best_moves.choose(&mut self.rng).copied()
    }

    /// Searches every legal column and picks one of the best at random
    fn top_level_search(&mut self, board: &Board) -> Option<usize> {
        let mut board = board.clone();
        let start_nodes = self.node_count;

        let mut scores = Vec::new();
        let mut best_value = i64::MIN;
        for column in move_order(board.columns()) {
            if !board.is_valid_move(column) {
                continue;
            }
            // columns tying the best so far must get an exact value
            let value = self.score_column(&mut board, column, best_value.saturating_sub(1));
            debug!("column {} scored {}", column + 1, value);
            best_value = best_value.max(value);
            scores.push((column, value));
        }

        debug!(
            "searched {} nodes, best value {}",
            self.node_count - start_nodes,
            best_value
        );
        self.pick_best(&scores)
    }
}

impl Engine for Minimax {
    fn name(&self) -> &str {
        "minimax"
    }

    fn piece(&self) -> Piece {
        self.piece
    }

    fn get_move(&mut self, board: &Board, history: &str) -> Option<usize> {
        if board.legal_moves().is_empty() {
            return None;
        }
        if let Some(column) = opening_move(
            board,
            history,
            self.opening_book.as_ref(),
            self.config.book_plies,
        ) {
            return Some(column);
        }
        self.top_level_search(board)
    }
}
