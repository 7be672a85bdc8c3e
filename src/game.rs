use crate::board::{Board, Piece};
use crate::error::{Error, Result};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameState::Playing)
    }

    pub fn winner(&self) -> Option<Piece> {
        match self {
            GameState::PlayerOneWin => Some(Piece::PlayerOne),
            GameState::PlayerTwoWin => Some(Piece::PlayerTwo),
            _ => None,
        }
    }
}

/// A game in progress: the board, whose turn it is and the moves made so far
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Piece,
    history: String,
    state: GameState,
}

impl Game {
    pub fn new() -> Self {
        Self::with_first_player(Piece::PlayerOne)
    }

    pub fn with_first_player(first: Piece) -> Self {
        Self::from_board(Board::new(), first)
    }

    /// Starts a game on an empty `board` of any size
    pub fn from_board(board: Board, first: Piece) -> Self {
        Self {
            board,
            to_move: first,
            history: String::new(),
            state: GameState::Playing,
        }
    }

    /// Plays a 0-indexed column for the player to move
    pub fn play(&mut self, column: usize) -> Result<GameState> {
        if self.state.is_over() {
            return Err(Error::GameOver);
        }
        let piece = self.to_move;
        self.board.drop(column, piece)?;
        self.history.push_str(&(column + 1).to_string());

        self.state = if self.board.check_winner(piece) {
            match piece {
                Piece::PlayerOne => GameState::PlayerOneWin,
                Piece::PlayerTwo => GameState::PlayerTwoWin,
            }
        } else if self.board.is_full() {
            GameState::Draw
        } else {
            GameState::Playing
        };
        self.to_move = piece.opponent();

        Ok(self.state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Piece {
        self.to_move
    }

    /// The moves made so far as 1-indexed column digits
    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn state(&self) -> GameState {
        self.state
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
