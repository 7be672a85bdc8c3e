use thiserror::Error;

/// Errors produced by board and game operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid move, column {0} full")]
    ColumnFull(usize),

    #[error("Invalid move, column {column} out of range. Columns must be between 0 and {}", .columns - 1)]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("could not parse '{0}' as a valid move")]
    InvalidMove(char),

    #[error("Invalid board size {rows}x{columns}, need at least 1 row and 1 to 9 columns")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("Invalid move, game is over")]
    GameOver,

    #[error("heuristic weights must order win > open three > three > two > one > 0")]
    HeuristicOrdering,
}

pub type Result<T> = std::result::Result<T, Error>;
