use std::fmt;

use crate::error::{Error, Result};
use crate::{HEIGHT, WIDTH};

/// The number of aligned pieces needed to win
pub const CONNECT: usize = 4;

/// Line orientations as (row step, column step): horizontal, vertical and both diagonals
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// One of the two players
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Piece {
    PlayerOne,
    PlayerTwo,
}

impl Piece {
    pub fn opponent(self) -> Self {
        match self {
            Piece::PlayerOne => Piece::PlayerTwo,
            Piece::PlayerTwo => Piece::PlayerOne,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Piece::PlayerOne => Cell::PlayerOne,
            Piece::PlayerTwo => Cell::PlayerTwo,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn piece(&self) -> Option<Piece> {
        match self {
            Cell::PlayerOne => Some(Piece::PlayerOne),
            Cell::PlayerTwo => Some(Piece::PlayerTwo),
            Cell::Empty => None,
        }
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        piece.cell()
    }
}

/// Returns the columns of a board ordered from the middle outwards, as
/// the middle columns are often better moves
pub fn move_order(columns: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..columns).collect();
    // distance from the middle, doubled to stay integral on even widths
    order.sort_by_key(|&column| (2 * column as isize - (columns as isize - 1)).abs());
    order
}

/// A Connect 4 grid
///
/// Rows are counted from the bottom of the board, so the first piece dropped
/// into a column lands on row 0. A `Board` does not know whose turn it is:
/// every move names the piece being played, and callers that need turn order
/// track it themselves (see [`Game`](crate::game::Game)).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>, // cells are stored left-to-right, bottom-to-top
    heights: Vec<usize>,
    num_moves: usize,
}

impl Board {
    /// Creates an empty board of the default 6x7 size
    pub fn new() -> Self {
        Self {
            rows: HEIGHT,
            columns: WIDTH,
            cells: vec![Cell::Empty; WIDTH * HEIGHT],
            heights: vec![0; WIDTH],
            num_moves: 0,
        }
    }

    /// Creates an empty board with the given dimensions
    ///
    /// Columns are limited to 9 so that every move is a single digit in a move history.
    pub fn with_size(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 || columns > 9 {
            return Err(Error::InvalidDimensions { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
            num_moves: 0,
        })
    }

    /// Replays a history of 1-indexed column digits, player one moving first
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut piece = Piece::PlayerOne;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=9) => {
                    board.drop(column - 1, piece)?;
                    piece = piece.opponent();
                }
                _ => return Err(Error::InvalidMove(column_char)),
            }
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The contents of a cell, `Cell::Empty` if out of bounds
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        if row < self.rows && column < self.columns {
            self.cells[column + self.columns * row]
        } else {
            Cell::Empty
        }
    }

    /// All cells, left-to-right and bottom-to-top
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell `steps` positions along `direction` from (row, column), if on the board
    pub(crate) fn offset(
        &self,
        row: usize,
        column: usize,
        direction: (isize, isize),
        steps: isize,
    ) -> Option<Cell> {
        let y = row as isize + direction.0 * steps;
        let x = column as isize + direction.1 * steps;
        if y < 0 || x < 0 || y >= self.rows as isize || x >= self.columns as isize {
            return None;
        }
        Some(self.cells[x as usize + self.columns * y as usize])
    }

    /// Places `piece` on the lowest empty cell of `column`, returning its (row, column)
    pub fn drop(&mut self, column: usize, piece: Piece) -> Result<(usize, usize)> {
        if column >= self.columns {
            return Err(Error::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }
        if !self.is_valid_move(column) {
            return Err(Error::ColumnFull(column));
        }
        let row = self.heights[column];
        self.cells[column + self.columns * row] = piece.cell();
        self.heights[column] += 1;
        self.num_moves += 1;
        Ok((row, column))
    }

    /// Clears the cell at (row, column)
    ///
    /// Only the topmost piece of a column may be removed, so a `drop` followed by
    /// an `undo` of the returned position restores the board exactly.
    pub fn undo(&mut self, row: usize, column: usize) {
        debug_assert!(
            self.heights[column] == row + 1,
            "undo of ({}, {}) is not the top of the column",
            row,
            column
        );
        let cell = &mut self.cells[column + self.columns * row];
        if !cell.is_empty() {
            *cell = Cell::Empty;
            self.num_moves -= 1;
        }
        self.heights[column] = row;
    }

    /// The number of pieces in `column`
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// True iff `column` is on the board and its topmost cell is empty
    pub fn is_valid_move(&self, column: usize) -> bool {
        column < self.columns && self.heights[column] < self.rows
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.columns)
            .filter(|&column| self.is_valid_move(column))
            .collect()
    }

    /// True if `piece` has four in a line anywhere on the board
    pub fn check_winner(&self, piece: Piece) -> bool {
        let target = piece.cell();
        for row in 0..self.rows {
            for column in 0..self.columns {
                if self.cells[column + self.columns * row] != target {
                    continue;
                }
                for &direction in DIRECTIONS.iter() {
                    if (1..CONNECT as isize)
                        .all(|step| self.offset(row, column, direction, step) == Some(target))
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn winner(&self) -> Option<Piece> {
        [Piece::PlayerOne, Piece::PlayerTwo]
            .iter()
            .copied()
            .find(|&piece| self.check_winner(piece))
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == self.rows * self.columns
    }

    /// True if either piece has won or no legal moves remain
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// The number of filled cells
    pub fn move_count(&self) -> usize {
        self.num_moves
    }

    /// The piece to move assuming strict alternation with player one first
    pub fn next_piece(&self) -> Piece {
        if self.num_moves % 2 == 0 {
            Piece::PlayerOne
        } else {
            Piece::PlayerTwo
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            for column in 0..self.columns {
                let symbol = match self.cell(row, column) {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        let labels: String = (1..=self.columns).map(|x| x.to_string()).collect();
        write!(f, "{}", labels)
    }
}
