//! Pieces and the 8x4 grid they sit on.
//!
//! [`Board`] is a plain `Copy` array of cells. It carries no side to move and
//! no move list; [`crate::position::Position`] wraps it with those.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{BLACK_PROMOTION_ROW, COLS, ROWS, WHITE_PROMOTION_ROW};

/// A cell on the board as `(row, column)`.
pub type Square = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step for this side.
    pub fn forward(self) -> isize {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The far rank, where this side's pawns vanish.
    pub fn promotion_row(self) -> usize {
        match self {
            Color::White => WHITE_PROMOTION_ROW,
            Color::Black => BLACK_PROMOTION_ROW,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Rook,
    Knight,
    King,
    Bishop,
    Pawn,
}

impl PieceKind {
    /// Unsigned point value.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Rook => 5,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Pawn => 1,
            PieceKind::King => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Point value, negative for black.
    pub fn value(self) -> i32 {
        match self.color {
            Color::White => self.kind.value(),
            Color::Black => -self.kind.value(),
        }
    }

    /// Diagram symbol: uppercase for white, lowercase for black.
    pub fn symbol(self) -> char {
        let c = match self.kind {
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::King => 'K',
            PieceKind::Bishop => 'B',
            PieceKind::Pawn => 'P',
        };
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_symbol(c: char) -> Option<Piece> {
        let kind = match c.to_ascii_uppercase() {
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'K' => PieceKind::King,
            'B' => PieceKind::Bishop,
            'P' => PieceKind::Pawn,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

/// Error returned when a board diagram cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {0}: expected a line of the form |a|b|c|d|")]
    Frame(usize),
    #[error("row {row}: expected 4 cells, found {found}")]
    CellCount { row: usize, found: usize },
    #[error("row {row}: unknown piece symbol {symbol:?}")]
    Symbol { row: usize, symbol: char },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }

    /// The starting layout: black on rows 0-1, white on rows 6-7.
    pub fn initial() -> Self {
        use PieceKind::*;

        let back = [Rook, Knight, King, Bishop];
        let mut board = Self::empty();
        for (col, &kind) in back.iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(kind, Color::Black));
            board.cells[1][col] = Some(Piece::new(Pawn, Color::Black));
            board.cells[6][col] = Some(Piece::new(Pawn, Color::White));
            board.cells[7][col] = Some(Piece::new(kind, Color::White));
        }
        board
    }

    /// Returns true if `(row, col)` lies on the board.
    #[inline]
    pub fn contains(row: isize, col: isize) -> bool {
        (0..ROWS as isize).contains(&row) && (0..COLS as isize).contains(&col)
    }

    #[inline]
    pub fn get(&self, (row, col): Square) -> Option<Piece> {
        self.cells[row][col]
    }

    #[inline]
    pub fn set(&mut self, (row, col): Square, piece: Option<Piece>) {
        self.cells[row][col] = piece;
    }

    /// All occupied cells in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|p| ((row, col), p)))
        })
    }

    /// Square of `color`'s king, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, p)| p == Piece::new(PieceKind::King, color))
            .map(|(sq, _)| sq)
    }

    /// White's material advantage; negative if black is up.
    pub fn material_advantage(&self) -> i32 {
        self.pieces().map(|(_, p)| p.value()).sum()
    }

    /// Everything on the board except the two kings.
    pub fn non_king_material(&self) -> Vec<Piece> {
        self.pieces()
            .map(|(_, p)| p)
            .filter(|p| p.kind != PieceKind::King)
            .collect()
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse a diagram with one `|a|b|c|d|` line per row, row 0 first.
    /// Empty cells may be written as `.` or a space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() != ROWS {
            return Err(ParseBoardError::RowCount(lines.len()));
        }

        let mut board = Board::empty();
        for (row, line) in lines.iter().enumerate() {
            let Some(inner) = line.strip_prefix('|').and_then(|l| l.strip_suffix('|')) else {
                return Err(ParseBoardError::Frame(row));
            };
            let cells: Vec<&str> = inner.split('|').collect();
            if cells.len() != COLS {
                return Err(ParseBoardError::CellCount {
                    row,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                let mut chars = cell.chars();
                let symbol = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    (None, _) => return Err(ParseBoardError::Frame(row)),
                    (Some(c), Some(_)) => return Err(ParseBoardError::Symbol { row, symbol: c }),
                };
                if symbol == '.' || symbol == ' ' {
                    continue;
                }
                let piece = Piece::from_symbol(symbol)
                    .ok_or(ParseBoardError::Symbol { row, symbol })?;
                board.cells[row][col] = Some(piece);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            write!(f, "|")?;
            for cell in row {
                let ch = cell.map_or('.', Piece::symbol);
                write!(f, "{ch}|")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
