//! Half-chess position representation and move execution.
//!
//! A [`Position`] is an immutable value: the board, the side to move, and the
//! legal moves computed when it was built. Playing a move never mutates a
//! position; [`Position::make_move`] returns a new one, so search nodes can
//! hold their positions for as long as the tree lives.
//!
//! Positions built by [`Position::lookahead`] are hypothetical. They skip
//! move validation and cache pseudo-legal moves only (`ignore_pins`).

use std::fmt;

use thiserror::Error;

use crate::board::{Board, Color, PieceKind, Square};
use crate::movegen::{Move, apply_move, is_attacked, legal_moves, pseudo_legal_moves};

/// Error returned by [`Position::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal move {mv}")]
pub struct IllegalMove {
    pub mv: Move,
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Draw,
    WhiteWins,
    BlackWins,
}

impl Outcome {
    /// Numeric result: 0 for a draw, +1 for a white win, -1 for a black win.
    pub fn value(self) -> f64 {
        match self {
            Outcome::Draw => 0.0,
            Outcome::WhiteWins => 1.0,
            Outcome::BlackWins => -1.0,
        }
    }

    /// The winning side, if any.
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Draw => None,
            Outcome::WhiteWins => Some(Color::White),
            Outcome::BlackWins => Some(Color::Black),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Draw => write!(f, "draw"),
            Outcome::WhiteWins => write!(f, "white wins"),
            Outcome::BlackWins => write!(f, "black wins"),
        }
    }
}

/// A half-chess position (board state plus side to move).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    ignore_pins: bool,
    legal_moves: Vec<Move>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The starting position, white to move.
    pub fn new() -> Self {
        Self::from_board(Board::initial(), Color::White)
    }

    /// Build a position from an arbitrary board.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self::build(board, side_to_move, false)
    }

    fn build(board: Board, side_to_move: Color, ignore_pins: bool) -> Self {
        let legal_moves = if ignore_pins {
            pseudo_legal_moves(&board, side_to_move)
        } else {
            legal_moves(&board, side_to_move)
        };
        Self {
            board,
            side_to_move,
            ignore_pins,
            legal_moves,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    /// True for hypothetical positions whose move list is pseudo-legal.
    #[inline]
    pub fn ignore_pins(&self) -> bool {
        self.ignore_pins
    }

    /// The cached move list, in generation order.
    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves.contains(mv)
    }

    /// Play `mv` and return the resulting position.
    ///
    /// # Errors
    /// Returns [`IllegalMove`] if the cached move list is non-empty and does
    /// not contain `mv`, or if `mv` names a square off the board.
    pub fn make_move(&self, mv: Move) -> Result<Position, IllegalMove> {
        if !mv.in_bounds() || (!self.legal_moves.is_empty() && !self.is_legal(&mv)) {
            return Err(IllegalMove { mv });
        }
        Ok(self.successor(mv))
    }

    /// The position after `mv`, which must come from [`Self::legal_moves`].
    pub(crate) fn successor(&self, mv: Move) -> Position {
        Self::build(
            apply_move(&self.board, mv),
            self.side_to_move.opponent(),
            false,
        )
    }

    /// Play `mv` without validation, producing a hypothetical position that
    /// caches pseudo-legal moves only.
    ///
    /// `mv` must lie on the board.
    pub fn lookahead(&self, mv: Move) -> Position {
        Self::build(
            apply_move(&self.board, mv),
            self.side_to_move.opponent(),
            true,
        )
    }

    /// Returns true if the opponent of the side to move has a pseudo-legal
    /// move landing on `target`.
    pub fn opponent_attacks(&self, target: Square) -> bool {
        is_attacked(&self.board, self.side_to_move.opponent(), target)
    }

    /// Returns true if the side to move has its king attacked.
    pub fn in_check(&self) -> bool {
        self.board
            .king_square(self.side_to_move)
            .is_some_and(|king| self.opponent_attacks(king))
    }

    /// White's material advantage; negative if black is up.
    pub fn material_advantage(&self) -> i32 {
        self.board.material_advantage()
    }

    /// Returns true if the only piece besides the kings is a single knight
    /// or bishop. Bare kings play on.
    pub fn insufficient_material(&self) -> bool {
        match self.board.non_king_material().as_slice() {
            [only] => matches!(only.kind, PieceKind::Knight | PieceKind::Bishop),
            _ => false,
        }
    }

    /// Result of the game, or `None` while it continues.
    ///
    /// - insufficient material is a draw even while moves remain
    /// - no moves and not in check is stalemate
    /// - no moves and in check is a win for the side not to move
    pub fn result(&self) -> Option<Outcome> {
        if !self.legal_moves.is_empty() {
            return self.insufficient_material().then_some(Outcome::Draw);
        }
        if !self.in_check() {
            return Some(Outcome::Draw);
        }
        Some(match self.side_to_move {
            Color::White => Outcome::BlackWins,
            Color::Black => Outcome::WhiteWins,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
