//! Move representation and move generation.
//!
//! Generation runs in two stages:
//! - [`pseudo_legal_moves`] follows each piece's movement rules and ignores
//!   whether the mover's king is left attacked
//! - [`legal_moves`] drops every pseudo-legal move after which some
//!   pseudo-legal reply of the opponent lands on the mover's king
//!
//! Check detection never builds a [`crate::position::Position`]; it applies the
//! move to a copy of the board and asks [`is_attacked`] directly.
//!
//! Pawns have the half-chess promotion rule: a pawn reaching the far rank
//! vanishes, and may take one enemy non-king piece anywhere on the board with
//! it (the *bonus capture*).

use std::fmt;

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::constants::{COLS, ROWS};

/// A move from `from` to `to`, optionally removing the piece on `bonus`.
///
/// `bonus` is only ever set on a pawn move that reaches the far rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub bonus: Option<Square>,
}

impl Move {
    /// The zero-effect probe: applying it only flips the side to move.
    pub const NULL: Move = Move::new(0, 0, 0, 0);

    pub const fn new(from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> Self {
        Self {
            from: (from_row, from_col),
            to: (to_row, to_col),
            bonus: None,
        }
    }

    pub const fn with_bonus(
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
        bonus_row: usize,
        bonus_col: usize,
    ) -> Self {
        Self {
            from: (from_row, from_col),
            to: (to_row, to_col),
            bonus: Some((bonus_row, bonus_col)),
        }
    }

    /// True for moves carrying a bonus capture.
    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.bonus.is_some()
    }

    /// True if every square the move names lies on the board.
    pub fn in_bounds(&self) -> bool {
        let on_board = |(row, col): Square| row < ROWS && col < COLS;
        on_board(self.from) && on_board(self.to) && self.bonus.is_none_or(on_board)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fr, fc) = self.from;
        let (tr, tc) = self.to;
        match self.bonus {
            Some((br, bc)) => write!(f, "({fr}{fc}, {tr}{tc}, {br}{bc})"),
            None => write!(f, "({fr}{fc}, {tr}{tc})"),
        }
    }
}

/// Apply `mv` to a copy of `board`. No legality check is made.
///
/// A move whose origin equals its destination leaves the board unchanged.
/// A pawn landing on its promotion row is removed, together with the piece on
/// the bonus square if one is named.
pub fn apply_move(board: &Board, mv: Move) -> Board {
    let mut next = *board;
    if mv.from == mv.to {
        return next;
    }

    let piece = next.get(mv.from);
    next.set(mv.to, piece);
    next.set(mv.from, None);

    if let Some(p) = piece {
        if p.kind == PieceKind::Pawn && mv.to.0 == p.color.promotion_row() {
            next.set(mv.to, None);
            if let Some(bonus) = mv.bonus {
                next.set(bonus, None);
            }
        }
    }
    next
}

/// Generate the moves of `side` that obey piece movement rules, in board
/// scan order, without self-check filtering.
pub fn pseudo_legal_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    for (sq, piece) in board.pieces() {
        if piece.color == side {
            piece_moves(board, piece, sq, &mut moves);
        }
    }
    moves
}

/// Generate the legal moves of `side`.
pub fn legal_moves(board: &Board, side: Color) -> Vec<Move> {
    pseudo_legal_moves(board, side)
        .into_iter()
        .filter(|&mv| !leaves_king_attacked(board, side, mv))
        .collect()
}

/// Returns true if some pseudo-legal move of `attacker` lands on `target`.
pub fn is_attacked(board: &Board, attacker: Color, target: Square) -> bool {
    pseudo_legal_moves(board, attacker)
        .iter()
        .any(|mv| mv.to == target)
}

/// Returns true if `side`'s king is attacked after `side` plays `mv`.
///
/// A side without a king is never in check.
pub fn leaves_king_attacked(board: &Board, side: Color, mv: Move) -> bool {
    let after = apply_move(board, mv);
    after
        .king_square(side)
        .is_some_and(|king| is_attacked(&after, side.opponent(), king))
}

const KING_STEPS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_JUMPS: [(isize, isize); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

const ROOK_RAYS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BISHOP_RAYS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Dispatch on the piece kind standing on `sq`.
fn piece_moves(board: &Board, piece: Piece, sq: Square, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece.color, sq, out),
        PieceKind::King => step_moves(board, piece.color, sq, &KING_STEPS, out),
        PieceKind::Knight => step_moves(board, piece.color, sq, &KNIGHT_JUMPS, out),
        PieceKind::Rook => slide_moves(board, piece.color, sq, &ROOK_RAYS, out),
        PieceKind::Bishop => slide_moves(board, piece.color, sq, &BISHOP_RAYS, out),
    }
}

/// Offset `sq` by `(dr, dc)`, returning `None` off the board.
#[inline]
fn offset((row, col): Square, (dr, dc): (isize, isize)) -> Option<Square> {
    let r = row as isize + dr;
    let c = col as isize + dc;
    Board::contains(r, c).then_some((r as usize, c as usize))
}

#[inline]
fn is_friendly(board: &Board, sq: Square, color: Color) -> bool {
    board.get(sq).is_some_and(|p| p.color == color)
}

#[inline]
fn is_enemy(board: &Board, sq: Square, color: Color) -> bool {
    board.get(sq).is_some_and(|p| p.color != color)
}

/// Single-step movers (king, knight).
fn step_moves(
    board: &Board,
    color: Color,
    from: Square,
    deltas: &[(isize, isize)],
    out: &mut Vec<Move>,
) {
    for &d in deltas {
        if let Some(to) = offset(from, d) {
            if !is_friendly(board, to, color) {
                out.push(Move::new(from.0, from.1, to.0, to.1));
            }
        }
    }
}

/// Sliders (rook, bishop). A ray stops at the first occupied square, which
/// is included only if it holds an enemy piece.
fn slide_moves(
    board: &Board,
    color: Color,
    from: Square,
    rays: &[(isize, isize)],
    out: &mut Vec<Move>,
) {
    for &ray in rays {
        let mut cur = from;
        while let Some(to) = offset(cur, ray) {
            match board.get(to) {
                None => out.push(Move::new(from.0, from.1, to.0, to.1)),
                Some(p) => {
                    if p.color != color {
                        out.push(Move::new(from.0, from.1, to.0, to.1));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

/// Pawn moves, including bonus-capture variants.
///
/// A pawn one step from the far rank may take any enemy non-king piece along
/// with it. The forward step yields one variant per target and the plain move
/// only when there are no targets. A diagonal capture only pairs with targets
/// off both the destination row and the destination column; the plain
/// capture is kept when no target qualifies.
fn pawn_moves(board: &Board, color: Color, from: Square, out: &mut Vec<Move>) {
    if from.0 == color.promotion_row() {
        return;
    }
    let Some(ahead) = offset(from, (color.forward(), 0)) else {
        return;
    };

    let targets: Vec<Square> = if ahead.0 == color.promotion_row() {
        board
            .pieces()
            .filter(|&(_, p)| p.color != color && p.kind != PieceKind::King)
            .map(|(sq, _)| sq)
            .collect()
    } else {
        Vec::new()
    };

    if board.get(ahead).is_none() {
        push_pawn_move(from, ahead, &targets, out);
    }

    for dc in [-1, 1] {
        let Some(to) = offset(from, (color.forward(), dc)) else {
            continue;
        };
        if !is_enemy(board, to, color) {
            continue;
        }
        let eligible: Vec<Square> = targets
            .iter()
            .copied()
            .filter(|&(r, c)| r != to.0 && c != to.1)
            .collect();
        push_pawn_move(from, to, &eligible, out);
    }
}

fn push_pawn_move(from: Square, to: Square, targets: &[Square], out: &mut Vec<Move>) {
    if targets.is_empty() {
        out.push(Move::new(from.0, from.1, to.0, to.1));
        return;
    }
    for &(br, bc) in targets {
        out.push(Move::with_bonus(from.0, from.1, to.0, to.1, br, bc));
    }
}
