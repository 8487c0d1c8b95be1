//! Integer and tensor formats shared with a learned evaluator.
//!
//! ## Actions
//!
//! Every move maps to a code in `[0, NUM_ACTIONS)`:
//! - plain moves (no bonus capture) use
//!   `((to_col * 8 + to_row) * 4 + from_col) * 8 + from_row`, below
//!   [`PROMOTION_ACTION_OFFSET`]
//! - promotions with a bonus capture store the bonus square, the origin
//!   column, the column shift (`to_col - from_col + 1`) and the pawn color
//!   (`from_row % 2`) above the offset; the origin and destination rows are
//!   implied by the color
//!
//! ## Boards
//!
//! A position encodes as an `[8][4][11]` tensor: one-hot planes for
//! `R N B P K r n b p k`, then a plane that is all ones when white is to move.

use crate::board::{Board, Color, Piece, PieceKind};
use crate::constants::{
    BLACK_PROMOTION_ROW, COLS, NUM_ACTIONS, NUM_PLANES, PROMOTION_ACTION_OFFSET, ROWS,
    SIDE_TO_MOVE_PLANE, WHITE_PROMOTION_ROW,
};
use crate::evaluator::Policy;
use crate::movegen::Move;
use crate::position::Position;

/// Board tensor indexed as `[row][col][plane]`.
pub type BoardTensor = [[[f32; NUM_PLANES]; COLS]; ROWS];

/// Piece order of the one-hot planes.
const PLANE_KINDS: [PieceKind; 5] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Pawn,
    PieceKind::King,
];

fn plane_of(piece: Piece) -> usize {
    let kind = PLANE_KINDS
        .iter()
        .position(|&k| k == piece.kind)
        .unwrap_or_default();
    match piece.color {
        Color::White => kind,
        Color::Black => kind + PLANE_KINDS.len(),
    }
}

fn piece_of_plane(plane: usize) -> Option<Piece> {
    let n = PLANE_KINDS.len();
    match plane {
        p if p < n => Some(Piece::new(PLANE_KINDS[p], Color::White)),
        p if p < 2 * n => Some(Piece::new(PLANE_KINDS[p - n], Color::Black)),
        _ => None,
    }
}

/// Encode a move as an action code.
///
/// Returns `None` for moves the action space cannot express: squares off the
/// board, or a bonus-capture move whose column changes by more than one.
pub fn encode_action(mv: &Move) -> Option<usize> {
    if !mv.in_bounds() {
        return None;
    }
    let (from_row, from_col) = mv.from;
    let (to_row, to_col) = mv.to;
    let code = match mv.bonus {
        None => ((to_col * ROWS + to_row) * COLS + from_col) * ROWS + from_row,
        Some((bonus_row, bonus_col)) => {
            let color = from_row % 2;
            let column_shift = (to_col + 1).checked_sub(from_col).filter(|&s| s < 3)?;
            let code = (((bonus_col * ROWS + bonus_row) * COLS + from_col) * 3 + column_shift)
                * 2
                + color;
            PROMOTION_ACTION_OFFSET + code
        }
    };
    Some(code)
}

/// Decode an action code.
///
/// Returns `None` for codes outside the action space and for promotion codes
/// whose column shift would leave the board.
pub fn decode_action(code: usize) -> Option<Move> {
    if code >= NUM_ACTIONS {
        return None;
    }
    if code < PROMOTION_ACTION_OFFSET {
        let (code, from_row) = (code / ROWS, code % ROWS);
        let (code, from_col) = (code / COLS, code % COLS);
        let (to_col, to_row) = (code / ROWS, code % ROWS);
        return Some(Move::new(from_row, from_col, to_row, to_col));
    }

    let code = code - PROMOTION_ACTION_OFFSET;
    let (code, color) = (code / 2, code % 2);
    let (code, column_shift) = (code / 3, code % 3);
    let (code, from_col) = (code / COLS, code % COLS);
    let (bonus_col, bonus_row) = (code / ROWS, code % ROWS);
    let (from_row, to_row) = if color == 0 {
        (BLACK_PROMOTION_ROW - 1, BLACK_PROMOTION_ROW)
    } else {
        (WHITE_PROMOTION_ROW + 1, WHITE_PROMOTION_ROW)
    };
    let to_col = (from_col + column_shift).checked_sub(1)?;
    if to_col >= COLS {
        return None;
    }
    Some(Move::with_bonus(
        from_row, from_col, to_row, to_col, bonus_row, bonus_col,
    ))
}

pub fn encode_board(position: &Position) -> BoardTensor {
    let mut tensor = [[[0.0; NUM_PLANES]; COLS]; ROWS];
    for ((row, col), piece) in position.board().pieces() {
        tensor[row][col][plane_of(piece)] = 1.0;
    }
    if position.white_to_move() {
        for cell in tensor.iter_mut().flatten() {
            cell[SIDE_TO_MOVE_PLANE] = 1.0;
        }
    }
    tensor
}

/// Rebuild a position from its tensor. The side to move is read from cell
/// (0, 0); a cell with several hot planes takes the last one.
pub fn decode_board(tensor: &BoardTensor) -> Position {
    let mut board = Board::empty();
    for (row, cells) in tensor.iter().enumerate() {
        for (col, planes) in cells.iter().enumerate() {
            for (plane, &v) in planes[..SIDE_TO_MOVE_PLANE].iter().enumerate() {
                if v == 1.0 {
                    board.set((row, col), piece_of_plane(plane));
                }
            }
        }
    }
    let side = if tensor[0][0][SIDE_TO_MOVE_PLANE] == 1.0 {
        Color::White
    } else {
        Color::Black
    };
    Position::from_board(board, side)
}

/// Build a policy over `position`'s legal moves from a vector indexed by
/// action code. Codes beyond the end of `probs` are left out.
pub fn policy_from_action_probs(position: &Position, probs: &[f32]) -> Policy {
    position
        .legal_moves()
        .iter()
        .filter_map(|mv| {
            let p = probs.get(encode_action(mv)?)?;
            Some((*mv, f64::from(*p)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_position() -> Position {
        let board = "|.|b|.|.|
                     |P|.|.|.|
                     |.|K|.|.|
                     |.|.|N|.|
                     |.|.|.|.|
                     |.|.|r|.|
                     |k|.|.|p|
                     |.|.|B|.|"
            .parse()
            .unwrap();
        Position::from_board(board, Color::Black)
    }

    #[test]
    fn test_action_bijection_on_sample() {
        let pos = sample_position();
        let moves = pos.legal_moves();
        assert!(moves.iter().any(Move::is_promotion));
        for mv in moves {
            let code = encode_action(mv).expect("legal moves encode");
            assert!(code < NUM_ACTIONS);
            assert_eq!(code >= PROMOTION_ACTION_OFFSET, mv.is_promotion());
            assert_eq!(decode_action(code), Some(*mv), "code {code}");
        }
    }

    #[test]
    fn test_known_codes() {
        // ((0 * 8 + 5) * 4 + 0) * 8 + 6
        assert_eq!(encode_action(&Move::new(6, 0, 5, 0)), Some(166));
        assert_eq!(encode_action(&Move::new(7, 3, 7, 3)), Some(1023));

        let promo = Move::with_bonus(1, 0, 0, 1, 4, 2);
        // 1024 + ((((2 * 8 + 4) * 4 + 0) * 3 + 2) * 2 + 1)
        assert_eq!(encode_action(&promo), Some(1024 + 485));
        assert_eq!(decode_action(1024 + 485), Some(promo));
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(decode_action(NUM_ACTIONS), None);
        // Column shift 0 from column 0.
        assert_eq!(decode_action(PROMOTION_ACTION_OFFSET), None);
        // Column shift 2 from column 3.
        assert_eq!(decode_action(NUM_ACTIONS - 1), None);
    }

    #[test]
    fn test_encode_rejects_inexpressible_moves() {
        // A bonus move sliding three columns has no column shift code.
        assert_eq!(encode_action(&Move::with_bonus(1, 3, 0, 0, 4, 2)), None);
        assert_eq!(encode_action(&Move::with_bonus(1, 0, 0, 2, 4, 2)), None);
        assert_eq!(encode_action(&Move::new(6, 0, 5, 4)), None);
        assert_eq!(encode_action(&Move::with_bonus(1, 0, 0, 0, 8, 0)), None);
    }

    #[test]
    fn test_board_tensor_roundtrip() {
        let pos = sample_position();
        let tensor = encode_board(&pos);
        assert_eq!(tensor[0][1][7], 1.0);
        assert_eq!(tensor[7][2][2], 1.0);
        assert_eq!(tensor[6][0][9], 1.0);
        assert!(tensor.iter().flatten().all(|c| c[SIDE_TO_MOVE_PLANE] == 0.0));

        let decoded = decode_board(&tensor);
        assert_eq!(decoded.board(), pos.board());
        assert_eq!(decoded.side_to_move(), Color::Black);

        let start = encode_board(&Position::new());
        assert!(start.iter().flatten().all(|c| c[SIDE_TO_MOVE_PLANE] == 1.0));
        assert_eq!(decode_board(&start), Position::new());
    }

    #[test]
    fn test_policy_from_action_probs() {
        let pos = Position::new();
        let mut probs = vec![0.0_f32; NUM_ACTIONS];
        probs[166] = 0.75;
        let policy = policy_from_action_probs(&pos, &probs);
        assert_eq!(policy.len(), pos.legal_moves().len());
        assert_eq!(policy[&Move::new(6, 0, 5, 0)], 0.75);
        assert_eq!(policy[&Move::new(6, 1, 5, 1)], 0.0);

        assert!(policy_from_action_probs(&pos, &[]).is_empty());
    }
}
