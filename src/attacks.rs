//! Attack detection.
//!
//! Rather than generating every enemy move, the target square is treated as a
//! "super piece": it casts rook and bishop rays, makes knight and king jumps and
//! looks along its own pawn-capture diagonals. An enemy piece standing at the
//! end of a pattern it could itself move along attacks the square.

use crate::board::Board;
use crate::types::{Color, Piece, PieceType, Square};
use crate::vector::{
    MoveVector, BISHOP_DIRECTIONS, KNIGHT_JUMPS, PAWN_CAPTURES, ROOK_DIRECTIONS, ROYAL_DIRECTIONS,
};

/// First occupied square along `direction` from `square`, if any.
fn first_piece_along(
    board: &Board,
    square: Square,
    perspective: Color,
    direction: MoveVector,
) -> Option<Piece> {
    for steps in 1..8 {
        let target = square.apply_vector(perspective, direction.scaled(steps))?;
        if let Some(piece) = board.piece_at(target) {
            return Some(piece);
        }
    }
    None
}

fn ray_attacked(
    board: &Board,
    square: Square,
    by: Color,
    perspective: Color,
    directions: &[MoveVector],
    slider: PieceType,
) -> bool {
    directions.iter().any(|direction| {
        matches!(
            first_piece_along(board, square, perspective, *direction),
            Some(piece) if piece.color == by
                && (piece.piece_type == slider || piece.piece_type == PieceType::Queen)
        )
    })
}

fn jump_attacked(
    board: &Board,
    square: Square,
    perspective: Color,
    jumps: &[MoveVector],
    attacker: Piece,
) -> bool {
    jumps.iter().any(|jump| {
        square
            .apply_vector(perspective, *jump)
            .and_then(|target| board.piece_at(target))
            == Some(attacker)
    })
}

/// Is `square` attacked by any piece of colour `by`?
///
/// `perspective` is the side the square is being defended for; its forward
/// direction decides which diagonals an enemy pawn has to stand on.
pub fn is_attacked(board: &Board, square: Square, by: Color, perspective: Color) -> bool {
    ray_attacked(board, square, by, perspective, &ROOK_DIRECTIONS, PieceType::Rook)
        || ray_attacked(board, square, by, perspective, &BISHOP_DIRECTIONS, PieceType::Bishop)
        || jump_attacked(
            board,
            square,
            perspective,
            &KNIGHT_JUMPS,
            Piece::new(by, PieceType::Knight),
        )
        || jump_attacked(
            board,
            square,
            perspective,
            &ROYAL_DIRECTIONS,
            Piece::new(by, PieceType::King),
        )
        || jump_attacked(
            board,
            square,
            perspective,
            &PAWN_CAPTURES,
            Piece::new(by, PieceType::Pawn),
        )
}
