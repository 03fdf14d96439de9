//! Legal move generation.
//!
//! Generation is a two stage pipeline run per square: the piece's
//! pseudo-legal moves are enumerated from its movement pattern and the
//! occupancy of the board, then every candidate is played on a scratch board
//! and dropped if it leaves the mover's king attacked. Castling additionally
//! may not start from or pass through an attacked square.

use log::trace;

use crate::attacks::is_attacked;
use crate::board::Board;
use crate::moves::Move;
use crate::position::{CastlingRights, CastlingSide, Position};
use crate::types::{Color, Piece, PieceType, PromotionPiece, Square};
use crate::vector::{
    MoveVector, BISHOP_DIRECTIONS, KNIGHT_JUMPS, PAWN_CAPTURES, PAWN_DOUBLE_PUSH, PAWN_PUSH,
    ROOK_DIRECTIONS, ROYAL_DIRECTIONS,
};

const MAX_MOVES: usize = 218;

pub struct MoveGenerator<'a> {
    position: &'a Position,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(position: &'a Position) -> Self {
        Self { position }
    }

    /// Legal moves for every piece of the side to move.
    pub fn legal_moves_for_all_pieces(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(MAX_MOVES);
        for square in self.position.board().occupied_squares() {
            moves.extend(self.legal_moves_for_piece(square));
        }
        moves
    }

    /// Legal moves for the piece on `square`. Empty squares and pieces of the
    /// side not to move have none.
    pub fn legal_moves_for_piece(&self, square: Square) -> Vec<Move> {
        let Some(piece) = self.position.board().piece_at(square) else {
            return Vec::new();
        };
        self.pseudo_legal_moves(square)
            .into_iter()
            .filter(|mv| {
                let legal = self.is_legal(piece, mv);
                if !legal {
                    trace!(
                        "{} {} {} rejected: king would be attacked",
                        piece.color.to_human(),
                        piece.piece_type.to_human(),
                        mv
                    );
                }
                legal
            })
            .collect()
    }

    /// Every move the piece on `square` could make before king safety is
    /// considered.
    pub fn pseudo_legal_moves(&self, square: Square) -> Vec<Move> {
        let position = self.position;
        let board = position.board();
        let Some(piece) = board.piece_at(square) else {
            return Vec::new();
        };
        if piece.color != position.side_to_move() {
            return Vec::new();
        }

        match piece.piece_type {
            PieceType::Pawn => {
                let mut moves = pawn_moves(square, board, piece);
                moves.extend(en_passant_moves(square, piece, position.en_passant_target()));
                moves.extend(promotion_moves(square, board, piece));
                moves.extend(pawn_double_move(square, board, piece));
                moves
            }
            PieceType::Rook => rook_moves(square, board, piece),
            PieceType::Bishop => bishop_moves(square, board, piece),
            PieceType::Knight => knight_moves(square, board, piece),
            PieceType::Queen => queen_moves(square, board, piece),
            PieceType::King => {
                let mut moves = king_moves(square, board, piece);
                moves.extend(castling_moves(square, board, piece, position.castling_rights()));
                moves
            }
        }
    }

    fn is_legal(&self, piece: Piece, mv: &Move) -> bool {
        let board = self.position.board();
        let color = piece.color;
        let enemy = color.other_color();

        if let Move::Castling { from, to, .. } = *mv {
            // out of check, then through check; the landing square is covered below
            if is_attacked(board, from, enemy, color) {
                return false;
            }
            let step = if to.file() > from.file() { 1 } else { -1 };
            let crossed = Square::from_coords(from.file() as i8 + step, from.rank() as i8);
            if crossed.is_some_and(|crossed| is_attacked(board, crossed, enemy, color)) {
                return false;
            }
        }

        let after = board.with_move(mv);
        let king_square = if piece.piece_type == PieceType::King {
            Some(mv.to_sq())
        } else {
            after.find_king(color)
        };
        match king_square {
            Some(king_square) => !is_attacked(&after, king_square, enemy, color),
            None => true,
        }
    }
}

fn slide(square: Square, board: &Board, color: Color, directions: &[MoveVector]) -> Vec<Move> {
    let mut moves = Vec::new();
    for direction in directions {
        let mut current = square;
        while let Some(target) = current.apply_vector(color, *direction) {
            match board.piece_at(target) {
                None => moves.push(Move::Normal {
                    from: square,
                    to: target,
                }),
                Some(other) => {
                    if other.color != color {
                        moves.push(Move::Normal {
                            from: square,
                            to: target,
                        });
                    }
                    break;
                }
            }
            current = target;
        }
    }
    moves
}

fn jump(square: Square, board: &Board, color: Color, jumps: &[MoveVector]) -> Vec<Move> {
    jumps
        .iter()
        .filter_map(|vector| square.apply_vector(color, *vector))
        .filter(|target| !matches!(board.piece_at(*target), Some(other) if other.color == color))
        .map(|target| Move::Normal {
            from: square,
            to: target,
        })
        .collect()
}

pub(crate) fn rook_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    slide(square, board, piece.color, &ROOK_DIRECTIONS)
}

pub(crate) fn bishop_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    slide(square, board, piece.color, &BISHOP_DIRECTIONS)
}

pub(crate) fn queen_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    slide(square, board, piece.color, &ROYAL_DIRECTIONS)
}

pub(crate) fn knight_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    jump(square, board, piece.color, &KNIGHT_JUMPS)
}

/// King steps, castling excluded.
pub(crate) fn king_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    jump(square, board, piece.color, &ROYAL_DIRECTIONS)
}

fn holds_enemy(board: &Board, square: Square, color: Color) -> bool {
    matches!(board.piece_at(square), Some(other) if other.color != color)
}

/// Single pushes and diagonal captures that do not land on the promotion rank.
pub(crate) fn pawn_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    let color = piece.color;
    let promotion_rank = color.promotion_rank();
    let mut moves = Vec::new();

    if let Some(target) = square.apply_vector(color, PAWN_PUSH) {
        if target.rank() != promotion_rank && board.is_empty_at(target) {
            moves.push(Move::Normal {
                from: square,
                to: target,
            });
        }
    }

    for capture in PAWN_CAPTURES {
        let Some(target) = square.apply_vector(color, capture) else {
            continue;
        };
        if target.rank() != promotion_rank && holds_enemy(board, target, color) {
            moves.push(Move::Normal {
                from: square,
                to: target,
            });
        }
    }
    moves
}

pub(crate) fn pawn_double_move(square: Square, board: &Board, piece: Piece) -> Option<Move> {
    let color = piece.color;
    if square.rank() != color.pawn_start_rank() {
        return None;
    }
    let passed = square.apply_vector(color, PAWN_PUSH)?;
    let target = square.apply_vector(color, PAWN_DOUBLE_PUSH)?;
    if board.is_empty_at(passed) && board.is_empty_at(target) {
        Some(Move::PawnDouble {
            from: square,
            to: target,
        })
    } else {
        None
    }
}

pub(crate) fn en_passant_moves(
    square: Square,
    piece: Piece,
    en_passant_target: Option<Square>,
) -> Option<Move> {
    let target = en_passant_target?;
    PAWN_CAPTURES
        .iter()
        .filter_map(|capture| square.apply_vector(piece.color, *capture))
        .find(|destination| *destination == target)
        .and_then(|destination| {
            let captured = Square::new(destination.file(), square.rank())?;
            Some(Move::EnPassant {
                from: square,
                to: destination,
                captured,
            })
        })
}

/// Pushes and captures onto the promotion rank, one move per promotion piece.
pub(crate) fn promotion_moves(square: Square, board: &Board, piece: Piece) -> Vec<Move> {
    let color = piece.color;
    let mut moves = Vec::new();
    if square.apply_vector(color, PAWN_PUSH).map(|s| s.rank()) != Some(color.promotion_rank()) {
        return moves;
    }

    let mut destinations = Vec::with_capacity(3);
    if let Some(target) = square.apply_vector(color, PAWN_PUSH) {
        if board.is_empty_at(target) {
            destinations.push(target);
        }
    }
    for capture in PAWN_CAPTURES {
        if let Some(target) = square.apply_vector(color, capture) {
            if holds_enemy(board, target, color) {
                destinations.push(target);
            }
        }
    }

    for to in destinations {
        for promotion in PromotionPiece::ALL {
            moves.push(Move::Promotion {
                from: square,
                to,
                piece: promotion,
            });
        }
    }
    moves
}

/// Castling candidates allowed by the remaining rights. The king and rook must
/// stand on their home squares with nothing between them; attacks on the
/// king's path are checked during legality filtering.
pub(crate) fn castling_moves(
    square: Square,
    board: &Board,
    piece: Piece,
    rights: CastlingRights,
) -> Vec<Move> {
    let color = piece.color;
    let rank = color.back_rank();
    let mut moves = Vec::new();
    if Square::new(4, rank) != Some(square) {
        return moves;
    }

    for side in [CastlingSide::Kingside, CastlingSide::Queenside] {
        if !rights.has(color, side) {
            continue;
        }
        let (king_file, rook_file, rook_to_file) = match side {
            CastlingSide::Kingside => (6, 7, 5),
            CastlingSide::Queenside => (2, 0, 3),
        };
        let (Some(to), Some(rook_from), Some(rook_to)) = (
            Square::new(king_file, rank),
            Square::new(rook_file, rank),
            Square::new(rook_to_file, rank),
        ) else {
            continue;
        };

        if board.piece_at(rook_from) != Some(Piece::new(color, PieceType::Rook)) {
            continue;
        }
        let (low, high) = (rook_file.min(4) + 1, rook_file.max(4));
        let path_clear = (low..high)
            .filter_map(|file| Square::new(file, rank))
            .all(|between| board.is_empty_at(between));
        if !path_clear {
            continue;
        }

        moves.push(Move::Castling {
            from: square,
            to,
            rook_from,
            rook_to,
        });
    }
    moves
}
