//! Moves and their packed wire format.
//!
//! `Move` is the working representation: a closed enum whose variants carry
//! exactly the payload their kind needs. `CompactMove` packs the same data into
//! a single `u32` for storage in higher layers:
//!
//! | bits  | field                                            |
//! | ----- | ------------------------------------------------ |
//! | 0-5   | source square index                              |
//! | 6-11  | destination square index                         |
//! | 12-14 | move kind                                        |
//! | 15-17 | promotion piece kind (promotion only)            |
//! | 15-20 | rook source / captured pawn (castling, en passant) |
//! | 21-26 | rook destination (castling only)                 |

use std::fmt;

use crate::error::ChessError;
use crate::types::{PieceType, PromotionPiece, Square};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    PawnDouble = 1,
    Promotion = 2,
    EnPassant = 3,
    Castling = 4,
}

impl MoveKind {
    fn from_bits(bits: u32) -> Option<MoveKind> {
        match bits {
            0 => Some(MoveKind::Normal),
            1 => Some(MoveKind::PawnDouble),
            2 => Some(MoveKind::Promotion),
            3 => Some(MoveKind::EnPassant),
            4 => Some(MoveKind::Castling),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Move {
    /// Any move or capture that needs no side-information.
    Normal { from: Square, to: Square },
    /// A pawn advancing two squares from its starting rank.
    PawnDouble { from: Square, to: Square },
    Promotion {
        from: Square,
        to: Square,
        piece: PromotionPiece,
    },
    /// `captured` is the square of the pawn taken: same rank as `from`, same file as `to`.
    EnPassant {
        from: Square,
        to: Square,
        captured: Square,
    },
    /// `from`/`to` are the king's squares.
    Castling {
        from: Square,
        to: Square,
        rook_from: Square,
        rook_to: Square,
    },
}

impl Move {
    pub fn from_sq(&self) -> Square {
        match *self {
            Move::Normal { from, .. }
            | Move::PawnDouble { from, .. }
            | Move::Promotion { from, .. }
            | Move::EnPassant { from, .. }
            | Move::Castling { from, .. } => from,
        }
    }

    pub fn to_sq(&self) -> Square {
        match *self {
            Move::Normal { to, .. }
            | Move::PawnDouble { to, .. }
            | Move::Promotion { to, .. }
            | Move::EnPassant { to, .. }
            | Move::Castling { to, .. } => to,
        }
    }

    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Normal { .. } => MoveKind::Normal,
            Move::PawnDouble { .. } => MoveKind::PawnDouble,
            Move::Promotion { .. } => MoveKind::Promotion,
            Move::EnPassant { .. } => MoveKind::EnPassant,
            Move::Castling { .. } => MoveKind::Castling,
        }
    }

    fn wrong_kind(&self, expected: MoveKind) -> ChessError {
        ChessError::WrongMoveKind {
            expected,
            actual: self.kind(),
        }
    }

    pub fn promotion_piece(&self) -> Result<PromotionPiece, ChessError> {
        match *self {
            Move::Promotion { piece, .. } => Ok(piece),
            _ => Err(self.wrong_kind(MoveKind::Promotion)),
        }
    }

    pub fn rook_source(&self) -> Result<Square, ChessError> {
        match *self {
            Move::Castling { rook_from, .. } => Ok(rook_from),
            _ => Err(self.wrong_kind(MoveKind::Castling)),
        }
    }

    pub fn rook_destination(&self) -> Result<Square, ChessError> {
        match *self {
            Move::Castling { rook_to, .. } => Ok(rook_to),
            _ => Err(self.wrong_kind(MoveKind::Castling)),
        }
    }

    pub fn en_passant_capture(&self) -> Result<Square, ChessError> {
        match *self {
            Move::EnPassant { captured, .. } => Ok(captured),
            _ => Err(self.wrong_kind(MoveKind::EnPassant)),
        }
    }

    /// Long algebraic form as used by UCI, e.g. `e2e4`, `e7e8q`. Castling is
    /// written as the king's move.
    pub fn to_uci(&self) -> String {
        match self {
            Move::Promotion { from, to, piece } => format!(
                "{}{}{}",
                from,
                to,
                piece.piece_type().to_char().to_ascii_lowercase()
            ),
            _ => format!("{}{}", self.from_sq(), self.to_sq()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

const SOURCE_SHIFT: u32 = 0;
const DESTINATION_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const PROMOTION_SHIFT: u32 = 15;
const ROOK_SOURCE_OR_EN_PASSANT_SHIFT: u32 = 15;
const ROOK_DESTINATION_SHIFT: u32 = 21;

const SQUARE_MASK: u32 = 0x3F;
const KIND_MASK: u32 = 0x7;
const PIECE_MASK: u32 = 0x7;

/// A move packed into 32 bits. See the module docs for the layout.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct CompactMove(u32);

impl CompactMove {
    pub const fn from_raw(raw: u32) -> CompactMove {
        CompactMove(raw)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    fn square(&self, shift: u32) -> Square {
        Square::from_index(((self.0 >> shift) & SQUARE_MASK) as u8)
    }

    pub fn from_sq(&self) -> Square {
        self.square(SOURCE_SHIFT)
    }

    pub fn to_sq(&self) -> Square {
        self.square(DESTINATION_SHIFT)
    }
}

fn pack_square(square: Square, shift: u32) -> u32 {
    (square.index() as u32) << shift
}

impl From<Move> for CompactMove {
    fn from(mv: Move) -> CompactMove {
        let base = pack_square(mv.from_sq(), SOURCE_SHIFT)
            | pack_square(mv.to_sq(), DESTINATION_SHIFT)
            | ((mv.kind() as u32) << KIND_SHIFT);
        let payload = match mv {
            Move::Normal { .. } | Move::PawnDouble { .. } => 0,
            Move::Promotion { piece, .. } => (piece.piece_type() as u32) << PROMOTION_SHIFT,
            Move::EnPassant { captured, .. } => {
                pack_square(captured, ROOK_SOURCE_OR_EN_PASSANT_SHIFT)
            }
            Move::Castling {
                rook_from, rook_to, ..
            } => {
                pack_square(rook_from, ROOK_SOURCE_OR_EN_PASSANT_SHIFT)
                    | pack_square(rook_to, ROOK_DESTINATION_SHIFT)
            }
        };
        CompactMove(base | payload)
    }
}

impl TryFrom<CompactMove> for Move {
    type Error = ChessError;

    fn try_from(packed: CompactMove) -> Result<Move, ChessError> {
        let raw = packed.raw();
        let kind = MoveKind::from_bits((raw >> KIND_SHIFT) & KIND_MASK)
            .ok_or(ChessError::InvalidMoveKind(raw))?;
        let from = packed.from_sq();
        let to = packed.to_sq();

        Ok(match kind {
            MoveKind::Normal => Move::Normal { from, to },
            MoveKind::PawnDouble => Move::PawnDouble { from, to },
            MoveKind::Promotion => {
                let piece = match (raw >> PROMOTION_SHIFT) & PIECE_MASK {
                    bits if bits == PieceType::Queen as u32 => PromotionPiece::Queen,
                    bits if bits == PieceType::Rook as u32 => PromotionPiece::Rook,
                    bits if bits == PieceType::Bishop as u32 => PromotionPiece::Bishop,
                    bits if bits == PieceType::Knight as u32 => PromotionPiece::Knight,
                    _ => return Err(ChessError::InvalidPromotionPiece(raw)),
                };
                Move::Promotion { from, to, piece }
            }
            MoveKind::EnPassant => Move::EnPassant {
                from,
                to,
                captured: packed.square(ROOK_SOURCE_OR_EN_PASSANT_SHIFT),
            },
            MoveKind::Castling => Move::Castling {
                from,
                to,
                rook_from: packed.square(ROOK_SOURCE_OR_EN_PASSANT_SHIFT),
                rook_to: packed.square(ROOK_DESTINATION_SHIFT),
            },
        })
    }
}
