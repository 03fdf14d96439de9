use thiserror::Error;

use crate::moves::MoveKind;

/// Errors surfaced by the rules core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("cannot read a {expected:?} payload from a {actual:?} move")]
    WrongMoveKind { expected: MoveKind, actual: MoveKind },

    #[error("packed move {0:#010x} carries an unknown move kind")]
    InvalidMoveKind(u32),

    #[error("packed move {0:#010x} carries an invalid promotion piece")]
    InvalidPromotionPiece(u32),

    #[error("invalid FEN: `{0}`")]
    InvalidFen(String),

    #[error("position cannot be represented as valid FEN: `{0}`")]
    Serialization(String),

    #[error("`{0}` is not a legal move in this position")]
    UnknownMove(String),
}
