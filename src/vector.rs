//! Relative move vectors.
//!
//! Every movement rule is written from the mover's point of view: a positive
//! `ranks` component always means "towards the opponent". White's frame is the
//! board's own frame; for Black both components are flipped before being added
//! to the source square.

use crate::types::{Color, Square};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct MoveVector {
    pub ranks: i8,
    pub files: i8,
}

impl MoveVector {
    pub const fn new(ranks: i8, files: i8) -> MoveVector {
        MoveVector { ranks, files }
    }

    /// The vector repeated `steps` times. Used for ray-casting sliding pieces.
    pub const fn scaled(&self, steps: i8) -> MoveVector {
        MoveVector {
            ranks: self.ranks * steps,
            files: self.files * steps,
        }
    }

    /// The vector expressed in the board's absolute frame for `color`.
    pub const fn oriented(&self, color: Color) -> MoveVector {
        match color {
            Color::White => *self,
            Color::Black => MoveVector {
                ranks: -self.ranks,
                files: -self.files,
            },
        }
    }
}

pub const PAWN_PUSH: MoveVector = MoveVector::new(1, 0);
pub const PAWN_DOUBLE_PUSH: MoveVector = MoveVector::new(2, 0);
pub const PAWN_CAPTURES: [MoveVector; 2] = [MoveVector::new(1, 1), MoveVector::new(1, -1)];

pub const ROOK_DIRECTIONS: [MoveVector; 4] = [
    MoveVector::new(1, 0),
    MoveVector::new(0, 1),
    MoveVector::new(-1, 0),
    MoveVector::new(0, -1),
];

pub const BISHOP_DIRECTIONS: [MoveVector; 4] = [
    MoveVector::new(1, 1),
    MoveVector::new(1, -1),
    MoveVector::new(-1, -1),
    MoveVector::new(-1, 1),
];

/// Diagonals then orthogonals: the queen's rays and the king's steps.
pub const ROYAL_DIRECTIONS: [MoveVector; 8] = [
    MoveVector::new(1, 1),
    MoveVector::new(1, -1),
    MoveVector::new(-1, -1),
    MoveVector::new(-1, 1),
    MoveVector::new(1, 0),
    MoveVector::new(0, 1),
    MoveVector::new(-1, 0),
    MoveVector::new(0, -1),
];

pub const KNIGHT_JUMPS: [MoveVector; 8] = [
    MoveVector::new(2, 1),
    MoveVector::new(2, -1),
    MoveVector::new(-2, 1),
    MoveVector::new(-2, -1),
    MoveVector::new(1, 2),
    MoveVector::new(1, -2),
    MoveVector::new(-1, 2),
    MoveVector::new(-1, -2),
];

impl Square {
    /// Apply a vector given in `color`'s frame. Returns `None` if the result
    /// falls outside the board.
    pub fn apply_vector(&self, color: Color, vector: MoveVector) -> Option<Square> {
        let vector = vector.oriented(color);
        Square::from_coords(
            self.file() as i8 + vector.files,
            self.rank() as i8 + vector.ranks,
        )
    }
}
