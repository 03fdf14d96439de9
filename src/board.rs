use std::fmt;

use itertools::Itertools;

use crate::moves::Move;
use crate::types::{Color, Piece, PieceType, Square};

pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// The 64 squares of a chess board, indexed by `Square::index`.
///
/// `Board` is a plain value: every change produces a new board and the
/// receiver is left untouched. Equality and hashing compare every square.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    pub const fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    pub fn starting() -> Board {
        // the constant placement is well formed
        Board::from_placement(STARTING_PLACEMENT).unwrap_or_default()
    }

    /// Parse the piece placement field of a FEN string. Returns `None` unless
    /// there are exactly 8 ranks, each covering exactly 8 files. Runs of empty
    /// squares must be written as a single digit, so `44` is rejected.
    pub fn from_placement(placement: &str) -> Option<Board> {
        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return None;
        }

        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file: u8 = 0;
            let mut after_digit = false;
            for c in rank_str.chars() {
                if let Some(empties) = c.to_digit(10) {
                    if after_digit || !(1..=8).contains(&empties) {
                        return None;
                    }
                    file += empties as u8;
                    after_digit = true;
                } else {
                    after_digit = false;
                    let piece = Piece::from_fen_char(c)?;
                    let square = Square::new(file, rank)?;
                    board.squares[square.index() as usize] = Some(piece);
                    file += 1;
                }
                if file > 8 {
                    return None;
                }
            }
            if file != 8 {
                return None;
            }
        }
        Some(board)
    }

    /// The piece placement field of a FEN string.
    pub fn to_placement(&self) -> String {
        (0..8u8)
            .rev()
            .map(|rank| {
                let mut row = String::new();
                let mut empties = 0;
                for file in 0..8u8 {
                    match self.squares[(rank * 8 + file) as usize] {
                        Some(piece) => {
                            if empties > 0 {
                                row.push_str(&empties.to_string());
                                empties = 0;
                            }
                            row.push(piece.to_fen_char());
                        }
                        None => empties += 1,
                    }
                }
                if empties > 0 {
                    row.push_str(&empties.to_string());
                }
                row
            })
            .join("/")
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    #[inline]
    pub fn is_empty_at(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn occupied_squares(&self) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |square| self.piece_at(*square).is_some())
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceType::King);
        Square::all().find(|square| self.piece_at(*square) == Some(king))
    }

    /// Apply a move that has already been judged legal. No validation happens
    /// here.
    pub fn with_move(&self, mv: &Move) -> Board {
        let mut board = *self;
        let from = mv.from_sq().index() as usize;
        let to = mv.to_sq().index() as usize;

        match *mv {
            Move::Normal { .. } | Move::PawnDouble { .. } => {
                board.squares[to] = self.squares[from];
                board.squares[from] = None;
            }
            Move::Promotion { piece, .. } => {
                board.squares[to] = self.squares[from]
                    .map(|pawn| Piece::new(pawn.color, piece.piece_type()));
                board.squares[from] = None;
            }
            Move::EnPassant { captured, .. } => {
                board.squares[to] = self.squares[from];
                board.squares[captured.index() as usize] = None;
                board.squares[from] = None;
            }
            Move::Castling {
                rook_from, rook_to, ..
            } => {
                let rook_from = rook_from.index() as usize;
                let rook_to = rook_to.index() as usize;
                let king = self.squares[from];
                let rook = self.squares[rook_from];
                board.squares[from] = None;
                board.squares[rook_from] = None;
                board.squares[to] = king;
                board.squares[rook_to] = rook;
            }
        }
        board
    }

    pub fn draw_board(&self) -> String {
        let mut result = String::new();
        for rank in (0..8u8).rev() {
            result.push_str(&format!("{} ", rank + 1));
            for file in 0..8u8 {
                let c = match self.squares[(rank * 8 + file) as usize] {
                    Some(piece) => piece.to_fen_char(),
                    None => '.',
                };
                result.push(c);
                result.push(' ');
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h");
        result
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.draw_board())
    }
}
