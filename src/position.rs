use std::fmt;

use log::warn;

use crate::board::Board;
use crate::error::ChessError;
use crate::fen::FenRecord;
use crate::movegen::MoveGenerator;
use crate::moves::Move;
use crate::types::{Color, PieceType, Square};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

/// The four castling permissions. Once a right is lost it is never given back
/// by play; `with` only exists to build positions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// FEN letters in canonical order.
    const LETTERS: [(char, Color, CastlingSide); 4] = [
        ('K', Color::White, CastlingSide::Kingside),
        ('Q', Color::White, CastlingSide::Queenside),
        ('k', Color::Black, CastlingSide::Kingside),
        ('q', Color::Black, CastlingSide::Queenside),
    ];

    const fn flag(color: Color, side: CastlingSide) -> u8 {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => 0b0001,
            (Color::White, CastlingSide::Queenside) => 0b0010,
            (Color::Black, CastlingSide::Kingside) => 0b0100,
            (Color::Black, CastlingSide::Queenside) => 0b1000,
        }
    }

    pub fn has(&self, color: Color, side: CastlingSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    pub fn with(self, color: Color, side: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | Self::flag(color, side))
    }

    pub fn without(self, color: Color, side: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 & !Self::flag(color, side))
    }

    pub fn without_color(self, color: Color) -> CastlingRights {
        self.without(color, CastlingSide::Kingside)
            .without(color, CastlingSide::Queenside)
    }

    /// Rights lost because a move starts or ends on `square`: a rook leaving
    /// its corner or being captured there.
    fn without_corner(self, square: Square) -> CastlingRights {
        match (square.file(), square.rank()) {
            (0, 0) => self.without(Color::White, CastlingSide::Queenside),
            (7, 0) => self.without(Color::White, CastlingSide::Kingside),
            (0, 7) => self.without(Color::Black, CastlingSide::Queenside),
            (7, 7) => self.without(Color::Black, CastlingSide::Kingside),
            _ => self,
        }
    }

    pub(crate) fn bits(&self) -> u8 {
        self.0
    }

    /// Parse the castling field of a FEN string: `-`, or a non-empty subset of
    /// `KQkq` written in that order.
    pub fn from_fen_field(field: &str) -> Option<CastlingRights> {
        if field == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = CastlingRights::NONE;
        let mut letters = Self::LETTERS.iter();
        for c in field.chars() {
            let (_, color, side) = letters.find(|(letter, _, _)| *letter == c)?;
            rights = rights.with(*color, *side);
        }
        if rights == CastlingRights::NONE {
            None
        } else {
            Some(rights)
        }
    }

    pub fn to_fen_field(&self) -> String {
        let field: String = Self::LETTERS
            .iter()
            .filter(|(_, color, side)| self.has(*color, *side))
            .map(|(letter, _, _)| *letter)
            .collect();
        if field.is_empty() {
            "-".to_string()
        } else {
            field
        }
    }
}

/// Half-moves since the last capture or pawn move.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, PartialOrd, Ord)]
pub struct HalfMoveClock(u8);

impl HalfMoveClock {
    pub const MAX: u8 = 150;
    pub const ZERO: HalfMoveClock = HalfMoveClock(0);

    pub fn try_new(value: u32) -> Option<HalfMoveClock> {
        if value <= Self::MAX as u32 {
            Some(HalfMoveClock(value as u8))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn increment(&self) -> Option<HalfMoveClock> {
        Self::try_new(self.0 as u32 + 1)
    }
}

impl fmt::Display for HalfMoveClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The full-move number, starting at 1 and incremented after every black move.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct FullMoveNumber(u16);

impl FullMoveNumber {
    /// Longest possible game under the 75-move rule.
    pub const MAX: u16 = 8840;
    pub const FIRST: FullMoveNumber = FullMoveNumber(1);

    pub fn try_new(value: u32) -> Option<FullMoveNumber> {
        if (1..=Self::MAX as u32).contains(&value) {
            Some(FullMoveNumber(value as u16))
        } else {
            None
        }
    }

    pub fn get(&self) -> u16 {
        self.0
    }

    pub fn increment(&self) -> Option<FullMoveNumber> {
        Self::try_new(self.0 as u32 + 1)
    }
}

impl Default for FullMoveNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for FullMoveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything needed to generate moves: the board, whose turn it is and the
/// state that the board alone does not capture.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    halfmove_clock: HalfMoveClock,
    fullmove_number: FullMoveNumber,
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl Position {
    pub fn new() -> Position {
        Position {
            board: Board::starting(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            en_passant_target: None,
            halfmove_clock: HalfMoveClock::ZERO,
            fullmove_number: FullMoveNumber::FIRST,
        }
    }

    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling_rights: CastlingRights,
        en_passant_target: Option<Square>,
        halfmove_clock: HalfMoveClock,
        fullmove_number: FullMoveNumber,
    ) -> Position {
        Position {
            board,
            side_to_move,
            castling_rights,
            en_passant_target,
            halfmove_clock,
            fullmove_number,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Position, ChessError> {
        FenRecord::parse(fen)
            .map(Position::from)
            .ok_or_else(|| ChessError::InvalidFen(fen.to_string()))
    }

    /// Render as FEN. The text is validated again before being returned; a
    /// position that does not survive that is reported as a serialization
    /// fault.
    pub fn to_fen(&self) -> Result<String, ChessError> {
        let fen = format!(
            "{} {} {} {} {} {}",
            self.board.to_placement(),
            self.side_to_move.to_char(),
            self.castling_rights.to_fen_field(),
            self.en_passant_target
                .map_or_else(|| "-".to_string(), |square| square.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number,
        );
        match FenRecord::parse(&fen) {
            Some(_) => Ok(fen),
            None => Err(ChessError::Serialization(fen)),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn halfmove_clock(&self) -> HalfMoveClock {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> FullMoveNumber {
        self.fullmove_number
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new(self).legal_moves_for_all_pieces()
    }

    pub fn legal_moves_for_piece(&self, square: Square) -> Vec<Move> {
        MoveGenerator::new(self).legal_moves_for_piece(square)
    }

    pub fn is_in_check(&self) -> bool {
        let color = self.side_to_move;
        self.board.find_king(color).is_some_and(|king| {
            crate::attacks::is_attacked(&self.board, king, color.other_color(), color)
        })
    }

    /// Look up a legal move by its UCI text.
    pub fn find_legal_move(&self, uci: &str) -> Result<Move, ChessError> {
        self.legal_moves()
            .into_iter()
            .find(|mv| mv.to_uci() == uci)
            .ok_or_else(|| ChessError::UnknownMove(uci.to_string()))
    }

    /// The position after `mv` is played. `mv` is assumed to be legal.
    pub fn with_move(&self, mv: &Move) -> Position {
        let mover = self.side_to_move;
        let moved = self.board.piece_at(mv.from_sq());
        let is_pawn_move = moved.is_some_and(|piece| piece.piece_type == PieceType::Pawn);
        let is_capture = match mv {
            Move::EnPassant { .. } => true,
            Move::Castling { .. } => false,
            _ => self.board.piece_at(mv.to_sq()).is_some(),
        };

        let mut castling_rights = self.castling_rights;
        if moved.is_some_and(|piece| piece.piece_type == PieceType::King) {
            castling_rights = castling_rights.without_color(mover);
        }
        castling_rights = castling_rights
            .without_corner(mv.from_sq())
            .without_corner(mv.to_sq());

        let en_passant_target = match *mv {
            Move::PawnDouble { from, to } => Square::new(from.file(), (from.rank() + to.rank()) / 2),
            _ => None,
        };

        let halfmove_clock = if is_pawn_move || is_capture {
            HalfMoveClock::ZERO
        } else {
            self.halfmove_clock.increment().unwrap_or_else(|| {
                warn!("half-move clock saturated at {}", HalfMoveClock::MAX);
                self.halfmove_clock
            })
        };

        let fullmove_number = match mover {
            Color::White => self.fullmove_number,
            Color::Black => self.fullmove_number.increment().unwrap_or_else(|| {
                warn!("full-move number saturated at {}", FullMoveNumber::MAX);
                self.fullmove_number
            }),
        };

        Position {
            board: self.board.with_move(mv),
            side_to_move: mover.other_color(),
            castling_rights,
            en_passant_target,
            halfmove_clock,
            fullmove_number,
        }
    }
}

impl From<FenRecord> for Position {
    fn from(record: FenRecord) -> Position {
        Position {
            board: record.board,
            side_to_move: record.side_to_move,
            castling_rights: record.castling_rights,
            en_passant_target: record.en_passant_target,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PromotionPiece};
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(position: &Position, uci: &str) -> Position {
        let mv = position.find_legal_move(uci).unwrap();
        position.with_move(&mv)
    }

    #[test]
    fn test_new_matches_starting_fen() {
        assert_eq!(Position::new().to_fen().unwrap(), STARTING_POSITION_FEN);
        assert_eq!(Position::from_fen(STARTING_POSITION_FEN).unwrap(), Position::new());
    }

    #[test]
    fn test_castling_fields() {
        assert_eq!(CastlingRights::from_fen_field("KQkq"), Some(CastlingRights::ALL));
        assert_eq!(CastlingRights::from_fen_field("-"), Some(CastlingRights::NONE));
        let kq = CastlingRights::from_fen_field("Kq").unwrap();
        assert!(kq.has(Color::White, CastlingSide::Kingside));
        assert!(kq.has(Color::Black, CastlingSide::Queenside));
        assert!(!kq.has(Color::White, CastlingSide::Queenside));
        assert_eq!(kq.to_fen_field(), "Kq");
        // out of order, repeated or empty
        assert_eq!(CastlingRights::from_fen_field("qK"), None);
        assert_eq!(CastlingRights::from_fen_field("KK"), None);
        assert_eq!(CastlingRights::from_fen_field(""), None);
        assert_eq!(CastlingRights::from_fen_field("K-"), None);
    }

    #[test]
    fn test_counter_ranges() {
        assert!(HalfMoveClock::try_new(150).is_some());
        assert!(HalfMoveClock::try_new(151).is_none());
        assert_eq!(HalfMoveClock::try_new(150).unwrap().increment(), None);
        assert!(FullMoveNumber::try_new(0).is_none());
        assert!(FullMoveNumber::try_new(8840).is_some());
        assert!(FullMoveNumber::try_new(8841).is_none());
        assert_eq!(FullMoveNumber::FIRST.increment().map(|n| n.get()), Some(2));
    }

    #[test]
    fn test_with_move_updates_state() {
        let start = Position::new();
        let after_e4 = play(&start, "e2e4");
        assert_eq!(
            after_e4.to_fen().unwrap(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        // the original is untouched
        assert_eq!(start.to_fen().unwrap(), STARTING_POSITION_FEN);

        let after_nf6 = play(&after_e4, "g8f6");
        assert_eq!(
            after_nf6.to_fen().unwrap(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
    }

    #[test]
    fn test_king_and_rook_moves_remove_rights() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let rook_moved = play(&position, "h1h5");
        assert_eq!(rook_moved.castling_rights().to_fen_field(), "Qkq");

        let castled = play(&position, "e1c1");
        assert_eq!(castled.castling_rights().to_fen_field(), "kq");
        assert_eq!(castled.board().to_placement(), "r3k2r/8/8/8/8/8/8/2KR3R");

        // capturing a rook on its corner removes the victim's right too
        let capture = play(&position, "a1a8");
        assert_eq!(capture.castling_rights().to_fen_field(), "Kk");
    }

    #[test]
    fn test_en_passant_target_only_after_double_push() {
        let position = Position::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        let pushed = play(&position, "d7d5");
        assert_eq!(pushed.en_passant_target(), Some(sq("d6")));

        let captured = play(&pushed, "e5d6");
        assert_eq!(captured.en_passant_target(), None);
        assert!(captured.board().is_empty_at(sq("d5")));
        assert_eq!(captured.halfmove_clock(), HalfMoveClock::ZERO);
    }

    #[test]
    fn test_promotion_through_position() {
        let position = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 3 40").unwrap();
        let promoted = play(&position, "b7b8q");
        assert_eq!(
            promoted.board().piece_at(sq("b8")),
            Some(Piece::new(Color::White, PieceType::Queen))
        );
        assert_eq!(
            position.find_legal_move("b7b8n").unwrap().promotion_piece(),
            Ok(PromotionPiece::Knight)
        );
        assert_eq!(promoted.to_fen().unwrap(), "1Q2k3/8/8/8/8/8/8/4K3 b - - 0 40");
    }

    #[test]
    fn test_unknown_move() {
        assert_eq!(
            Position::new().find_legal_move("e2e5"),
            Err(ChessError::UnknownMove("e2e5".to_string()))
        );
    }

    #[test]
    fn test_serialization_fault() {
        // an en passant target on the fourth rank is not valid notation
        let position = Position::from_parts(
            Board::starting(),
            Color::White,
            CastlingRights::ALL,
            Some(sq("e4")),
            HalfMoveClock::ZERO,
            FullMoveNumber::FIRST,
        );
        assert!(matches!(position.to_fen(), Err(ChessError::Serialization(_))));
    }

    #[test]
    fn test_in_check() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        assert!(position.is_in_check());
        assert!(!Position::new().is_in_check());
    }
}
