use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Parse the active colour field of a FEN string.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Rank index (0-based) this colour's pawns start on.
    pub fn pawn_start_rank(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Rank index a pawn of this colour promotes on.
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Rank index of this colour's back rank.
    pub fn back_rank(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

/// The six piece kinds. Discriminants start at 1 so that 0 stays free as the
/// "no piece" value in packed encodings.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize - 1
    }
}

/// The pieces a pawn may promote to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    /// Generation order for promotion moves.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub fn piece_type(&self) -> PieceType {
        match self {
            Self::Queen => PieceType::Queen,
            Self::Rook => PieceType::Rook,
            Self::Bishop => PieceType::Bishop,
            Self::Knight => PieceType::Knight,
        }
    }

    pub fn from_piece_type(piece_type: PieceType) -> Option<PromotionPiece> {
        match piece_type {
            PieceType::Queen => Some(Self::Queen),
            PieceType::Rook => Some(Self::Rook),
            PieceType::Bishop => Some(Self::Bishop),
            PieceType::Knight => Some(Self::Knight),
            PieceType::Pawn | PieceType::King => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { color, piece_type }
    }

    /// Piece from its FEN letter: uppercase is white, lowercase is black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        PieceType::from_char(c).map(|piece_type| Piece {
            color: Color::from_case(c),
            piece_type,
        })
    }

    pub fn to_fen_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

/// A square on the board. Files and ranks are 0-based: a1 is (0, 0), h8 is (7, 7).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square { rank, file })
        } else {
            None
        }
    }

    /// Square from signed coordinates, `None` when off the board.
    pub fn from_coords(file: i8, rank: i8) -> Option<Square> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// Square from its linear index, `rank * 8 + file`. Only the low six bits are used.
    pub const fn from_index(index: u8) -> Square {
        let index = index & 0x3F;
        Square {
            rank: index / 8,
            file: index % 8,
        }
    }

    pub const fn index(&self) -> u8 {
        self.rank * 8 + self.file
    }

    pub const fn file(&self) -> u8 {
        self.file
    }

    pub const fn rank(&self) -> u8 {
        self.rank
    }

    /// All 64 squares, a1 first, h8 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square::from_index)
    }

    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return None;
        }
        Square::new(file_char as u8 - b'a', rank_char as u8 - b'1')
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
