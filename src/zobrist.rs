use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::position::{CastlingRights, Position};
use crate::types::{Color, Piece, Square};

const SEED: u64 = 0x1234567890ABCDEF;

/// Zobrist hashing keys for chess positions.
/// These are pseudo-random u64 values XORed together to create a unique hash for each position.
pub struct ZobristKeys {
    /// Indexed as: pieces[color][piece_type][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XORed in when it's black's turn
    pub side_to_move: u64,
    /// One key per castling-rights combination
    pub castling: [u64; 16],
    /// Keys for en passant file (0-7 for files a-h)
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Keys drawn from a fixed seed, so hashes are stable across runs.
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);

        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in pieces.iter_mut() {
            for piece in color.iter_mut() {
                for square in piece.iter_mut() {
                    *square = rng.gen();
                }
            }
        }
        let side_to_move = rng.gen();
        let mut castling = [0u64; 16];
        // no rights hashes to nothing
        for key in castling.iter_mut().skip(1) {
            *key = rng.gen();
        }
        let mut en_passant = [0u64; 8];
        for key in en_passant.iter_mut() {
            *key = rng.gen();
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub fn piece_key(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.color.index()][piece.piece_type.index()][square.index() as usize]
    }

    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.bits() as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global static Zobrist keys (initialized once)
pub static ZOBRIST_KEYS: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

impl Position {
    /// Hash of everything that affects which moves are legal. Move counters
    /// are not included.
    pub fn zobrist_hash(&self) -> u64 {
        let keys = &*ZOBRIST_KEYS;
        let mut hash = 0;
        for square in self.board().occupied_squares() {
            if let Some(piece) = self.board().piece_at(square) {
                hash ^= keys.piece_key(piece, square);
            }
        }
        if self.side_to_move() == Color::Black {
            hash ^= keys.side_to_move;
        }
        hash ^= keys.castling_key(self.castling_rights());
        if let Some(target) = self.en_passant_target() {
            hash ^= keys.en_passant[target.file() as usize];
        }
        hash
    }
}
