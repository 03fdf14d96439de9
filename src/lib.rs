pub mod attacks;
pub mod board;
pub mod error;
pub mod fen;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod position;
pub mod types;
pub mod vector;
pub mod zobrist;

pub use error::ChessError;
pub use moves::{CompactMove, Move, MoveKind};
pub use position::{Position, STARTING_POSITION_FEN};
