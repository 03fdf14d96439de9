//! Forsyth-Edwards Notation.
//!
//! `FenRecord::parse` is the only gate between raw text and the rules core.
//! It validates all six fields and hands back typed values, so nothing
//! downstream needs to look at the text again. Malformed input is simply
//! `None`.
//!
//! Counters must be written in canonical decimal form (no sign, no leading
//! zeros), which makes rendering a parsed record reproduce its input exactly.

use crate::board::Board;
use crate::position::{CastlingRights, FullMoveNumber, HalfMoveClock};
use crate::types::{Color, Square};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FenRecord {
    pub board: Board,
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    pub halfmove_clock: HalfMoveClock,
    pub fullmove_number: FullMoveNumber,
}

impl FenRecord {
    pub fn parse(fen: &str) -> Option<FenRecord> {
        let fields: Vec<&str> = fen.split(' ').collect();
        let [placement, active, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return None;
        };

        Some(FenRecord {
            board: Board::from_placement(placement)?,
            side_to_move: parse_active_color(active)?,
            castling_rights: CastlingRights::from_fen_field(castling)?,
            en_passant_target: parse_en_passant(en_passant)?,
            halfmove_clock: HalfMoveClock::try_new(parse_counter(halfmove)?)?,
            fullmove_number: FullMoveNumber::try_new(parse_counter(fullmove)?)?,
        })
    }
}

fn parse_active_color(field: &str) -> Option<Color> {
    let mut chars = field.chars();
    let color = Color::from_char(chars.next()?)?;
    chars.next().is_none().then_some(color)
}

/// `-` parses to `Some(None)`; a target must sit on the third or sixth rank.
fn parse_en_passant(field: &str) -> Option<Option<Square>> {
    if field == "-" {
        return Some(None);
    }
    let square = Square::from_algebraic(field)?;
    match square.rank() {
        2 | 5 => Some(Some(square)),
        _ => None,
    }
}

fn parse_counter(field: &str) -> Option<u32> {
    if field.is_empty() || field.len() > 5 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if field.len() > 1 && field.starts_with('0') {
        return None;
    }
    field.parse().ok()
}
