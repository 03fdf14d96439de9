use log::debug;
use rayon::prelude::*;

use crate::moves::Move;
use crate::position::Position;

/// Count the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|mv| perft(&position.with_move(mv), depth - 1))
        .sum()
}

/// Node counts below each root move. Root moves are searched in parallel;
/// positions are plain values so each worker owns its own copy.
pub fn perft_divide(position: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let divided: Vec<(Move, u64)> = position
        .legal_moves()
        .into_par_iter()
        .map(|mv| (mv, perft(&position.with_move(&mv), depth - 1)))
        .collect();
    for (mv, nodes) in &divided {
        debug!("{mv}: {nodes}");
    }
    divided
}

/// Perft from the starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// | Depth | Nodes       |
/// | ----- | ----------- |
/// | 0     | 1           |
/// | 1     | 20          |
/// | 2     | 400         |
/// | 3     | 8,902       |
/// | 4     | 197,281     |
/// | 5     | 4,865,609   |
/// | 6     | 119,060,324 |
#[cfg(test)]
fn expected_start_node_count(depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => 20,
        2 => 400,
        3 => 8902,
        4 => 197_281,
        5 => 4_865_609,
        6 => 119_060_324,
        _ => panic!("No expected node count for depth {}", depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DEPTH: u8 = 3;

    fn check(fen: &str, expected: &[u64]) {
        let position = Position::from_fen(fen).unwrap();
        for (depth, expected) in expected.iter().enumerate().skip(1) {
            assert_eq!(perft(&position, depth as u8), *expected, "{fen} at depth {depth}");
        }
    }

    #[test]
    fn perft_start() {
        let position = Position::new();
        for depth in 0..=MAX_DEPTH {
            assert_eq!(perft(&position, depth), expected_start_node_count(depth));
        }
    }

    /// "Kiwipete": castling both ways, pins, en passant and promotions early.
    #[test]
    fn perft_kiwipete() {
        check(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[1, 48, 2039],
        );
    }

    /// Position 3 has the horizontally pinned en passant capture.
    #[test]
    fn perft_pos_3() {
        check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[1, 14, 191, 2812]);
    }

    #[test]
    fn perft_pos_4() {
        check(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[1, 6, 264],
        );
    }

    #[test]
    fn perft_pos_5() {
        check(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[1, 44, 1486],
        );
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let position = Position::new();
        let divided = perft_divide(&position, 2);
        assert_eq!(divided.len(), 20);
        assert!(divided.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), perft(&position, 2));
    }
}
