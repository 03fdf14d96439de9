//! End-to-end checks of the legal move finder through the public API.

use chess_core::movegen::MoveGenerator;
use chess_core::moves::{CompactMove, Move};
use chess_core::position::Position;
use chess_core::types::Square;
use chess_core::ChessError;
use pretty_assertions::assert_eq;

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn uci_list(moves: &[Move]) -> Vec<String> {
    let mut list: Vec<String> = moves.iter().map(|mv| mv.to_uci()).collect();
    list.sort();
    list
}

fn play(fen: &str, moves: &[&str]) -> Position {
    let mut position = Position::from_fen(fen).unwrap();
    for uci in moves {
        let mv = position.find_legal_move(uci).unwrap();
        position = position.with_move(&mv);
    }
    position
}

#[test]
fn test_castling_through_attacked_square() {
    let position = Position::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
    let pseudo = uci_list(&MoveGenerator::new(&position).pseudo_legal_moves(sq("e1")));
    let legal = uci_list(&position.legal_moves_for_piece(sq("e1")));

    assert!(pseudo.contains(&"e1g1".to_string()));
    assert!(!legal.contains(&"e1g1".to_string()));
    assert!(legal.contains(&"e1c1".to_string()));
}

#[test]
fn test_castling_onto_attacked_square() {
    // the c5 bishop covers g1 only; e1 and f1 are safe
    let position = Position::from_fen("r3k2r/8/8/2b5/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert!(!position.is_in_check());

    let pseudo = uci_list(&MoveGenerator::new(&position).pseudo_legal_moves(sq("e1")));
    let legal = uci_list(&position.legal_moves_for_piece(sq("e1")));
    assert!(pseudo.contains(&"e1g1".to_string()));
    assert!(!legal.contains(&"e1g1".to_string()));
    assert!(legal.contains(&"e1c1".to_string()));
}

#[test]
fn test_no_castling_out_of_check() {
    let position = Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert!(position.is_in_check());

    let pseudo = uci_list(&MoveGenerator::new(&position).pseudo_legal_moves(sq("e1")));
    let legal = uci_list(&position.legal_moves());
    for castle in ["e1g1", "e1c1"] {
        assert!(pseudo.contains(&castle.to_string()));
        assert!(!legal.contains(&castle.to_string()));
    }
}

#[test]
fn test_queenside_castling_ignores_attacked_b_file() {
    let position = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
    let legal = uci_list(&position.legal_moves_for_piece(sq("e1")));
    assert!(legal.contains(&"e1c1".to_string()));
}

#[test]
fn test_castling_moves_the_rook() {
    let position = play("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", &["e1g1"]);
    assert_eq!(position.to_fen().unwrap(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");

    let position = play("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", &["e8c8"]);
    assert_eq!(position.to_fen().unwrap(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
}

#[test]
fn test_pinned_knight_cannot_move() {
    let position = Position::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
    assert!(position.legal_moves_for_piece(sq("e2")).is_empty());
    assert!(!MoveGenerator::new(&position).pseudo_legal_moves(sq("e2")).is_empty());
}

#[test]
fn test_en_passant_exposing_king_is_illegal() {
    let position = Position::from_fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 1").unwrap();
    assert_eq!(uci_list(&position.legal_moves_for_piece(sq("b5"))), vec!["b5b6"]);
}

#[test]
fn test_en_passant_capture() {
    let position = play("8/8/8/KPp5/8/8/8/7k w - c6 0 1", &["b5c6"]);
    assert_eq!(position.to_fen().unwrap(), "8/8/2P5/K7/8/8/8/7k b - - 0 1");
}

#[test]
fn test_promotion_choices() {
    let position = Position::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
    assert_eq!(
        uci_list(&position.legal_moves_for_piece(sq("a7"))),
        vec!["a7a8b", "a7a8n", "a7a8q", "a7a8r"]
    );
    let position = play("8/P7/8/8/8/8/8/k6K w - - 0 1", &["a7a8n"]);
    assert_eq!(position.to_fen().unwrap(), "N7/8/8/8/8/8/8/k6K b - - 0 1");
}

#[test]
fn test_checkmate_and_stalemate_have_no_moves() {
    let mate =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    assert!(mate.legal_moves().is_empty());
    assert!(mate.is_in_check());

    let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(stalemate.legal_moves().is_empty());
    assert!(!stalemate.is_in_check());
}

#[test]
fn test_opening_sequence() {
    let position = play(
        chess_core::STARTING_POSITION_FEN,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"],
    );
    assert_eq!(
        position.to_fen().unwrap(),
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 5 4"
    );
}

#[test]
fn test_illegal_input_is_reported() {
    assert!(matches!(Position::from_fen("garbage"), Err(ChessError::InvalidFen(_))));
    let position = Position::new();
    assert_eq!(
        position.find_legal_move("e2e5"),
        Err(ChessError::UnknownMove("e2e5".to_string()))
    );
}

#[test]
fn test_every_kiwipete_move_survives_packing() {
    let position = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    for mv in position.legal_moves() {
        assert_eq!(Move::try_from(CompactMove::from(mv)), Ok(mv));
    }
}
