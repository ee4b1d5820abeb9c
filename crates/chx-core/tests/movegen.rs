//! Move generation and application through the public API.

use chx_core::{
    GameStatus, Position, apply_move, format_coordinate_move, game_status, generate_legal_moves,
    generate_pseudo_legal, new_game, parse_coordinate_move, perft, zobrist_hash,
};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const PROMOTION_RACE: &str = "8/P6k/8/8/8/8/p6K/8 w - - 0 1";

fn play(mut pos: Position, moves: &[&str]) -> Position {
    for text in moves {
        let legal = generate_legal_moves(&pos);
        let mv = parse_coordinate_move(text, &legal).unwrap_or_else(|| panic!("{text} not legal in {pos:?}"));
        pos = apply_move(&pos, mv).unwrap();
    }
    pos
}

/// Walk every line to `depth`, checking the incremental hash at each node.
fn check_hashes(pos: &Position, depth: usize) -> usize {
    assert_eq!(pos.hash(), zobrist_hash(pos), "hash drift at {pos:?}");
    if depth == 0 {
        return 1;
    }
    generate_legal_moves(pos)
        .as_slice()
        .iter()
        .map(|&mv| check_hashes(&apply_move(pos, mv).unwrap(), depth - 1))
        .sum()
}

#[test]
fn new_game_has_20_moves() {
    let pos = new_game();
    assert_eq!(generate_pseudo_legal(&pos).len(), 20);
    assert_eq!(generate_legal_moves(&pos).len(), 20);
}

#[test]
fn incremental_hash_matches_recomputation() {
    let kiwipete: Position = KIWIPETE.parse().unwrap();
    assert_eq!(check_hashes(&kiwipete, 2), 2_039);
    let race: Position = PROMOTION_RACE.parse().unwrap();
    check_hashes(&race, 3);
}

#[test]
fn illegal_moves_leave_the_position_untouched() {
    let pos: Position = KIWIPETE.parse().unwrap();
    let before = pos.clone();
    let mut rejected = 0;
    for &mv in &generate_pseudo_legal(&pos) {
        if apply_move(&pos, mv).is_err() {
            rejected += 1;
        }
        assert_eq!(pos, before);
    }
    assert_eq!(generate_pseudo_legal(&pos).len() - rejected, 48);
}

#[test]
fn coordinate_notation_round_trips() {
    let pos: Position = PROMOTION_RACE.parse().unwrap();
    let legal = generate_legal_moves(&pos);
    for &mv in &legal {
        let text = format_coordinate_move(mv);
        assert_eq!(parse_coordinate_move(&text, &legal), Some(mv), "{text}");
    }
}

#[test]
fn perft_after_opening_moves() {
    let pos = play(new_game(), &["e2e4", "e7e5"]);
    assert_eq!(perft(&pos, 1), 29);
}

#[test]
fn scholars_mate_is_checkmate() {
    let pos = play(new_game(), &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]);
    assert!(matches!(game_status(&pos), GameStatus::Checkmate { .. }));
    assert!(game_status(&pos).is_over());
}

#[test]
fn fen_survives_a_game() {
    let pos = play(new_game(), &["e2e4", "c7c5", "g1f3"]);
    assert_eq!(
        pos.to_fen(),
        "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}
