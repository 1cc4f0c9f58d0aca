//! Perft conformance suite over the standard validation positions.
//!
//! The expensive depths are `#[ignore]`d; run them with
//! `cargo test --release -- --ignored`.

use chess_engine::movegen::perft::perft;
use chess_engine::Board;

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn perft_for_fen(fen: &str, depth: u32) -> u64 {
    let mut board = Board::from_fen(fen).expect("test FEN is valid");
    perft(&mut board, depth)
}

#[test]
fn perft_startpos() {
    assert_eq!(perft_for_fen(STARTPOS, 1), 20);
    assert_eq!(perft_for_fen(STARTPOS, 2), 400);
    assert_eq!(perft_for_fen(STARTPOS, 3), 8_902);
    assert_eq!(perft_for_fen(STARTPOS, 4), 197_281);
}

#[test]
#[ignore]
fn perft_startpos_deep() {
    assert_eq!(perft_for_fen(STARTPOS, 5), 4_865_609);
    assert_eq!(perft_for_fen(STARTPOS, 6), 119_060_324);
}

#[test]
fn perft_kiwipete() {
    assert_eq!(perft_for_fen(KIWIPETE, 1), 48);
    assert_eq!(perft_for_fen(KIWIPETE, 2), 2_039);
    assert_eq!(perft_for_fen(KIWIPETE, 3), 97_862);
}

#[test]
#[ignore]
fn perft_kiwipete_deep() {
    assert_eq!(perft_for_fen(KIWIPETE, 4), 4_085_603);
    assert_eq!(perft_for_fen(KIWIPETE, 5), 193_690_690);
}

#[test]
fn perft_position_3() {
    assert_eq!(perft_for_fen(POSITION_3, 1), 14);
    assert_eq!(perft_for_fen(POSITION_3, 2), 191);
    assert_eq!(perft_for_fen(POSITION_3, 3), 2_812);
    assert_eq!(perft_for_fen(POSITION_3, 4), 43_238);
    assert_eq!(perft_for_fen(POSITION_3, 5), 674_624);
}

#[test]
#[ignore]
fn perft_position_3_deep() {
    assert_eq!(perft_for_fen(POSITION_3, 6), 11_030_083);
}

#[test]
fn perft_position_4() {
    assert_eq!(perft_for_fen(POSITION_4, 1), 6);
    assert_eq!(perft_for_fen(POSITION_4, 2), 264);
    assert_eq!(perft_for_fen(POSITION_4, 3), 9_467);
    assert_eq!(perft_for_fen(POSITION_4, 4), 422_333);
}

#[test]
#[ignore]
fn perft_position_4_deep() {
    assert_eq!(perft_for_fen(POSITION_4, 5), 15_833_292);
}

#[test]
fn perft_position_5() {
    assert_eq!(perft_for_fen(POSITION_5, 1), 44);
    assert_eq!(perft_for_fen(POSITION_5, 2), 1_486);
    assert_eq!(perft_for_fen(POSITION_5, 3), 62_379);
}

#[test]
#[ignore]
fn perft_position_5_deep() {
    assert_eq!(perft_for_fen(POSITION_5, 4), 2_103_487);
}
