//! Perft (performance test) node counting.
//!
//! Perft counts the leaf nodes of the legal-move tree at a fixed depth and
//! is the conformance oracle for the generator and the make/unmake state
//! machine. Every leaf is reached through make/unmake; there is no bulk
//! counting at depth one, so the state machine itself stays under test.

use super::generate_pseudo_moves;
use crate::Board;
use chess_core::Move;

/// Counts the legal leaf nodes exactly `depth` plies below the current
/// position.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_pseudo_moves(board);
    let mut nodes = 0;
    for &m in &moves {
        if !board.make_move(m) {
            continue;
        }
        nodes += perft(board, depth - 1);
        board.unmake_move();
    }
    nodes
}

/// Divide-perft: the subtree count of every legal root move, sorted by UCI
/// notation for stable output.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    debug_assert!(depth >= 1);

    let moves = generate_pseudo_moves(board);
    let mut results = Vec::with_capacity(moves.len());
    for &m in &moves {
        if !board.make_move(m) {
            continue;
        }
        let nodes = perft(board, depth - 1);
        board.unmake_move();
        results.push((m, nodes));
    }

    results.sort_by_key(|(m, _)| m.to_uci());
    results
}
