//! UCI bot exposing the move generator through divide-perft.
//!
//! The bot understands `uci`, `isready`, `position`, `go perft <depth>` and
//! `quit`. Perft output is one `<move>: <count>` line per legal root move
//! followed by a total with elapsed time.

use std::io::{BufReader, Stdin, Stdout};
use std::time::Instant;

use chess_core::{Fen, Move, MoveKind, PieceType, Square};
use chess_engine::movegen::perft::perft_divide;
use chess_engine::{generate_pseudo_moves, Board};
use uci::{stdio_engine, GuiCommand, UciEngine};

type StdioEngine = UciEngine<BufReader<Stdin>, Stdout>;

const NAME: &str = "PerftBot 1.0";
const AUTHOR: &str = "the bot-perft authors";

/// Depth bound for `go perft`; deeper runs take minutes.
const MAX_PERFT_DEPTH: u32 = 6;

fn main() {
    let mut engine = stdio_engine();
    let mut board = Board::startpos();

    loop {
        let cmd = match engine.read_command() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("error reading command: {}", e);
                continue;
            }
        };

        match cmd {
            GuiCommand::Uci => {
                engine.send_id(NAME, AUTHOR).unwrap();
                engine.send_uciok().unwrap();
            }

            GuiCommand::IsReady => {
                engine.send_readyok().unwrap();
            }

            GuiCommand::Position { fen, moves } => {
                set_position(&mut board, fen.as_deref(), &moves);
            }

            GuiCommand::Go(opts) => {
                if let Some(depth) = opts.perft {
                    if (1..=MAX_PERFT_DEPTH).contains(&depth) {
                        run_perft(&mut board, depth, &mut engine);
                    }
                }
            }

            GuiCommand::Quit => break,

            GuiCommand::Unknown(line) => {
                if !line.is_empty() && !line.starts_with('#') {
                    engine
                        .send_line(&format!("Unknown command: '{}'.", line))
                        .unwrap();
                }
            }
        }
    }
}

/// Loads a position and applies the given moves. An unparseable FEN leaves
/// the board untouched; an unparseable or illegal move stops the move list
/// silently at that point.
fn set_position(board: &mut Board, fen: Option<&str>, moves: &[String]) {
    if board.set_fen(fen.unwrap_or(Fen::STARTPOS)).is_err() {
        return;
    }

    for uci_str in moves {
        let m = parse_move(board, uci_str);
        if m.is_none() || !board.make_move(m) {
            break;
        }
    }
}

fn run_perft(board: &mut Board, depth: u32, engine: &mut StdioEngine) {
    let start = Instant::now();

    let results = perft_divide(board, depth);
    let mut total = 0u64;
    for (m, nodes) in &results {
        engine.send_line(&format!("{}: {}", m, nodes)).unwrap();
        total += nodes;
    }

    let elapsed = start.elapsed().as_millis();
    engine
        .send_line(&format!("Total: {} nodes in {} ms", total, elapsed))
        .unwrap();
}

/// Shape check for a UCI long-algebraic move string.
fn is_move_str(s: &str) -> bool {
    let b = s.as_bytes();
    let file_ok = |c: u8| (b'a'..=b'h').contains(&c);
    let rank_ok = |c: u8| (b'1'..=b'8').contains(&c);

    if b.len() != 4 && b.len() != 5 {
        return false;
    }
    if !file_ok(b[0]) || !rank_ok(b[1]) || !file_ok(b[2]) || !rank_ok(b[3]) {
        return false;
    }
    if b[0] == b[2] && b[1] == b[3] {
        return false;
    }
    if b.len() == 5 && !matches!(b[4], b'n' | b'b' | b'r' | b'q') {
        return false;
    }
    true
}

/// Resolves a move string against the position's pseudo-legal moves.
/// Returns [`Move::NONE`] when nothing matches.
fn parse_move(board: &Board, s: &str) -> Move {
    if !is_move_str(s) {
        return Move::NONE;
    }

    let from = Square::from_algebraic(&s[0..2]).expect("shape checked");
    let to = Square::from_algebraic(&s[2..4]).expect("shape checked");

    let moves = generate_pseudo_moves(board);
    for &m in moves.as_slice() {
        if m.from() != from || m.to() != to {
            continue;
        }
        if m.kind() == MoveKind::Promotion {
            let Some(&promo) = s.as_bytes().get(4) else {
                continue;
            };
            let wanted = match promo {
                b'n' => PieceType::Knight,
                b'b' => PieceType::Bishop,
                b'r' => PieceType::Rook,
                _ => PieceType::Queen,
            };
            if m.promotion_type() == wanted {
                return m;
            }
            continue;
        }
        return m;
    }
    Move::NONE
}
