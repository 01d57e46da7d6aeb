//! Command-line driver (§6, §11): reads `go <depth>` + FEN lines from
//! stdin, repeated until EOF or an unrecognized leading token, runs the
//! iterative-deepening search, and reports one line per completed depth
//! plus a final best-move line. `display`/`d` and `perft <depth>` are the
//! read-only/validation verbs §11 adds on top of the core protocol.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use matebench::board::{code_piece, squares, Board, Color, EMPTY};
use matebench::engine::{Engine, EngineConfig};
use matebench::moves::types::Move;

fn main() {
    matebench::logger::init_logging("logs/matebench.log", "matebench=debug");

    let config = parse_config_flags();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut last_board: Option<Board> = None;

    loop {
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut tokens = trimmed.split_ascii_whitespace();
        let command = tokens.next().unwrap_or("");

        match command {
            "go" => {
                let depth = match tokens.next().and_then(|d| d.parse::<u32>().ok()) {
                    Some(depth) => depth,
                    None => fail("go requires an integer depth"),
                };
                let fen = read_fen_line(&mut lines, "go");
                match run_go(&mut out, &fen, depth, config) {
                    Ok(board) => last_board = Some(board),
                    Err(err) => fail(&format!("FEN error: {err}")),
                }
            }
            "perft" => {
                let depth = match tokens.next().and_then(|d| d.parse::<u32>().ok()) {
                    Some(depth) => depth,
                    None => fail("perft requires an integer depth"),
                };
                let fen = read_fen_line(&mut lines, "perft");
                match Engine::new(&fen, config) {
                    Ok(mut engine) => {
                        let nodes = engine.perft(depth);
                        let _ = writeln!(out, "{nodes}");
                        last_board = Some(engine.board);
                    }
                    Err(err) => fail(&format!("FEN error: {err}")),
                }
            }
            "display" | "d" => match &last_board {
                Some(board) => print_board(&mut out, board),
                None => eprintln!("no position loaded yet"),
            },
            "quit" | "exit" => break,
            _ => break,
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn read_fen_line(lines: &mut io::Lines<io::StdinLock<'_>>, command: &str) -> String {
    match lines.next() {
        Some(Ok(fen)) => fen.trim().to_string(),
        _ => fail(&format!("{command} requires a FEN line to follow")),
    }
}

/// Optional leading `--tt-mb <mb>` / `--zobrist-seed <seed>` flags,
/// hand-parsed to match this crate's existing token-based parsing instead
/// of pulling in a CLI-argument crate (§10.3).
fn parse_config_flags() -> EngineConfig {
    let mut config = EngineConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tt-mb" => {
                if let Some(value) = args.next().and_then(|v| v.parse().ok()) {
                    config.tt_mb = value;
                }
            }
            "--zobrist-seed" => {
                if let Some(value) = args.next().and_then(|v| v.parse().ok()) {
                    config.zobrist_seed = value;
                }
            }
            _ => {}
        }
    }
    config
}

fn run_go(
    out: &mut impl Write,
    fen: &str,
    depth: u32,
    config: EngineConfig,
) -> Result<Board, matebench::board::FenError> {
    let mut engine = Engine::new(fen, config)?;
    let root_board = engine.board.clone();
    let start = Instant::now();
    let reports = engine.iterative_deepen(depth);

    if reports.is_empty() {
        let elapsed = start.elapsed().as_secs_f64();
        let _ = writeln!(out, "no legal moves");
        let _ = writeln!(out, "bestmove none {elapsed:.3}");
        return Ok(engine.board);
    }

    for report in &reports {
        let elapsed = start.elapsed().as_secs_f64();
        let knodes = report.nodes as f64 / 1000.0;
        let knps = if elapsed > 0.0 { knodes / elapsed } else { 0.0 };
        let _ = writeln!(
            out,
            "{} {} {} {:.3} {:.1} {:.1} {}/{}",
            shorthand(&root_board, report.best_move),
            report.score,
            report.root_move_count,
            elapsed,
            knodes,
            knps,
            report.depth,
            report.seldepth,
        );
    }

    let elapsed = start.elapsed().as_secs_f64();
    let last = reports.last().expect("checked non-empty above");
    let _ = writeln!(
        out,
        "bestmove {} {elapsed:.3}",
        shorthand(&root_board, last.best_move),
    );

    Ok(engine.board)
}

/// Shorthand algebraic (§6): piece letter, from-square, `-`/`x`, to-square,
/// promotion letter, `+` on check; castling collapses to `0-0`/`0-0-0`
/// and en passant appends `ep`. `board` must be the position the move was
/// generated from, since the captured/moved piece is read off it directly
/// rather than off the packed move word (§3: those fields are filled in by
/// make, not by generation).
fn shorthand(board: &Board, mv: Move) -> String {
    let mut s = String::new();
    if mv.is_castle() {
        let to_file = squares::file_of(mv.to());
        s.push_str(if to_file == 6 { "0-0" } else { "0-0-0" });
    } else {
        let piece = code_piece(board.at(mv.from())).expect("from-square is occupied");
        s.push(piece.fen_char(Color::White).to_ascii_uppercase());
        s.push_str(&squares::algebraic(mv.from()));
        let is_capture = mv.is_en_passant() || board.at(mv.to()) != EMPTY;
        s.push(if is_capture { 'x' } else { '-' });
        s.push_str(&squares::algebraic(mv.to()));
        if mv.is_promotion() {
            if let Some(promo_piece) = code_piece(mv.promotion()) {
                s.push(promo_piece.fen_char(Color::White).to_ascii_uppercase());
            }
        }
        if mv.is_en_passant() {
            s.push_str("ep");
        }
    }
    if mv.is_check() {
        s.push('+');
    }
    s
}

/// `display`/`d` (§11): an 8x8 diagram plus the FEN, read-only convenience
/// with no effect on the core.
fn print_board(out: &mut impl Write, board: &Board) {
    for rank in 0..8u8 {
        let mut line = String::new();
        for file in 0..8u8 {
            let sq = squares::square_of(file, rank);
            let code = board.at(sq);
            let glyph = match code_piece(code) {
                Some(piece) => piece.fen_char(
                    matebench::board::code_color(code).expect("occupied square has a color"),
                ),
                None => '.',
            };
            line.push(glyph);
            line.push(' ');
        }
        let _ = writeln!(out, "{} {}", 8 - rank, line.trim_end());
    }
    let _ = writeln!(out, "  a b c d e f g h");
    let _ = writeln!(out, "{board}");
}
