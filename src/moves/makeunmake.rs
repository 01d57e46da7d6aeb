//! Make/unmake (§4.2 C5): fast mode for self-check legality filtering,
//! full mode for the actual search tree.

use crate::attacks::is_attacked;
use crate::board::squares::{file_of, rank_of, square_of};
use crate::board::{
    code_color, code_piece, piece_code, Board, Color, Piece, StateWord, CASTLE_BK, CASTLE_BQ,
    CASTLE_WK, CASTLE_WQ, EMPTY, KING_KIND, KIND_MASK, PAWN_KIND, ROOK_KIND,
};
use crate::hash::zobrist::zobrist_keys;
use crate::piece_list::Removal;

use super::types::Move;

const WHITE_QUEENSIDE_ROOK: u8 = 91; // a1
const WHITE_KINGSIDE_ROOK: u8 = 98; // h1
const BLACK_QUEENSIDE_ROOK: u8 = 21; // a8
const BLACK_KINGSIDE_ROOK: u8 = 28; // h8

/// Rook (from, to) for a castling move, keyed by the king's destination
/// square.
fn rook_castle_squares(king_to: u8) -> Option<(u8, u8)> {
    match king_to {
        97 => Some((WHITE_KINGSIDE_ROOK, 96)), // White O-O: h1 -> f1
        93 => Some((WHITE_QUEENSIDE_ROOK, 94)), // White O-O-O: a1 -> d1
        27 => Some((BLACK_KINGSIDE_ROOK, 26)), // Black O-O: h8 -> f8
        23 => Some((BLACK_QUEENSIDE_ROOK, 24)), // Black O-O-O: a8 -> d8
        _ => None,
    }
}

/// Castling right cleared when a rook leaves (or is captured on) a home
/// corner; 0 if `sq` is not one of the four corners.
fn rights_mask_for_rook_square(sq: u8) -> u8 {
    match sq {
        WHITE_QUEENSIDE_ROOK => CASTLE_WQ,
        WHITE_KINGSIDE_ROOK => CASTLE_WK,
        BLACK_QUEENSIDE_ROOK => CASTLE_BQ,
        BLACK_KINGSIDE_ROOK => CASTLE_BK,
        _ => 0,
    }
}

/// The from-rank/to-file square an en-passant capture removes a pawn from:
/// same rank as the mover's origin, same file as the destination.
fn en_passant_victim_square(from: u8, to: u8) -> u8 {
    (from / 10) * 10 + (to % 10)
}

/// Snapshot needed to reverse a fast-mode apply. Piece lists, Zobrist,
/// state word, and history are untouched by fast mode and so are not
/// captured here.
pub struct FastUndo {
    from: u8,
    to: u8,
    moved_code: u8,
    captured_code: u8,
    captured_sq: u8,
    castle_rook: Option<(u8, u8)>,
    prev_white_king: u8,
    prev_black_king: u8,
}

/// Apply `mv` in fast mode: mutate board cells and king squares only.
/// Used solely by the generator's self-check legality filter.
pub fn make_fast(board: &mut Board, mv: Move) -> FastUndo {
    let from = mv.from();
    let to = mv.to();
    let moved_code = board.at(from);
    let color = code_color(moved_code).expect("from-square must hold a piece");

    let (captured_sq, captured_code) = if mv.is_en_passant() {
        let sq = en_passant_victim_square(from, to);
        (sq, board.at(sq))
    } else {
        (to, board.at(to))
    };
    if captured_code != EMPTY {
        board.cells[captured_sq as usize] = EMPTY;
    }

    let placed_code = if mv.promotion() != 0 {
        mv.promotion()
    } else {
        moved_code
    };
    board.cells[from as usize] = EMPTY;
    board.cells[to as usize] = placed_code;

    let prev_white_king = board.white_king;
    let prev_black_king = board.black_king;
    if code_piece(moved_code) == Some(Piece::King) {
        match color {
            Color::White => board.white_king = to,
            Color::Black => board.black_king = to,
        }
    }

    let castle_rook = if mv.is_castle() {
        rook_castle_squares(to).map(|(rf, rt)| {
            board.cells[rf as usize] = EMPTY;
            board.cells[rt as usize] = piece_code(color, Piece::Rook);
            (rf, rt)
        })
    } else {
        None
    };

    FastUndo {
        from,
        to,
        moved_code,
        captured_code,
        captured_sq,
        castle_rook,
        prev_white_king,
        prev_black_king,
    }
}

/// Reverse a prior [`make_fast`].
pub fn unmake_fast(board: &mut Board, undo: FastUndo) {
    board.cells[undo.from as usize] = undo.moved_code;
    board.cells[undo.to as usize] = EMPTY;
    if undo.captured_code != EMPTY {
        board.cells[undo.captured_sq as usize] = undo.captured_code;
    }
    if let Some((rf, rt)) = undo.castle_rook {
        let color = code_color(undo.moved_code).expect("moved piece has a color");
        board.cells[rt as usize] = EMPTY;
        board.cells[rf as usize] = piece_code(color, Piece::Rook);
    }
    board.white_king = undo.prev_white_king;
    board.black_king = undo.prev_black_king;
}

/// True if `color`'s king is attacked after the fast-mode move just
/// applied (the self-check test §4.2/§4.3 uses to filter pseudo-legal
/// moves).
pub fn leaves_mover_in_check(board: &Board, mover: Color) -> bool {
    is_attacked(board, board.king_square(mover), mover.opposite())
}

/// Full-mode undo: every field make_full needs to restore exactly,
/// independent of recomputation.
pub struct Undo {
    from: u8,
    to: u8,
    moved_code: u8,
    captured_code: u8,
    captured_sq: u8,
    captured_removal: Option<Removal>,
    castle_rook: Option<(u8, u8)>,
    prev_state: StateWord,
    prev_zobrist: u64,
    prev_ply: u32,
    prev_halfmove: u32,
    prev_fullmove: u32,
}

/// Apply `mv` in full mode: Zobrist, piece lists, castling rights,
/// en-passant file, repetition history, and the fifty-move counter are
/// all updated; `mv`'s check-flag must already be set by the caller.
pub fn make_full(board: &mut Board, mv: Move) -> Undo {
    let keys = zobrist_keys();
    let from = mv.from();
    let to = mv.to();
    let mover = board.side_to_move;
    let moved_code = board.at(from);
    let moved_kind = moved_code & KIND_MASK;

    let prev_state = board.state_word();
    let prev_zobrist = board.zobrist;
    let prev_ply = board.ply;
    let prev_halfmove = board.halfmove_clock;
    let prev_fullmove = board.fullmove_number;

    let (captured_sq, captured_code) = if mv.is_en_passant() {
        let sq = en_passant_victim_square(from, to);
        (sq, board.at(sq))
    } else {
        (to, board.at(to))
    };

    let captured_removal = if captured_code != EMPTY {
        let captured_color = code_color(captured_code).expect("captured code carries a color");
        board.cells[captured_sq as usize] = EMPTY;
        board.zobrist ^= keys.piece[captured_code as usize][captured_sq as usize];
        Some(board.list_mut(captured_color).remove(captured_sq))
    } else {
        None
    };

    let placed_code = if mv.promotion() != 0 {
        mv.promotion()
    } else {
        moved_code
    };
    board.cells[from as usize] = EMPTY;
    board.cells[to as usize] = placed_code;
    board.zobrist ^= keys.piece[moved_code as usize][from as usize];
    board.zobrist ^= keys.piece[placed_code as usize][to as usize];
    board.list_mut(mover).move_square(from, to);

    if moved_kind == KING_KIND {
        match mover {
            Color::White => board.white_king = to,
            Color::Black => board.black_king = to,
        }
    }

    let castle_rook = if mv.is_castle() {
        rook_castle_squares(to).map(|(rf, rt)| {
            let rook_code = board.at(rf);
            board.cells[rf as usize] = EMPTY;
            board.cells[rt as usize] = rook_code;
            board.zobrist ^= keys.piece[rook_code as usize][rf as usize];
            board.zobrist ^= keys.piece[rook_code as usize][rt as usize];
            board.list_mut(mover).move_square(rf, rt);
            (rf, rt)
        })
    } else {
        None
    };

    let mut rights = board.castling_rights;
    if moved_kind == KING_KIND {
        rights &= !match mover {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if moved_kind == ROOK_KIND {
        rights &= !rights_mask_for_rook_square(from);
    }
    if captured_code & KIND_MASK == ROOK_KIND && captured_code != EMPTY {
        rights &= !rights_mask_for_rook_square(captured_sq);
    }
    board.castling_rights = rights;

    board.halfmove_clock = if captured_code != EMPTY || moved_kind == PAWN_KIND {
        0
    } else {
        prev_halfmove + 1
    };
    if mover == Color::Black {
        board.fullmove_number = prev_fullmove + 1;
    }

    board.en_passant_file = if moved_kind == PAWN_KIND {
        let from_rank = rank_of(from);
        let to_rank = rank_of(to);
        let double_push = (mover == Color::White && from_rank == 6 && to_rank == 4)
            || (mover == Color::Black && from_rank == 1 && to_rank == 3);
        if double_push {
            Some(file_of(to))
        } else {
            None
        }
    } else {
        None
    };

    board.side_to_move = mover.opposite();
    board.zobrist ^= keys.side_to_move;

    board.ply += 1;
    board.record_history();

    #[cfg(debug_assertions)]
    board.assert_zobrist_consistent();

    Undo {
        from,
        to,
        moved_code,
        captured_code,
        captured_sq,
        captured_removal,
        castle_rook,
        prev_state,
        prev_zobrist,
        prev_ply,
        prev_halfmove,
        prev_fullmove,
    }
}

/// Reverse a prior [`make_full`] exactly, from the snapshot it captured.
pub fn unmake_full(board: &mut Board, undo: Undo) {
    board.ply = undo.prev_ply;
    board.apply_state_word(undo.prev_state);

    let mover = board.side_to_move;
    if let Some((rf, rt)) = undo.castle_rook {
        let rook_code = board.at(rt);
        board.cells[rt as usize] = EMPTY;
        board.cells[rf as usize] = rook_code;
        board.list_mut(mover).move_square(rt, rf);
    }

    board.cells[undo.to as usize] = EMPTY;
    board.cells[undo.from as usize] = undo.moved_code;
    board.list_mut(mover).move_square(undo.to, undo.from);

    if undo.moved_code & KIND_MASK == KING_KIND {
        match mover {
            Color::White => board.white_king = undo.from,
            Color::Black => board.black_king = undo.from,
        }
    }

    if let Some(removal) = undo.captured_removal {
        let captured_color = code_color(undo.captured_code).expect("captured code carries a color");
        board.cells[undo.captured_sq as usize] = undo.captured_code;
        board.list_mut(captured_color).undo_remove(removal);
    }

    board.halfmove_clock = undo.prev_halfmove;
    board.fullmove_number = undo.prev_fullmove;
    board.zobrist = undo.prev_zobrist;

    #[cfg(debug_assertions)]
    board.assert_zobrist_consistent();
}

/// Snapshot needed to reverse a null move (§4.6: "pass turn (flip
/// side-to-move key, push ply...)"). Deliberately does not touch piece
/// lists, the fifty-move counter, or repetition history — a null move is
/// a search-only device, not a real position to remember.
pub struct NullUndo {
    prev_ep: Option<u8>,
    prev_zobrist: u64,
}

/// Pass the turn: clear the en-passant file (it cannot be captured after a
/// null move), flip the side-to-move Zobrist bit, and advance `ply`.
pub fn make_null(board: &mut Board) -> NullUndo {
    let keys = zobrist_keys();
    let undo = NullUndo {
        prev_ep: board.en_passant_file,
        prev_zobrist: board.zobrist,
    };
    board.en_passant_file = None;
    board.side_to_move = board.side_to_move.opposite();
    board.zobrist ^= keys.side_to_move;
    board.ply += 1;
    undo
}

/// Reverse a prior [`make_null`].
pub fn unmake_null(board: &mut Board, undo: NullUndo) {
    board.ply -= 1;
    board.side_to_move = board.side_to_move.opposite();
    board.en_passant_file = undo.prev_ep;
    board.zobrist = undo.prev_zobrist;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> u8 {
        crate::board::squares::parse_algebraic(s).unwrap()
    }

    #[test]
    fn quiet_pawn_push_round_trips() {
        let mut board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        let before = board.clone();
        let mv = Move::new(sq("e2"), sq("e4"));
        let undo = make_full(&mut board, mv);
        assert_eq!(board.side_to_move, Color::Black);
        assert_eq!(board.en_passant_file, Some(4));
        unmake_full(&mut board, undo);
        assert_eq!(board.cells, before.cells);
        assert_eq!(board.zobrist, before.zobrist);
        assert_eq!(board.side_to_move, before.side_to_move);
        assert_eq!(board.en_passant_file, before.en_passant_file);
        assert_eq!(board.castling_rights, before.castling_rights);
    }

    #[test]
    fn capture_round_trips_piece_list() {
        let mut board: Board = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        let before = board.clone();
        let mv = Move::new(sq("e4"), sq("d5"));
        let undo = make_full(&mut board, mv);
        assert_eq!(board.list(Color::Black).len(), 15);
        unmake_full(&mut board, undo);
        assert_eq!(board.list(Color::Black).len(), 16);
        assert_eq!(board.cells, before.cells);
        assert_eq!(board.zobrist, before.zobrist);
    }

    #[test]
    fn en_passant_round_trips() {
        let mut board: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        let before = board.clone();
        let mv = Move::new(sq("e5"), sq("d6")).with_en_passant(true);
        let undo = make_full(&mut board, mv);
        assert_eq!(board.at(sq("d5")), EMPTY);
        assert_eq!(board.list(Color::Black).len(), 15);
        unmake_full(&mut board, undo);
        assert_eq!(board.cells, before.cells);
        assert_eq!(board.list(Color::Black).len(), 16);
    }

    #[test]
    fn castling_moves_rook_and_round_trips() {
        let mut board: Board = "4k3/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        let before = board.clone();
        let mv = Move::new(sq("e1"), sq("g1")).with_castle(true);
        let undo = make_full(&mut board, mv);
        assert_eq!(board.at(sq("f1")) & KIND_MASK, ROOK_KIND);
        assert_eq!(board.at(sq("h1")), EMPTY);
        assert_eq!(board.castling_rights, 0);
        unmake_full(&mut board, undo);
        assert_eq!(board.cells, before.cells);
        assert_eq!(board.castling_rights, before.castling_rights);
        assert_eq!(board.zobrist, before.zobrist);
    }

    #[test]
    fn fast_mode_leaves_lists_and_zobrist_untouched() {
        let mut board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        let before_zobrist = board.zobrist;
        let before_len = board.list(Color::White).len();
        let mv = Move::new(sq("e2"), sq("e4"));
        let undo = make_fast(&mut board, mv);
        assert_eq!(board.zobrist, before_zobrist);
        assert_eq!(board.list(Color::White).len(), before_len);
        unmake_fast(&mut board, undo);
        assert_eq!(board.at(sq("e2")) & KIND_MASK, PAWN_KIND);
    }

    #[test]
    fn null_move_flips_side_and_round_trips() {
        let mut board: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        let before = board.clone();
        let undo = make_null(&mut board);
        assert_eq!(board.side_to_move, Color::Black);
        assert_eq!(board.en_passant_file, None);
        unmake_null(&mut board, undo);
        assert_eq!(board.side_to_move, before.side_to_move);
        assert_eq!(board.en_passant_file, before.en_passant_file);
        assert_eq!(board.zobrist, before.zobrist);
    }
}
