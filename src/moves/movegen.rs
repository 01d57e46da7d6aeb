//! Pseudo-legal move generation (§4.3 C6), self-check filtering via
//! fast make/unmake, and castling legality via the attack probes.

use crate::attacks::is_attacked;
use crate::board::squares::{
    is_playable, rank_of, square_of, step, BISHOP_RAYS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_RAYS,
};
use crate::board::{
    code_color, is_diag_slider, is_strt_slider, piece_code, Board, Color, Piece, CASTLE_BK,
    CASTLE_BQ, CASTLE_WK, CASTLE_WQ, EMPTY, FULL, KING_KIND, KIND_MASK, PAWN_KIND,
};

use super::makeunmake::{leaves_mover_in_check, make_fast, unmake_fast};
use super::types::{Move, MoveList};

const PROMOTION_KINDS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// The square an en-passant capture lands on, given the file recorded in
/// `board.en_passant_file` and whose turn it is.
fn en_passant_target(board: &Board, file: u8) -> u8 {
    let rank = if board.side_to_move == Color::White {
        2
    } else {
        5
    };
    square_of(file, rank)
}

fn push_pawn_moves(board: &Board, from: u8, color: Color, out: &mut MoveList) {
    let (forward, start_rank, promo_rank) = match color {
        Color::White => (crate::board::squares::N, 6u8, 0u8),
        Color::Black => (crate::board::squares::S, 1u8, 7u8),
    };

    let one = step(from, forward);
    if is_playable(one) && board.at(one) == EMPTY {
        push_pawn_target(from, one, promo_rank, color, out);
        if rank_of(from) == start_rank {
            let two = step(one, forward);
            if is_playable(two) && board.at(two) == EMPTY {
                out.push(Move::new(from, two));
            }
        }
    }

    let captures: [i8; 2] = match color {
        Color::White => [crate::board::squares::NE, crate::board::squares::NW],
        Color::Black => [crate::board::squares::SE, crate::board::squares::SW],
    };
    for &offset in &captures {
        let to = step(from, offset);
        if !is_playable(to) {
            continue;
        }
        let target_code = board.at(to);
        if target_code != EMPTY && code_color(target_code) == Some(color.opposite()) {
            push_pawn_target(from, to, promo_rank, color, out);
        } else if target_code == EMPTY {
            if let Some(ep_file) = board.en_passant_file {
                if to == en_passant_target(board, ep_file) {
                    out.push(Move::new(from, to).with_en_passant(true));
                }
            }
        }
    }
}

fn push_pawn_target(from: u8, to: u8, promo_rank: u8, color: Color, out: &mut MoveList) {
    if rank_of(to) == promo_rank {
        for &promo in &PROMOTION_KINDS {
            out.push(Move::new(from, to).with_promotion(piece_code(color, promo)));
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn push_leaper_moves(board: &Board, from: u8, color: Color, offsets: &[i8], out: &mut MoveList) {
    for &offset in offsets {
        let to = step(from, offset);
        if !is_playable(to) {
            continue;
        }
        let code = board.at(to);
        if code == EMPTY || code_color(code) == Some(color.opposite()) {
            out.push(Move::new(from, to));
        }
    }
}

fn push_slider_moves(board: &Board, from: u8, color: Color, rays: &[i8], out: &mut MoveList) {
    for &offset in rays {
        let mut to = step(from, offset);
        loop {
            let code = board.at(to);
            if code == FULL {
                break;
            }
            if code == EMPTY {
                out.push(Move::new(from, to));
            } else {
                if code_color(code) == Some(color.opposite()) {
                    out.push(Move::new(from, to));
                }
                break;
            }
            to = step(to, offset);
        }
    }
}

/// A castling variant: king destination, rook origin, rights bit, and the
/// squares (besides the king's own square) that must be both empty and
/// unattacked for the king's leg of the path.
struct CastleVariant {
    king_to: u8,
    rook_from: u8,
    right_bit: u8,
    empty_squares: &'static [u8],
    king_path: &'static [u8],
}

fn castle_variants(color: Color) -> (u8, &'static [CastleVariant]) {
    const WHITE_VARIANTS: [CastleVariant; 2] = [
        CastleVariant {
            king_to: 97,
            rook_from: 98,
            right_bit: CASTLE_WK,
            empty_squares: &[96, 97],
            king_path: &[95, 96, 97],
        },
        CastleVariant {
            king_to: 93,
            rook_from: 91,
            right_bit: CASTLE_WQ,
            empty_squares: &[92, 93, 94],
            king_path: &[95, 94, 93],
        },
    ];
    const BLACK_VARIANTS: [CastleVariant; 2] = [
        CastleVariant {
            king_to: 27,
            rook_from: 28,
            right_bit: CASTLE_BK,
            empty_squares: &[26, 27],
            king_path: &[25, 26, 27],
        },
        CastleVariant {
            king_to: 23,
            rook_from: 21,
            right_bit: CASTLE_BQ,
            empty_squares: &[22, 23, 24],
            king_path: &[25, 24, 23],
        },
    ];
    match color {
        Color::White => (95, &WHITE_VARIANTS),
        Color::Black => (25, &BLACK_VARIANTS),
    }
}

fn push_castling_moves(board: &Board, color: Color, out: &mut MoveList) {
    let (king_home, variants) = castle_variants(color);
    if board.king_square(color) != king_home {
        return;
    }
    let opponent = color.opposite();
    for variant in variants {
        if board.castling_rights & variant.right_bit == 0 {
            continue;
        }
        if board.at(variant.rook_from) & KIND_MASK != crate::board::ROOK_KIND {
            continue;
        }
        if !variant.empty_squares.iter().all(|&sq| board.at(sq) == EMPTY) {
            continue;
        }
        if variant.king_path.iter().any(|&sq| is_attacked(board, sq, opponent)) {
            continue;
        }
        out.push(Move::new(king_home, variant.king_to).with_castle(true));
    }
}

/// Generate pseudo-legal moves for the side to move. Promotion, en-passant,
/// and castle flags are set; check-flag and captured-code are left for
/// make to fill in.
pub fn generate_pseudo_legal(board: &Board, out: &mut MoveList) {
    out.clear();
    let color = board.side_to_move;
    let squares: arrayvec::ArrayVec<u8, 16> = board.list(color).squares().iter().copied().collect();
    for from in squares {
        let code = board.at(from);
        let kind = code & KIND_MASK;
        if kind == PAWN_KIND {
            push_pawn_moves(board, from, color, out);
        } else if kind == KING_KIND {
            push_leaper_moves(board, from, color, &KING_OFFSETS, out);
        } else if kind == crate::board::KNIGHT_KIND {
            push_leaper_moves(board, from, color, &KNIGHT_OFFSETS, out);
        } else {
            if is_diag_slider(code) {
                push_slider_moves(board, from, color, &BISHOP_RAYS, out);
            }
            if is_strt_slider(code) {
                push_slider_moves(board, from, color, &ROOK_RAYS, out);
            }
        }
    }
    push_castling_moves(board, color, out);
}

/// Pseudo-legal moves filtered to those that do not leave the mover in
/// check, with the check-flag set on each survivor. Castling legality was
/// already verified (empty + unattacked path) during generation; this
/// pass additionally re-checks the king's final square for consistency
/// with every other move kind.
pub fn generate_legal(board: &mut Board, pseudo: &mut MoveList, out: &mut MoveList) {
    generate_pseudo_legal(board, pseudo);
    out.clear();
    let mover = board.side_to_move;
    let opponent = mover.opposite();
    for &mv in pseudo.iter() {
        let undo = make_fast(board, mv);
        let illegal = leaves_mover_in_check(board, mover);
        let gives_check = is_attacked(board, board.king_square(opponent), mover);
        unmake_fast(board, undo);
        if !illegal {
            out.push(mv.with_check(gives_check));
        }
    }
}
