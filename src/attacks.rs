//! Attack probes (§4.1 C4): by-color tests for whether a square is
//! attacked, and the "in check" predicate built on top of them.

use crate::board::squares::{is_playable, step, BISHOP_RAYS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_RAYS};
use crate::board::{code_color, is_diag_slider, is_strt_slider, Board, Color, EMPTY, FULL};

#[inline]
fn pawn_attackers_of(color: Color) -> [i8; 2] {
    // Squares a pawn of `color` attacks from are diagonally "behind" (from
    // the target square's perspective) in the direction the pawn advances.
    match color {
        Color::White => [crate::board::squares::SE, crate::board::squares::SW],
        Color::Black => [crate::board::squares::NE, crate::board::squares::NW],
    }
}

/// True if any pawn of `color` attacks `sq`.
pub fn pawn_attacks(board: &Board, sq: u8, color: Color) -> bool {
    for &offset in &pawn_attackers_of(color) {
        let from = step(sq, offset);
        if is_playable(from) {
            let code = board.at(from);
            if code_color(code) == Some(color) && code & crate::board::KIND_MASK == crate::board::PAWN_KIND {
                return true;
            }
        }
    }
    false
}

/// True if any knight of `color` attacks `sq`.
pub fn knight_attacks(board: &Board, sq: u8, color: Color) -> bool {
    for &offset in &KNIGHT_OFFSETS {
        let from = step(sq, offset);
        if is_playable(from) {
            let code = board.at(from);
            if code_color(code) == Some(color) && code & crate::board::KIND_MASK == crate::board::KNIGHT_KIND {
                return true;
            }
        }
    }
    false
}

/// True if the king of `color` is adjacent to `sq`.
pub fn king_attacks(board: &Board, sq: u8, color: Color) -> bool {
    for &offset in &KING_OFFSETS {
        let from = step(sq, offset);
        if is_playable(from) {
            let code = board.at(from);
            if code_color(code) == Some(color) && code & crate::board::KIND_MASK == crate::board::KING_KIND {
                return true;
            }
        }
    }
    false
}

/// True if a diagonal slider (bishop or queen) of `color` attacks `sq` by
/// ray scan, stopped by the first occupied square along each diagonal.
pub fn diag_slider_attacks(board: &Board, sq: u8, color: Color) -> bool {
    for &offset in &BISHOP_RAYS {
        let mut cur = step(sq, offset);
        loop {
            let code = board.at(cur);
            if code == FULL {
                break;
            }
            if code != EMPTY {
                if code_color(code) == Some(color) && is_diag_slider(code) {
                    return true;
                }
                break;
            }
            cur = step(cur, offset);
        }
    }
    false
}

/// True if a straight slider (rook or queen) of `color` attacks `sq` by ray
/// scan, stopped by the first occupied square along each file/rank.
pub fn strt_slider_attacks(board: &Board, sq: u8, color: Color) -> bool {
    for &offset in &ROOK_RAYS {
        let mut cur = step(sq, offset);
        loop {
            let code = board.at(cur);
            if code == FULL {
                break;
            }
            if code != EMPTY {
                if code_color(code) == Some(color) && is_strt_slider(code) {
                    return true;
                }
                break;
            }
            cur = step(cur, offset);
        }
    }
    false
}

/// True if any piece of `color` attacks `sq`.
pub fn is_attacked(board: &Board, sq: u8, color: Color) -> bool {
    pawn_attacks(board, sq, color)
        || knight_attacks(board, sq, color)
        || king_attacks(board, sq, color)
        || diag_slider_attacks(board, sq, color)
        || strt_slider_attacks(board, sq, color)
}

/// True if `color`'s king is currently attacked by the opposite color.
pub fn in_check(board: &Board, color: Color) -> bool {
    is_attacked(board, board.king_square(color), color.opposite())
}
