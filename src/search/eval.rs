//! Static evaluation (§4.5 C9): material, pawn structure, piece placement,
//! file activity, and an endgame/middlegame switch keyed by total piece
//! count. Scored from white's perspective; negated by the caller when
//! black is to move. Pure and side-effect-free — the spec's "update
//! selDepth to max(selDepth, ply)" is instead done by the search loop at
//! the call site, since `ply` is search state, not evaluation state.

use crate::board::squares::is_playable;
use crate::board::squares::{display_rank, file_of, rank_of, square_of, step, N, S};
use crate::board::{
    code_color, code_piece, is_strt_slider, Board, Color, Piece, BISHOP_KIND, EMPTY, KIND_MASK,
    KING_KIND, KNIGHT_KIND, PAWN_KIND, QUEEN_KIND, ROOK_KIND,
};

const ISOLATED_PAWN_PENALTY: i32 = -12;

/// Precomputed per-file-occupancy-mask pawn structure score (§4.5:
/// "a precomputed 256-entry table keyed by the per-color file-occupancy
/// bitmask of pawns"). Penalizes isolated pawns; doubled pawns on the same
/// file aren't visible to a presence-only mask and so don't appear here.
const fn build_pawn_file_table() -> [i32; 256] {
    let mut table = [0i32; 256];
    let mut mask = 0usize;
    while mask < 256 {
        let mut score = 0i32;
        let mut file = 0usize;
        while file < 8 {
            if mask & (1 << file) != 0 {
                let left = file > 0 && mask & (1 << (file - 1)) != 0;
                let right = file < 7 && mask & (1 << (file + 1)) != 0;
                if !left && !right {
                    score += ISOLATED_PAWN_PENALTY;
                }
            }
            file += 1;
        }
        table[mask] = score;
        mask += 1;
    }
    table
}

const PAWN_FILE_TABLE: [i32; 256] = build_pawn_file_table();

/// Center-preferring placement table shared by bishops, knights, and the
/// "develop the king" bonus. Indexed by `rank_of(sq) * 8 + file_of(sq)`;
/// symmetric under a vertical flip so mirroring the board and swapping
/// colors leaves it unchanged (§8 invariant 6).
#[rustfmt::skip]
const CENTER_TABLE: [i32; 64] = [
    -4, -2, -2, -2, -2, -2, -2, -4,
    -2,  0,  1,  1,  1,  1,  0, -2,
    -2,  1,  2,  3,  3,  2,  1, -2,
    -2,  1,  3,  4,  4,  3,  1, -2,
    -2,  1,  3,  4,  4,  3,  1, -2,
    -2,  1,  2,  3,  3,  2,  1, -2,
    -2,  0,  1,  1,  1,  1,  0, -2,
    -4, -2, -2, -2, -2, -2, -2, -4,
];

#[inline]
fn table_index(sq: u8) -> usize {
    rank_of(sq) as usize * 8 + file_of(sq) as usize
}

/// Center-preferring placement value for `sq`, shared between eval and the
/// search's forced-move extension (§4.6: "from-square's placement value is
/// at least the to-square's").
pub fn placement_value(sq: u8) -> i32 {
    CENTER_TABLE[table_index(sq)]
}

#[inline]
fn manhattan(a: u8, b: u8) -> i32 {
    (file_of(a) as i32 - file_of(b) as i32).abs() + (rank_of(a) as i32 - rank_of(b) as i32).abs()
}

/// A pawn's advancement toward promotion on a 1..=8 scale common to both
/// colors: white reads its display rank directly, black mirrors it.
#[inline]
fn advancement(sq: u8, color: Color) -> u8 {
    match color {
        Color::White => display_rank(sq),
        Color::Black => 9 - display_rank(sq),
    }
}

/// `rank_of` value of `color`'s own back rank (white: the 1st rank; black:
/// the 8th rank).
#[inline]
fn home_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}

fn pawn_file_mask(board: &Board, color: Color) -> u8 {
    let mut mask = 0u8;
    for &sq in board.list(color).squares() {
        if board.at(sq) & KIND_MASK == PAWN_KIND {
            mask |= 1 << file_of(sq);
        }
    }
    mask
}

fn is_passed(board: &Board, sq: u8, color: Color) -> bool {
    let file = file_of(sq) as i32;
    let r = rank_of(sq);
    let enemy = color.opposite();
    for &esq in board.list(enemy).squares() {
        if board.at(esq) & KIND_MASK != PAWN_KIND {
            continue;
        }
        if (file_of(esq) as i32 - file).abs() > 1 {
            continue;
        }
        let er = rank_of(esq);
        let ahead = match color {
            Color::White => er < r,
            Color::Black => er > r,
        };
        if ahead {
            return false;
        }
    }
    true
}

/// Passed-pawn reward: advancement bonus on ranks 4/5/6 (mirrored for
/// black), a straight-behind-slider ray scan, and a connected-7th-rank
/// bonus applied to both pawns of an adjacent-file pair (§4.5).
fn passed_pawn_score(board: &Board, sq: u8, color: Color) -> i32 {
    if !is_passed(board, sq, color) {
        return 0;
    }
    let adv = advancement(sq, color);
    let mut bonus = match adv {
        4 => 10,
        5 => 20,
        6 => 40,
        _ => 0,
    };

    let behind = match color {
        Color::White => S,
        Color::Black => N,
    };
    let mut cur = step(sq, behind);
    while is_playable(cur) {
        let code = board.at(cur);
        if code == EMPTY {
            cur = step(cur, behind);
            continue;
        }
        if let Some(c) = code_color(code) {
            if is_strt_slider(code) {
                bonus += if c == color { 10 } else { -10 };
            }
        }
        break;
    }

    if adv == 7 {
        let file = file_of(sq);
        let rank = rank_of(sq);
        for adj_file in [file as i32 - 1, file as i32 + 1] {
            if !(0..=7).contains(&adj_file) {
                continue;
            }
            let adj_sq = square_of(adj_file as u8, rank);
            if board.at(adj_sq) & KIND_MASK == PAWN_KIND
                && code_color(board.at(adj_sq)) == Some(color)
                && is_passed(board, adj_sq, color)
            {
                bonus += 14;
            }
        }
    }

    bonus
}

fn material_and_pawns(board: &Board, color: Color) -> i32 {
    let mut score = 0;
    for &sq in board.list(color).squares() {
        if let Some(piece) = code_piece(board.at(sq)) {
            score += piece.material_value();
        }
    }
    score += PAWN_FILE_TABLE[pawn_file_mask(board, color) as usize];
    for &sq in board.list(color).squares() {
        if board.at(sq) & KIND_MASK == PAWN_KIND {
            score += passed_pawn_score(board, sq, color);
        }
    }
    score
}

fn bishop_pair_bonus(board: &Board, color: Color) -> i32 {
    let bishops = board
        .list(color)
        .squares()
        .iter()
        .filter(|&&sq| board.at(sq) & KIND_MASK == BISHOP_KIND)
        .count();
    if bishops >= 2 {
        6
    } else {
        0
    }
}

/// Per-bishop placement plus a "bad bishop" penalty when it is the side's
/// only bishop and its own pawns crowd squares of its color.
fn bishop_score(board: &Board, sq: u8, color: Color) -> i32 {
    let mut score = CENTER_TABLE[table_index(sq)];
    let enemy_king = board.king_square(color.opposite());
    score += (14 - manhattan(sq, enemy_king)).max(0);

    let bishop_count = board
        .list(color)
        .squares()
        .iter()
        .filter(|&&s| board.at(s) & KIND_MASK == BISHOP_KIND)
        .count();
    if bishop_count == 1 {
        let bishop_is_light = (file_of(sq) + rank_of(sq)) % 2 == 1;
        let blocked_pawns = board
            .list(color)
            .squares()
            .iter()
            .filter(|&&psq| {
                board.at(psq) & KIND_MASK == PAWN_KIND
                    && ((file_of(psq) + rank_of(psq)) % 2 == 1) == bishop_is_light
            })
            .count();
        if blocked_pawns >= 4 {
            score -= 8;
        }
    }
    score
}

/// Per-knight placement: rank-0 (own back rank) is penalized, and a
/// pawn-supported knight on the 5th/6th rank is rewarded.
fn knight_score(board: &Board, sq: u8, color: Color) -> i32 {
    let mut score = CENTER_TABLE[table_index(sq)];
    if rank_of(sq) == home_rank(color) {
        score -= 9;
    }
    let adv = advancement(sq, color);
    if (adv == 5 || adv == 6) && crate::attacks::pawn_attacks(board, sq, color) {
        score += 6;
    }
    score
}

/// Open/semi-open file bonuses for rooks and queens, doubled-rooks, and
/// both-rooks-on-the-7th.
fn file_activity_score(board: &Board, color: Color) -> i32 {
    let own_mask = pawn_file_mask(board, color);
    let enemy_mask = pawn_file_mask(board, color.opposite());
    let enemy_king_file = file_of(board.king_square(color.opposite())) as i32;
    let seventh_rank = match color {
        Color::White => 1u8,
        Color::Black => 6u8,
    };

    let mut score = 0;
    let mut rook_files: arrayvec::ArrayVec<u8, 10> = arrayvec::ArrayVec::new();
    let mut rooks_on_7th = 0;

    for &sq in board.list(color).squares() {
        let kind = board.at(sq) & KIND_MASK;
        if kind != ROOK_KIND && kind != QUEEN_KIND {
            continue;
        }
        let file = file_of(sq);
        let bit = 1u8 << file;
        let open = own_mask & bit == 0 && enemy_mask & bit == 0;
        let semi_open = own_mask & bit == 0 && enemy_mask & bit != 0;
        if open {
            score += 5;
        } else if semi_open {
            score += 3;
        }
        if (file as i32 - enemy_king_file).abs() <= 1 {
            score += 3;
        }
        if kind == ROOK_KIND {
            let _ = rook_files.try_push(file);
            if rank_of(sq) == seventh_rank {
                rooks_on_7th += 1;
            }
        }
    }

    for i in 0..rook_files.len() {
        for j in (i + 1)..rook_files.len() {
            if rook_files[i] == rook_files[j] {
                score += 4;
            }
        }
    }
    if rooks_on_7th >= 2 {
        score += 5;
    }
    score
}

fn sorted_kinds(board: &Board, color: Color) -> arrayvec::ArrayVec<u8, 16> {
    let mut kinds: arrayvec::ArrayVec<u8, 16> = board
        .list(color)
        .squares()
        .iter()
        .map(|&sq| board.at(sq) & KIND_MASK)
        .filter(|&k| k != KING_KIND)
        .collect();
    kinds.sort_unstable();
    kinds
}

#[inline]
fn is_minor(kind: u8) -> bool {
    kind == KNIGHT_KIND || kind == BISHOP_KIND
}

/// Heuristic recognizer for material configurations judged drawn once the
/// total piece count (kings included) drops to 5 or fewer (§4.5). This is
/// not a full tablebase: it covers the shapes the spec names (bare kings,
/// lone minors, queen-for-queen, rook-plus-minor symmetries, balanced
/// minor-and-pawn endings) rather than every theoretically-drawn material
/// configuration.
fn is_recognized_draw(board: &Board) -> bool {
    if board.piece_count() > 5 {
        return false;
    }
    let white = sorted_kinds(board, Color::White);
    let black = sorted_kinds(board, Color::Black);

    if white.is_empty() && black.is_empty() {
        return true;
    }
    if (white.is_empty() && black.len() == 1 && is_minor(black[0]))
        || (black.is_empty() && white.len() == 1 && is_minor(white[0]))
    {
        return true;
    }
    if white.as_slice() == [QUEEN_KIND] && black.as_slice() == [QUEEN_KIND] {
        return true;
    }
    if white.len() == 2 && black.len() == 2 {
        let white_minor = white.iter().copied().find(|&k| is_minor(k));
        let black_minor = black.iter().copied().find(|&k| is_minor(k));
        if white.contains(&ROOK_KIND) && black.contains(&ROOK_KIND) {
            if let (Some(wm), Some(bm)) = (white_minor, black_minor) {
                if !(wm == KNIGHT_KIND && bm == KNIGHT_KIND) {
                    return true;
                }
            }
        }
        if white.contains(&PAWN_KIND) && black.contains(&PAWN_KIND) {
            if let (Some(wm), Some(bm)) = (white_minor, black_minor) {
                let white_val = Piece::from_kind_code(wm).unwrap().material_value()
                    + Piece::Pawn.material_value();
                let black_val = Piece::from_kind_code(bm).unwrap().material_value()
                    + Piece::Pawn.material_value();
                if white_val == black_val {
                    return true;
                }
            }
        }
    }
    let rook_and_minor = |kinds: &arrayvec::ArrayVec<u8, 16>| {
        kinds.len() == 2 && kinds.contains(&ROOK_KIND) && kinds.iter().any(|&k| is_minor(k))
    };
    if (rook_and_minor(&white) && black.as_slice() == [ROOK_KIND])
        || (rook_and_minor(&black) && white.as_slice() == [ROOK_KIND])
    {
        return true;
    }
    false
}

fn develop_king_bonus(board: &Board, color: Color) -> i32 {
    let enemy_has_queen = board
        .list(color.opposite())
        .squares()
        .iter()
        .any(|&sq| board.at(sq) & KIND_MASK == QUEEN_KIND);
    if enemy_has_queen {
        return 0;
    }
    CENTER_TABLE[table_index(board.king_square(color))] * 2
}

/// Opening/middlegame shaping used once both sides still have most of
/// their material (§4.5: `n >= 24`): center pawns, castling, the king
/// staying on its own rank, a pawn shield, and queens staying back.
fn opening_bonus(board: &Board, color: Color) -> i32 {
    let mut score = 0;

    for &sq in board.list(color).squares() {
        if board.at(sq) & KIND_MASK != PAWN_KIND {
            continue;
        }
        let file = file_of(sq);
        if (file == 3 || file == 4) && advancement(sq, color) >= 3 {
            score += 4;
        }
    }

    let king = board.king_square(color);
    let home = home_rank(color);
    let king_file = file_of(king);
    if rank_of(king) == home {
        if king_file == 6 || king_file == 2 {
            score += 15;
        }
        score += 5;

        let shield_rank = match color {
            Color::White => home - 1,
            Color::Black => home + 1,
        };
        for df in [-1i32, 0, 1] {
            let f = king_file as i32 + df;
            if (0..=7).contains(&f) {
                let sq = square_of(f as u8, shield_rank);
                if board.at(sq) & KIND_MASK != PAWN_KIND {
                    score -= 6;
                }
            }
        }
    }

    if let Some(&qsq) = board
        .list(color)
        .squares()
        .iter()
        .find(|&&s| board.at(s) & KIND_MASK == QUEEN_KIND)
    {
        if advancement(qsq, color) <= 2 {
            score += 4;
        }
    }

    score
}

/// Full static evaluation from the side-to-move's perspective, ready to use
/// directly in a negamax search without further negation.
pub fn evaluate(board: &Board) -> i32 {
    if is_recognized_draw(board) {
        return 0;
    }

    let mut white_score = material_and_pawns(board, Color::White)
        + bishop_pair_bonus(board, Color::White)
        + file_activity_score(board, Color::White);
    let mut black_score = material_and_pawns(board, Color::Black)
        + bishop_pair_bonus(board, Color::Black)
        + file_activity_score(board, Color::Black);

    for &sq in board.list(Color::White).squares() {
        match board.at(sq) & KIND_MASK {
            BISHOP_KIND => white_score += bishop_score(board, sq, Color::White),
            KNIGHT_KIND => white_score += knight_score(board, sq, Color::White),
            _ => {}
        }
    }
    for &sq in board.list(Color::Black).squares() {
        match board.at(sq) & KIND_MASK {
            BISHOP_KIND => black_score += bishop_score(board, sq, Color::Black),
            KNIGHT_KIND => black_score += knight_score(board, sq, Color::Black),
            _ => {}
        }
    }

    let n = board.piece_count();
    if (6..=18).contains(&n) {
        white_score += develop_king_bonus(board, Color::White);
        black_score += develop_king_bonus(board, Color::Black);
    } else if n >= 24 {
        white_score += opening_bonus(board, Color::White);
        black_score += opening_bonus(board, Color::Black);
    }

    let score = white_score - black_score;
    if board.side_to_move == Color::Black {
        -score
    } else {
        score
    }
}
