//! Root-level game status (§7): the search driver itself only ever sees
//! move counts and scores, but a caller sitting above it — the CLI, a test
//! — needs to know whether a position is actually over.

use crate::attacks::in_check;
use crate::board::Board;
use crate::moves::movegen::generate_legal;
use crate::moves::types::MoveList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    Checkmate,
    Stalemate,
    FiftyMoveDraw,
}

/// Fifty-move counter reaching 100 half-moves is a claimable draw (§7); it
/// is checked ahead of move generation since an empty move list and a
/// stale fifty-move counter can coincide and the clock is cheaper to read.
pub fn is_fifty_move_draw(board: &Board) -> bool {
    board.halfmove_clock >= 100
}

/// Determine whether `board`'s position is still in play, and if not,
/// which terminal condition applies (§7). Mirrors the priority the search
/// itself uses at the root: the draw clock is checked before the move
/// list, since an empty move list under a live fifty-move claim is still
/// reported as the draw.
pub fn position_status(board: &mut Board) -> GameStatus {
    if is_fifty_move_draw(board) {
        return GameStatus::FiftyMoveDraw;
    }

    let mut pseudo = MoveList::new();
    let mut legal = MoveList::new();
    generate_legal(board, &mut pseudo, &mut legal);
    if legal.is_empty() {
        if in_check(board, board.side_to_move) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else {
        GameStatus::InPlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_in_play() {
        let mut board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(position_status(&mut board), GameStatus::InPlay);
    }

    #[test]
    fn back_rank_mate_is_checkmate() {
        let mut board: Board = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        // White to move here, so play the mating rook move first.
        let mut pseudo = MoveList::new();
        let mut legal = MoveList::new();
        generate_legal(&mut board, &mut pseudo, &mut legal);
        let a8 = crate::board::squares::parse_algebraic("a8").unwrap();
        let mv = legal.iter().find(|mv| mv.to() == a8).copied().unwrap();
        let _undo = crate::moves::makeunmake::make_full(&mut board, mv);
        assert_eq!(position_status(&mut board), GameStatus::Checkmate);
    }

    #[test]
    fn stalemate_position_is_reported() {
        let mut board: Board = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert_eq!(position_status(&mut board), GameStatus::Stalemate);
    }

    #[test]
    fn fifty_move_counter_reports_claimed_draw() {
        let mut board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 100 60".parse().unwrap();
        assert_eq!(position_status(&mut board), GameStatus::FiftyMoveDraw);
    }
}
