use matebench::board::Board;
use matebench::status::{position_status, GameStatus};

#[test]
fn startpos_is_in_play() {
    let mut board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        .parse()
        .unwrap();
    assert_eq!(position_status(&mut board), GameStatus::InPlay);
}

#[test]
fn queen_and_rook_mate_is_reported_through_make_unmake() {
    let mut board: Board = "6k1/8/6K1/8/8/8/5Q2/8 w - - 0 1".parse().unwrap();
    // Drive the mating move through the public API rather than hand-
    // crafting a mated FEN, so the test also exercises make/unmake.
    let mut pseudo = matebench::moves::types::MoveList::new();
    let mut legal = matebench::moves::types::MoveList::new();
    matebench::moves::movegen::generate_legal(&mut board, &mut pseudo, &mut legal);
    let g7 = matebench::board::squares::parse_algebraic("g7").unwrap();
    let mating_move = legal.iter().find(|mv| mv.to() == g7).copied().unwrap();
    matebench::moves::makeunmake::make_full(&mut board, mating_move);
    assert_eq!(position_status(&mut board), GameStatus::Checkmate);
}

#[test]
fn stalemate_is_distinguished_from_checkmate() {
    let mut board: Board = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
    assert_eq!(position_status(&mut board), GameStatus::Stalemate);
}

#[test]
fn fifty_move_claim_takes_priority_over_an_otherwise_live_position() {
    let mut board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 100 60".parse().unwrap();
    assert_eq!(position_status(&mut board), GameStatus::FiftyMoveDraw);
}
