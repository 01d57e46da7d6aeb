use matebench::board::Board;
use matebench::engine::{Engine, EngineConfig};
use matebench::moves::makeunmake::{make_full, unmake_full};
use matebench::moves::movegen::generate_legal;
use matebench::moves::types::MoveList;
use matebench::status::is_fifty_move_draw;

#[test]
fn halfmove_clock_resets_on_capture_and_pawn_push() {
    let mut board: Board = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
        .parse()
        .unwrap();
    let before = board.halfmove_clock;

    let mut pseudo = MoveList::new();
    let mut legal = MoveList::new();
    generate_legal(&mut board, &mut pseudo, &mut legal);
    let knight_move = legal
        .iter()
        .find(|mv| !mv.is_capture() && !mv.is_promotion())
        .copied()
        .unwrap();
    let undo = make_full(&mut board, knight_move);
    assert_eq!(board.halfmove_clock, before + 1);
    unmake_full(&mut board, undo);
    assert_eq!(board.halfmove_clock, before);
}

#[test]
fn repetition_sloppy_fires_on_the_first_repeat_not_the_third() {
    let mut board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
    let mut pseudo = MoveList::new();
    let mut legal = MoveList::new();

    // Shuffle the kings back and forth: e1-d1-e1 (white), e8-d8-e8 (black).
    let mut play = |from: &str, to: &str, board: &mut Board| {
        generate_legal(board, &mut pseudo, &mut legal);
        let from = matebench::board::squares::parse_algebraic(from).unwrap();
        let to = matebench::board::squares::parse_algebraic(to).unwrap();
        let mv = legal
            .iter()
            .find(|mv| mv.from() == from && mv.to() == to)
            .copied()
            .unwrap();
        make_full(board, mv);
    };

    assert!(!board.repetition_sloppy());
    play("e1", "d1", &mut board);
    play("e8", "d8", &mut board);
    play("d1", "e1", &mut board);
    // Back to the starting arrangement after just two round trips' worth
    // of plies; the sloppy variant should already flag it, well before a
    // strict threefold count would.
    play("d8", "e8", &mut board);
    assert!(board.repetition_sloppy());
}

#[test]
fn fifty_move_counter_at_the_threshold_is_reported_by_status_helper() {
    let board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 100 60".parse().unwrap();
    assert!(is_fifty_move_draw(&board));
    let board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 99 60".parse().unwrap();
    assert!(!is_fifty_move_draw(&board));
}

#[test]
fn material_advantage_is_not_drowned_out_by_the_draw_filter() {
    // White is up a whole rook; the fifty-move/repetition draw checks in
    // negamax must not fire on a fresh position and flatten this to zero.
    let mut engine = Engine::new("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", EngineConfig::default())
        .unwrap();
    let reports = engine.iterative_deepen(1);
    assert!(reports[0].score > 100);
}
