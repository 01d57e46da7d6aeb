use matebench::board::Board;
use matebench::moves::movegen::generate_legal;
use matebench::moves::types::MoveList;

fn legal_moves(fen: &str) -> MoveList {
    let mut board: Board = fen.parse().unwrap();
    let mut pseudo = MoveList::new();
    let mut legal = MoveList::new();
    generate_legal(&mut board, &mut pseudo, &mut legal);
    legal
}

#[test]
fn kiwipete_has_the_known_legal_move_count() {
    // A standard perft/movegen stress position (promotions, castling on
    // both sides, en passant availability, pins).
    let moves = legal_moves(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    );
    assert_eq!(moves.len(), 48);
}

#[test]
fn promotion_generates_all_four_pieces() {
    let moves = legal_moves("8/P6k/8/8/8/8/8/6K1 w - - 0 1");
    let promo_moves: Vec<_> = moves.iter().filter(|mv| mv.is_promotion()).collect();
    assert_eq!(promo_moves.len(), 4);
}

#[test]
fn king_cannot_step_next_to_the_enemy_king() {
    let moves = legal_moves("8/8/8/3k4/8/3K4/8/8 w - - 0 1");
    let d4 = matebench::board::squares::parse_algebraic("d4").unwrap();
    assert!(!moves.iter().any(|mv| mv.to() == d4));
}

#[test]
fn blocked_queenside_path_leaves_only_kingside_castle() {
    // A bishop sits on d1, blocking only the queenside path between the
    // a1 rook and the king.
    let moves = legal_moves("4k3/8/8/8/8/8/8/R2bK2R w KQ - 0 1");
    let castles: Vec<_> = moves.iter().filter(|mv| mv.is_castle()).collect();
    assert_eq!(castles.len(), 1);
    let g1 = matebench::board::squares::parse_algebraic("g1").unwrap();
    assert_eq!(castles[0].to(), g1);
}
