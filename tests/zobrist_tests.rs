use matebench::engine::{Engine, EngineConfig};

#[test]
fn same_seed_produces_the_same_zobrist_key() {
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let a = Engine::new(fen, EngineConfig::default()).unwrap();
    let b = Engine::new(fen, EngineConfig::default()).unwrap();
    assert_eq!(a.board.zobrist, b.board.zobrist);
}

#[test]
fn different_positions_almost_always_hash_differently() {
    let a = Engine::new(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        EngineConfig::default(),
    )
    .unwrap();
    let b = Engine::new(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        EngineConfig::default(),
    )
    .unwrap();
    assert_ne!(a.board.zobrist, b.board.zobrist);
}

#[test]
fn explicit_seed_is_reproducible_across_engines() {
    let config = EngineConfig {
        tt_mb: 1,
        zobrist_seed: 0xC0FFEE,
    };
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let a = Engine::new(fen, config).unwrap();
    let b = Engine::new(fen, config).unwrap();
    assert_eq!(a.board.zobrist, b.board.zobrist);
}
