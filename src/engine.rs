//! The engine value (§9: "encapsulate in an engine value... search methods
//! take an exclusive reference to it"). Board, transposition table, killer
//! table, and the node/selective-depth counters the iterative-deepening
//! driver needs all live here so the CLI binary and the test suite drive
//! the exact same entry point (§11).

use crate::board::{Board, FenError};
use crate::hash::zobrist::{set_zobrist_seed, DEFAULT_SEED};
use crate::moves::makeunmake::{make_full, unmake_full};
use crate::moves::movegen::generate_legal;
use crate::moves::types::{Move, MoveList};
use crate::search::tt::TranspositionTable;

/// Stack-depth ceiling enforced at quiescence entry and by extension
/// accounting (§5).
pub const MAXDP: usize = 128;

const ROOT_ALPHA: i32 = -32767;
const ROOT_BETA: i32 = 32767;

/// Construction parameters for an [`Engine`] (§10.3): transposition-table
/// size and Zobrist seed. No environment/file configuration surface exists
/// for this benchmark kernel.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub tt_mb: usize,
    pub zobrist_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tt_mb: 4,
            zobrist_seed: DEFAULT_SEED,
        }
    }
}

/// One completed depth of the iterative-deepening driver (§4.8).
#[derive(Debug, Clone, Copy)]
pub struct DepthReport {
    pub depth: u32,
    pub best_move: Move,
    pub score: i32,
    pub root_move_count: usize,
    pub nodes: u64,
    pub seldepth: u32,
}

pub struct Engine {
    pub board: Board,
    pub(crate) tt: TranspositionTable,
    pub(crate) killers: Vec<[Option<Move>; 2]>,
    pub nodes: u64,
    pub seldepth: u32,
}

impl Engine {
    /// Parse `fen` and build an engine around it. The Zobrist seed must be
    /// fixed before the board's keys are computed from scratch, so engine
    /// construction is the only place a `Board` gets built from FEN text
    /// (§5: "Zobrist-randomness tables are initialized once at startup").
    pub fn new(fen: &str, config: EngineConfig) -> Result<Self, FenError> {
        set_zobrist_seed(config.zobrist_seed);
        let board: Board = fen.parse()?;
        Ok(Engine {
            board,
            tt: TranspositionTable::new(config.tt_mb.max(1)),
            killers: vec![[None, None]; MAXDP],
            nodes: 0,
            seldepth: 0,
        })
    }

    pub fn tt_capacity(&self) -> usize {
        self.tt.capacity()
    }

    pub fn reset_counters(&mut self) {
        self.nodes = 0;
        self.seldepth = 0;
    }

    /// Leaf-count driver over the move generator alone, independent of
    /// evaluation or search (§11 `perft`).
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut pseudo = MoveList::new();
        let mut legal = MoveList::new();
        generate_legal(&mut self.board, &mut pseudo, &mut legal);
        if depth == 1 {
            return legal.len() as u64;
        }
        let mut total = 0u64;
        for &mv in legal.iter() {
            let undo = make_full(&mut self.board, mv);
            total += self.perft(depth - 1);
            unmake_full(&mut self.board, undo);
        }
        total
    }

    /// Legal, check-flagged moves for the side to move.
    pub fn root_moves(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        let mut legal = MoveList::new();
        generate_legal(&mut self.board, &mut pseudo, &mut legal);
        legal
    }

    /// Run the iterative-deepening driver (§4.8) from depth 1 through
    /// `max_depth`, reordering the root move list by score between
    /// iterations (a stable sort by descending score, which produces the
    /// same final order as the spec's "stable bubble pass" — any stable
    /// sort over the same comparator agrees on the final order). Returns
    /// one report per completed depth, or an empty vector if the root has
    /// no legal moves at all (checkmate or stalemate; see
    /// [`crate::status`]).
    pub fn iterative_deepen(&mut self, max_depth: u32) -> Vec<DepthReport> {
        let mut root_moves = self.root_moves();
        if root_moves.is_empty() {
            return Vec::new();
        }
        let root_move_count = root_moves.len();
        let mut reports = Vec::with_capacity(max_depth as usize);

        for depth in 1..=max_depth {
            let ext_budget = 2 * depth + 2;
            let mut scores = vec![0i32; root_moves.len()];
            let mut best_idx = 0usize;
            let mut best_score = i32::MIN;

            for (i, &mv) in root_moves.iter().enumerate() {
                let undo = make_full(&mut self.board, mv);
                let score = -self.negamax(
                    -ROOT_BETA,
                    -ROOT_ALPHA,
                    1,
                    depth,
                    false,
                    mv.is_check(),
                    ext_budget,
                );
                unmake_full(&mut self.board, undo);
                tracing::trace!(depth, move_index = i, score, "root move searched");
                scores[i] = score;
                if score > best_score {
                    best_score = score;
                    best_idx = i;
                }
            }

            let mut order: Vec<usize> = (0..root_moves.len()).collect();
            order.sort_by(|&a, &b| scores[b].cmp(&scores[a]));

            let mut sorted_moves = MoveList::new();
            let mut sorted_scores = vec![0i32; order.len()];
            let mut new_best_idx = 0usize;
            for (new_i, &old_i) in order.iter().enumerate() {
                sorted_moves.push(root_moves[old_i]);
                sorted_scores[new_i] = scores[old_i];
                if old_i == best_idx {
                    new_best_idx = new_i;
                }
            }
            root_moves = sorted_moves;
            best_idx = new_best_idx;

            tracing::debug!(
                depth,
                score = sorted_scores[best_idx],
                nodes = self.nodes,
                seldepth = self.seldepth,
                "completed depth"
            );

            reports.push(DepthReport {
                depth,
                best_move: root_moves[best_idx],
                score: sorted_scores[best_idx],
                root_move_count,
                nodes: self.nodes,
                seldepth: self.seldepth,
            });
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_from_startpos_reports_twenty_root_moves() {
        let mut engine = Engine::new(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(engine.root_moves().len(), 20);
    }

    #[test]
    fn perft_depth_one_matches_root_move_count() {
        let mut engine = Engine::new(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(engine.perft(1), 20);
    }

    #[test]
    fn perft_depth_two_matches_known_startpos_count() {
        let mut engine = Engine::new(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(engine.perft(2), 400);
    }

    #[test]
    fn iterative_deepen_reports_one_entry_per_depth() {
        let mut engine = Engine::new(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            EngineConfig::default(),
        )
        .unwrap();
        let reports = engine.iterative_deepen(2);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].depth, 1);
        assert_eq!(reports[1].depth, 2);
    }

    #[test]
    fn iterative_deepen_on_stalemate_reports_nothing() {
        let mut engine = Engine::new("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", EngineConfig::default())
            .unwrap();
        assert!(engine.iterative_deepen(3).is_empty());
    }
}
