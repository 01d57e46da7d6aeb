//! Zobrist hashing (§3 C3), keyed by piece code and mailbox square rather
//! than the usual color/piece/square triple, since the board cell already
//! packs color and kind together.
//!
//! Keys are generated from a deterministic seed, set once per process
//! (§5: "Zobrist-randomness tables are initialized once at startup").
//! The benchmark's determinism requirement depends on identical keys
//! across runs for the same seed, so there is no "random" mode.

use crate::board::squares::GRID_SIZE;
use once_cell::sync::OnceCell;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Seed used when no engine has called [`set_zobrist_seed`] before the
/// first table access (e.g. in unit tests that build a `Board` directly).
pub const DEFAULT_SEED: u64 = 1;

/// Highest piece code a board cell can hold (`BLACK | QUEEN_KIND`); sized
/// generously so the table can be indexed directly by raw code byte.
const CODE_SPACE: usize = 64;

pub struct ZobristKeys {
    /// Indexed `[code][square]`. Only entries for real piece codes are
    /// populated with non-zero values; EMPTY/FULL rows are never read.
    pub piece: [[u64; GRID_SIZE]; CODE_SPACE],
    pub side_to_move: u64,
}

static SEED: OnceCell<u64> = OnceCell::new();
static KEYS: OnceCell<ZobristKeys> = OnceCell::new();

/// Fix the seed the global key table is generated from. Must be called,
/// if at all, before the first [`zobrist_keys`] access; later calls (or
/// calls after the table has already been generated) are no-ops, since
/// the table is process-wide (§5 "initialized once at startup").
pub fn set_zobrist_seed(seed: u64) {
    let _ = SEED.set(seed);
}

#[inline]
fn non_zero(rng: &mut StdRng) -> u64 {
    let mut v = rng.next_u64();
    while v == 0 {
        v = rng.next_u64();
    }
    v
}

fn generate_zobrist_keys(mut rng: StdRng) -> ZobristKeys {
    let mut keys = ZobristKeys {
        piece: [[0u64; GRID_SIZE]; CODE_SPACE],
        side_to_move: 0,
    };

    for code in 0..CODE_SPACE {
        for sq in 0..GRID_SIZE {
            keys.piece[code][sq] = non_zero(&mut rng);
        }
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}

/// Global key table, generated once on first use from whatever seed
/// [`set_zobrist_seed`] last installed (or [`DEFAULT_SEED`] if none was).
pub fn zobrist_keys() -> &'static ZobristKeys {
    KEYS.get_or_init(|| {
        let seed = *SEED.get_or_init(|| DEFAULT_SEED);
        generate_zobrist_keys(StdRng::seed_from_u64(seed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_calls() {
        let a = zobrist_keys();
        let b = zobrist_keys();
        assert_eq!(a.piece[0x11][21], b.piece[0x11][21]);
    }

    #[test]
    fn regenerating_from_the_same_seed_reproduces_the_table() {
        let fresh = generate_zobrist_keys(StdRng::seed_from_u64(DEFAULT_SEED));
        let cached = zobrist_keys();
        assert_eq!(fresh.piece[0x11][21], cached.piece[0x11][21]);
        assert_eq!(fresh.side_to_move, cached.side_to_move);
    }

    #[test]
    fn no_zero_keys() {
        let keys = zobrist_keys();
        assert_ne!(keys.side_to_move, 0);
        assert_ne!(keys.piece[0x11][21], 0);
        assert_ne!(keys.piece[0x2c][98], 0);
    }
}
