//! Transposition table (§4.4 C8): fixed power-of-two array, unconditional
//! replacement on collision, α/β/exact bound semantics, mate-score
//! clamping. No generation counter: depth-preferred or generation-aged
//! replacement would change node counts and break the benchmark's
//! bit-for-bit reproducibility (§9).

use crate::moves::types::Move;

/// Scores at or beyond this magnitude are mate scores and are stored as
/// one-sided bounds rather than exact values (§4.4).
pub const MATE_THRESHOLD: i32 = 32000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Alpha,
    Beta,
    Exact,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    key: u64,
    best_move: Move,
    score: i16,
    depth: u8,
    bound: Bound,
}

impl Entry {
    const EMPTY: Entry = Entry {
        key: 0,
        best_move: Move::null(),
        score: 0,
        depth: 0,
        bound: Bound::Exact,
    };
}

pub struct TranspositionTable {
    entries: Vec<Entry>,
    mask: usize,
}

impl TranspositionTable {
    /// Allocate a power-of-two-sized table rounded down from `size_mb`
    /// (§5 "power-of-two sizing rounded down from the requested
    /// megabytes").
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Entry>();
        let requested = (size_mb * 1024 * 1024) / entry_size.max(1);
        let mut capacity = 1usize;
        while capacity * 2 <= requested.max(1) {
            capacity *= 2;
        }
        TranspositionTable {
            entries: vec![Entry::EMPTY; capacity],
            mask: capacity - 1,
        }
    }

    #[inline(always)]
    fn index(&self, key: u64) -> usize {
        key as usize & self.mask
    }

    /// Probe the table. On a hit, `killer_out` receives the stored best
    /// move (§4.4: "that move is recorded into killer[ply]") regardless of
    /// whether the entry is deep enough to cut; the return value is
    /// `Some(score)` only when the entry is authoritative for
    /// `depth_remaining` and its bound permits an immediate return.
    pub fn lookup(
        &self,
        key: u64,
        ply: u32,
        depth_max: u32,
        alpha: i32,
        beta: i32,
        killer_out: &mut Option<Move>,
    ) -> Option<i32> {
        let entry = &self.entries[self.index(key)];
        if entry.key != key {
            return None;
        }
        if !entry.best_move.is_null() {
            *killer_out = Some(entry.best_move);
        }
        let depth_remaining = depth_max.saturating_sub(ply) as u8;
        if entry.depth < depth_remaining {
            tracing::warn!(
                stored_depth = entry.depth,
                needed_depth = depth_remaining,
                "tt hit too shallow to cut, move still usable for ordering"
            );
            return None;
        }
        let score = entry.score as i32;
        match entry.bound {
            Bound::Exact => Some(score),
            Bound::Alpha => {
                if score <= alpha {
                    Some(alpha)
                } else {
                    None
                }
            }
            Bound::Beta => {
                if score >= beta {
                    Some(beta)
                } else {
                    None
                }
            }
        }
    }

    /// Store `score`/`bound` at `depth_max - ply` remaining depth,
    /// unconditionally overwriting whatever occupied the slot. Mate
    /// scores are clamped to a one-sided bound at full horizon so they
    /// remain sound when probed at a different depth.
    pub fn insert(
        &mut self,
        key: u64,
        ply: u32,
        depth_max: u32,
        bound: Bound,
        score: i32,
        best_move: Move,
    ) {
        let (bound, depth_remaining) = if score.abs() >= MATE_THRESHOLD {
            let one_sided = if score > 0 { Bound::Beta } else { Bound::Alpha };
            (one_sided, depth_max as u8)
        } else {
            (bound, depth_max.saturating_sub(ply) as u8)
        };

        let idx = self.index(key);
        self.entries[idx] = Entry {
            key,
            best_move,
            score: score.clamp(-32767, 32767) as i16,
            depth: depth_remaining,
            bound,
        };
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.fill(Entry::EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_power_of_two() {
        let tt = TranspositionTable::new(4);
        assert!(tt.capacity().is_power_of_two());
    }

    #[test]
    fn exact_entry_is_returned_verbatim() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::new(12, 28);
        tt.insert(0xABCD, 2, 6, Bound::Exact, 37, mv);
        let mut killer = None;
        let score = tt.lookup(0xABCD, 2, 6, -1000, 1000, &mut killer);
        assert_eq!(score, Some(37));
        assert_eq!(killer, Some(mv));
    }

    #[test]
    fn alpha_bound_cuts_only_below_alpha() {
        let mut tt = TranspositionTable::new(1);
        tt.insert(1, 0, 4, Bound::Alpha, -50, Move::null());
        let mut killer = None;
        assert_eq!(tt.lookup(1, 0, 4, -40, 100, &mut killer), Some(-40));
        let mut killer2 = None;
        assert_eq!(tt.lookup(1, 0, 4, -60, 100, &mut killer2), None);
    }

    #[test]
    fn shallower_stored_depth_is_not_authoritative() {
        let mut tt = TranspositionTable::new(1);
        tt.insert(5, 3, 4, Bound::Exact, 10, Move::null());
        let mut killer = None;
        // depth_remaining at ply=0,depth_max=4 is 4, but the stored entry
        // only covers depth_remaining=1.
        assert_eq!(tt.lookup(5, 0, 4, -100, 100, &mut killer), None);
    }

    #[test]
    fn mate_score_is_clamped_to_one_sided_bound() {
        let mut tt = TranspositionTable::new(1);
        tt.insert(7, 2, 6, Bound::Exact, 32600, Move::null());
        let mut killer = None;
        assert_eq!(tt.lookup(7, 6, 6, 32000, 32500, &mut killer), Some(32500));
    }
}
