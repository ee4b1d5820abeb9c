//! Shared transposition table with one lock per bucket.
//!
//! Each bucket holds at most one entry: the full [`PositionKey`] of the
//! stored position, the depth it was searched to, and a `[lower, upper]`
//! bound on its score. The bucket for a probe is `(hash ^ depth) % buckets`,
//! so the same position searched to different depths usually lands in
//! different buckets.
//!
//! Locks are never held across a call into the search, and no operation
//! takes two bucket locks at once.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chx_core::{Position, PositionKey};

use crate::search::negamax::{INF, MATE_THRESHOLD};

// ── Compile-time assertion: TT must be Send + Sync to be shared by workers ──
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<TranspositionTable>();
    }
    let _ = check;
};

/// Bounds on a position's score, from the prober's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: i32,
    pub upper: i32,
}

/// Convert a search score to TT-storable form.
///
/// Mate scores are path-dependent: `-MATE + ply` changes with the search
/// path. They are stored as distance-from-node instead of distance-from-root.
/// The `±INF` sentinels of one-sided bounds pass through unchanged.
pub fn score_to_tt(score: i32, ply: u16) -> i32 {
    let ply = i32::from(ply);
    if score > MATE_THRESHOLD && score < INF {
        score + ply
    } else if score < -MATE_THRESHOLD && score > -INF {
        score - ply
    } else {
        score
    }
}

/// Reverse [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: u16) -> i32 {
    let ply = i32::from(ply);
    if score > MATE_THRESHOLD && score < INF {
        score - ply
    } else if score < -MATE_THRESHOLD && score > -INF {
        score + ply
    } else {
        score
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: PositionKey,
    depth: u8,
    lower: i32,
    upper: i32,
}

/// Transposition table shared by every thread of a think call.
///
/// All method receivers are `&self`.
pub struct TranspositionTable {
    buckets: Box<[Mutex<Option<Entry>>]>,
}

impl TranspositionTable {
    /// Create a table with `buckets` slots (at least one).
    pub fn new(buckets: usize) -> Self {
        let buckets = (0..buckets.max(1)).map(|_| Mutex::new(None)).collect();
        Self { buckets }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the table has no buckets. Never true; see [`new`](Self::new).
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        for bucket in self.buckets.iter() {
            *lock(bucket) = None;
        }
    }

    fn bucket(&self, hash: u64, depth: u8) -> &Mutex<Option<Entry>> {
        let index = (hash ^ u64::from(depth)) % self.buckets.len() as u64;
        &self.buckets[index as usize]
    }

    /// Bounds for `position` searched to at least `depth`, if stored.
    ///
    /// An entry is only returned when its key equals the position's, so a
    /// bucket collision between different positions is never mistaken for
    /// a hit.
    pub fn probe(&self, position: &Position, depth: u8) -> Option<Bounds> {
        let entry = (*lock(self.bucket(position.hash(), depth)))?;
        if entry.depth < depth || entry.key != position.key() {
            return None;
        }
        let ply = position.ply();
        Some(Bounds {
            lower: score_from_tt(entry.lower, ply),
            upper: score_from_tt(entry.upper, ply),
        })
    }

    /// Record `[lower, upper]` for `position` searched to `depth`.
    ///
    /// An existing entry for another position or a shallower depth is only
    /// replaced when `depth` is at least its depth. An entry for the same
    /// position and depth is tightened to the intersection of both bounds.
    pub fn store(&self, position: &Position, depth: u8, lower: i32, upper: i32) {
        let key = position.key();
        let ply = position.ply();
        let fresh = Entry {
            key,
            depth,
            lower: score_to_tt(lower, ply),
            upper: score_to_tt(upper, ply),
        };

        let mut slot = lock(self.bucket(position.hash(), depth));
        match slot.as_mut() {
            Some(old) if old.key == key && old.depth == depth => {
                let lower = old.lower.max(fresh.lower);
                let upper = old.upper.min(fresh.upper);
                if lower <= upper {
                    old.lower = lower;
                    old.upper = upper;
                } else {
                    *old = fresh;
                }
            }
            Some(old) if old.depth > depth => {}
            _ => *slot = Some(fresh),
        }
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

/// Every entry is written whole under the lock, so a poisoned bucket still
/// holds a valid value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chx_core::{generate_legal_moves, new_game};

    fn after_e4() -> Position {
        let start = new_game();
        let e4 = generate_legal_moves(&start)
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to_string() == "e2e4")
            .unwrap();
        start.apply(e4).unwrap()
    }

    #[test]
    fn store_and_probe_roundtrip() {
        let tt = TranspositionTable::new(1024);
        let pos = new_game();
        tt.store(&pos, 4, 10, 10);
        assert_eq!(tt.probe(&pos, 4), Some(Bounds { lower: 10, upper: 10 }));
    }

    #[test]
    fn probe_miss_returns_none() {
        let tt = TranspositionTable::new(1024);
        assert!(tt.probe(&new_game(), 1).is_none());
    }

    #[test]
    fn shallower_entry_does_not_answer_deeper_probe() {
        let tt = TranspositionTable::new(1);
        let pos = new_game();
        tt.store(&pos, 2, -5, 30);
        assert!(tt.probe(&pos, 3).is_none());
        assert!(tt.probe(&pos, 2).is_some());
        assert!(tt.probe(&pos, 1).is_some(), "deeper entry answers a shallower probe");
    }

    #[test]
    fn collision_with_another_position_is_rejected() {
        // One bucket: every position collides.
        let tt = TranspositionTable::new(1);
        tt.store(&new_game(), 3, 0, 0);
        assert!(tt.probe(&after_e4(), 3).is_none());
    }

    #[test]
    fn deeper_entry_survives_shallower_store() {
        let tt = TranspositionTable::new(1);
        let start = new_game();
        tt.store(&start, 5, 1, 1);
        tt.store(&after_e4(), 3, 7, 7);
        assert_eq!(tt.probe(&start, 5), Some(Bounds { lower: 1, upper: 1 }));
        assert!(tt.probe(&after_e4(), 3).is_none());
    }

    #[test]
    fn same_position_and_depth_intersects_bounds() {
        let tt = TranspositionTable::new(1);
        let pos = new_game();
        tt.store(&pos, 3, 20, INF);
        tt.store(&pos, 3, -INF, 50);
        assert_eq!(tt.probe(&pos, 3), Some(Bounds { lower: 20, upper: 50 }));
    }

    #[test]
    fn disjoint_bounds_take_the_newer_entry() {
        let tt = TranspositionTable::new(1);
        let pos = new_game();
        tt.store(&pos, 3, 60, INF);
        tt.store(&pos, 3, -INF, 10);
        assert_eq!(tt.probe(&pos, 3), Some(Bounds { lower: -INF, upper: 10 }));
    }

    #[test]
    fn clear_removes_all_entries() {
        let tt = TranspositionTable::new(64);
        let pos = new_game();
        tt.store(&pos, 2, 0, 0);
        tt.clear();
        assert!(tt.probe(&pos, 2).is_none());
    }

    #[test]
    fn mate_score_adjustment_roundtrip() {
        // Mated three plies below a node at ply 5.
        let mated = -10_000 + 8;
        let stored = score_to_tt(mated, 5);
        assert_eq!(stored, -10_000 + 3);
        assert_eq!(score_from_tt(stored, 5), mated);

        let mating = 10_000 - 8;
        assert_eq!(score_from_tt(score_to_tt(mating, 5), 5), mating);
    }

    #[test]
    fn sentinels_and_normal_scores_not_adjusted() {
        for score in [INF, -INF, 150, -150, 0] {
            assert_eq!(score_to_tt(score, 9), score);
            assert_eq!(score_from_tt(score, 9), score);
        }
    }

    #[test]
    fn concurrent_stress_no_panics() {
        use std::thread;

        let tt = TranspositionTable::new(16);
        let positions = [new_game(), after_e4()];
        thread::scope(|s| {
            for t in 0..8u8 {
                let tt = &tt;
                let positions = &positions;
                s.spawn(move || {
                    for i in 0u8..200 {
                        let pos = &positions[usize::from(i % 2)];
                        let depth = (t + i) % 6;
                        tt.store(pos, depth, -i32::from(i), i32::from(i));
                        if let Some(b) = tt.probe(pos, depth) {
                            assert!(b.lower <= b.upper);
                        }
                    }
                });
            }
        });
    }
}
