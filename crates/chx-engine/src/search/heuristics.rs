//! Shared ordering state: the history heuristic, the principal-variation
//! register, and fixed-size move lines.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, PoisonError};

use chx_core::Move;

use crate::search::negamax::MAX_PLY;

/// History heuristic indexed by `[from][to]`.
///
/// Every quiet move that causes a beta cutoff earns `+depth`. Shared by
/// all threads of a think call; updates are relaxed atomics, so concurrent
/// searches only ever see slightly stale ordering hints.
pub struct HistoryTable {
    table: Box<[AtomicI32]>,
}

impl HistoryTable {
    /// Create a zeroed history table.
    pub fn new() -> Self {
        Self {
            table: (0..64 * 64).map(|_| AtomicI32::new(0)).collect(),
        }
    }

    fn slot(&self, mv: Move) -> &AtomicI32 {
        &self.table[mv.from().index() * 64 + mv.to().index()]
    }

    /// Reward a quiet move that caused a beta cutoff.
    pub fn reward(&self, mv: Move, depth: u8) {
        self.slot(mv).fetch_add(i32::from(depth), Ordering::Relaxed);
    }

    /// Get the history score for a move.
    pub fn score(&self, mv: Move) -> i32 {
        self.slot(mv).load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        for entry in self.table.iter() {
            entry.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A line of moves from some node downwards, stored inline.
#[derive(Clone, Copy)]
pub struct Line {
    moves: [Move; MAX_PLY],
    len: u8,
}

impl Line {
    /// An empty line.
    pub const fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_PLY],
            len: 0,
        }
    }

    /// `mv` followed by `rest`, truncated to [`MAX_PLY`] moves.
    pub fn extend(mv: Move, rest: &Line) -> Self {
        let mut line = Line::new();
        line.moves[0] = mv;
        let tail = rest.as_slice();
        let tail = &tail[..tail.len().min(MAX_PLY - 1)];
        line.moves[1..=tail.len()].copy_from_slice(tail);
        line.len = (tail.len() + 1) as u8;
        line
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..usize::from(self.len)]
    }

    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Per-ply move hints from the last completed iteration's principal
/// variation, shared by every thread of a think call.
///
/// Written only between iterations, read at every node.
pub struct PvRegister {
    moves: Mutex<[Move; MAX_PLY]>,
}

impl PvRegister {
    pub fn new() -> Self {
        Self {
            moves: Mutex::new([Move::NULL; MAX_PLY]),
        }
    }

    /// The hint for `ply`, or [`Move::NULL`].
    pub fn get(&self, ply: u16) -> Move {
        let moves = self.moves.lock().unwrap_or_else(PoisonError::into_inner);
        moves.get(usize::from(ply)).copied().unwrap_or(Move::NULL)
    }

    /// Replace every hint with `line` (plies past its end become null).
    pub fn publish(&self, line: &Line) {
        let mut moves = self.moves.lock().unwrap_or_else(PoisonError::into_inner);
        *moves = line.moves;
    }

    pub fn clear(&self) {
        self.publish(&Line::new());
    }
}

impl Default for PvRegister {
    fn default() -> Self {
        Self::new()
    }
}
