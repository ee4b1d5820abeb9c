//! Move ordering via the PV hint, MVV-LVA, and the history heuristic.

use chx_core::{Move, MoveList, PieceKind, Position};

use crate::search::heuristics::HistoryTable;

/// Score for the previous iteration's PV move at this ply.
const PV_SCORE: i32 = 10_000_000;

/// Base for captures and promotions; quiet history scores stay far below.
const NOISY_BASE: i32 = 1_000_000;

/// Score a move for ordering purposes. Higher scores are searched first.
///
/// Score bands:
/// - Promotions: `1,000,000 + 10 × promoted value`
/// - Captures: `1,000,000 + 10 × victim value − attacker value`
/// - Quiet: history score, or 0 when no history table is in use
pub fn score_move(position: &Position, mv: Move, history: Option<&HistoryTable>) -> i32 {
    if let Some(kind) = mv.promotion() {
        return NOISY_BASE + 10 * kind.value();
    }
    if mv.is_capture() {
        let victim = if mv.is_en_passant() {
            PieceKind::Pawn
        } else {
            position.piece_on(mv.to()).map_or(PieceKind::Pawn, |p| p.kind())
        };
        let attacker = position.piece_on(mv.from()).map_or(PieceKind::Pawn, |p| p.kind());
        return NOISY_BASE + 10 * victim.value() - attacker.value();
    }
    history.map_or(0, |h| h.score(mv))
}

// ── Move Picker ────────────────────────────────────────────────────────────────

/// Incremental move picker using selection sort.
///
/// Yields moves in descending score order; ties keep generation order.
pub struct MovePicker {
    moves: [Move; 256],
    scores: [i32; 256],
    len: usize,
    cursor: usize,
}

impl MovePicker {
    /// Score every move in `moves`. `hint` (if present in the list) comes first.
    pub fn new(moves: &MoveList, position: &Position, hint: Move, history: Option<&HistoryTable>) -> Self {
        let mut picker = Self {
            moves: [Move::NULL; 256],
            scores: [0; 256],
            len: moves.len(),
            cursor: 0,
        };
        for (i, &mv) in moves.as_slice().iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = if !hint.is_null() && mv == hint {
                PV_SCORE
            } else {
                score_move(position, mv, history)
            };
        }
        picker
    }

    /// Return the highest-scored move not yet yielded.
    pub fn pick_next(&mut self) -> Option<Move> {
        if self.cursor >= self.len {
            return None;
        }

        let mut best = self.cursor;
        for i in self.cursor + 1..self.len {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }

        // Rotate the winner to the cursor so the rest keep their relative order.
        self.moves[self.cursor..=best].rotate_right(1);
        self.scores[self.cursor..=best].rotate_right(1);

        let mv = self.moves[self.cursor];
        self.cursor += 1;
        Some(mv)
    }
}
