//! Rook evaluation: open files, semi-open files, and rook on 7th rank.

use chx_core::{Color, Square};

use crate::eval::pawns::{NO_PAWN, PawnFiles};

/// Bonus for a rook on a fully open file (no pawns of either color).
const ROOK_OPEN_FILE: i32 = 15;

/// Bonus for a rook on a semi-open file (no friendly pawns, but enemy pawns present).
const ROOK_SEMI_OPEN_FILE: i32 = 10;

/// Bonus for a rook on the 7th rank (2nd rank from the enemy's perspective).
const ROOK_ON_SEVENTH: i32 = 20;

/// File and rank bonuses for a `color` rook on `sq`.
pub(crate) fn rook_term(files: &PawnFiles, color: Color, sq: Square) -> i32 {
    let slot = sq.file() as usize + 1;
    let mut score = 0;

    if files.at(color, slot) == NO_PAWN {
        score += if files.at(!color, slot) == NO_PAWN {
            ROOK_OPEN_FILE
        } else {
            ROOK_SEMI_OPEN_FILE
        };
    }

    if color.relative_rank(sq.rank()) == 6 {
        score += ROOK_ON_SEVENTH;
    }

    score
}
