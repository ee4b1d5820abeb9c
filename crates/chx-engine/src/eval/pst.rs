//! Piece-square tables for the original evaluator.
//!
//! All tables are defined from White's perspective in LERF order:
//! index 0 = A1, index 7 = H1, index 8 = A2, ..., index 63 = H8.
//! Use [`pst_value`] to look up the value for either color. Rooks and
//! queens have no table.

use chx_core::{Color, PieceKind, Square};

// ---------------------------------------------------------------------------
// Individual piece-square tables
// ---------------------------------------------------------------------------

/// Pawn PST. Centre pawns are pushed out of their home squares.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0, -40, -40,   0,   0,   0,
      1,   2,   3, -10, -10,   3,   2,   1,
      2,   4,   6,   8,   8,   6,   4,   2,
      3,   6,   9,  12,  12,   9,   6,   3,
      4,   8,  12,  16,  16,  12,   8,   4,
      5,  10,  15,  20,  20,  15,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -10, -30, -10, -10, -10, -10, -30, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10, -10, -10, -10, -10, -10, -10, -10,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -10, -10, -20, -10, -10, -20, -10, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10, -10, -10, -10, -10, -10, -10, -10,
];

/// King PST while the opponent still has attacking material: stay home,
/// preferably castled.
#[rustfmt::skip]
const KING_PST: [i32; 64] = [
      0,  20,  40, -20,   0, -20,  40,  20,
    -20, -20, -20, -20, -20, -20, -20, -20,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
    -40, -40, -40, -40, -40, -40, -40, -40,
];

/// King PST once the opponent's pieces are gone: centralize.
#[rustfmt::skip]
const KING_ENDGAME_PST: [i32; 64] = [
      0,  10,  20,  30,  30,  20,  10,   0,
     10,  20,  30,  40,  40,  30,  20,  10,
     20,  30,  40,  50,  50,  40,  30,  20,
     30,  40,  50,  60,  60,  50,  40,  30,
     30,  40,  50,  60,  60,  50,  40,  30,
     20,  30,  40,  50,  50,  40,  30,  20,
     10,  20,  30,  40,  40,  30,  20,  10,
      0,  10,  20,  30,  30,  20,  10,   0,
];

const NONE: [i32; 64] = [0; 64];

// ---------------------------------------------------------------------------
// Master table
// ---------------------------------------------------------------------------

/// Piece-square table values indexed `[piece_kind][square]`.
static PST: [[i32; 64]; PieceKind::COUNT] = [
    PAWN_PST,
    KNIGHT_PST,
    BISHOP_PST,
    NONE,
    NONE,
    KING_PST,
];

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

#[inline]
fn index(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.index(),
        Color::Black => sq.index() ^ 56,
    }
}

/// Look up the PST bonus for a piece of the given kind and color on `sq`.
///
/// For Black pieces the square is mirrored vertically (`sq ^ 56`) so that the
/// tables, which are defined from White's perspective, apply symmetrically.
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> i32 {
    PST[kind.index()][index(color, sq)]
}

/// Endgame king table lookup, mirrored like [`pst_value`].
#[inline]
pub fn king_endgame_value(color: Color, sq: Square) -> i32 {
    KING_ENDGAME_PST[index(color, sq)]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
