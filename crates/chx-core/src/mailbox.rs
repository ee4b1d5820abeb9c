//! 10x12 mailbox geometry.
//!
//! The 8x8 board sits inside a 10-wide, 12-tall frame of sentinel cells so
//! that any knight or king step off the board lands on a sentinel instead of
//! wrapping around to the other edge. Rank `r`, file `f` lives at frame index
//! `21 + 10 * r + f`, so `+10` moves one rank up and `+1` one file right.

use crate::piece::PieceKind;
use crate::square::Square;

const OFF_BOARD: i8 = -1;

/// Frame index -> square index, or [`OFF_BOARD`].
static MAILBOX: [i8; 120] = {
    let mut table = [OFF_BOARD; 120];
    let mut sq = 0;
    while sq < 64 {
        table[21 + (sq / 8) * 10 + sq % 8] = sq as i8;
        sq += 1;
    }
    table
};

/// Square index -> frame index.
static MAILBOX64: [u8; 64] = {
    let mut table = [0u8; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = (21 + (sq / 8) * 10 + sq % 8) as u8;
        sq += 1;
    }
    table
};

pub(crate) const KNIGHT_OFFSETS: [i8; 8] = [-21, -19, -12, -8, 8, 12, 19, 21];
pub(crate) const BISHOP_OFFSETS: [i8; 4] = [-11, -9, 9, 11];
pub(crate) const ROOK_OFFSETS: [i8; 4] = [-10, -1, 1, 10];
pub(crate) const ROYAL_OFFSETS: [i8; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

/// Step offsets for a non-pawn piece kind. Pawns have none here; their
/// moves depend on color and are generated separately.
pub(crate) const fn offsets(kind: PieceKind) -> &'static [i8] {
    match kind {
        PieceKind::Pawn => &[],
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::Bishop => &BISHOP_OFFSETS,
        PieceKind::Rook => &ROOK_OFFSETS,
        PieceKind::Queen | PieceKind::King => &ROYAL_OFFSETS,
    }
}

/// Move `from` by `delta` frame cells.
#[inline]
pub(crate) fn step(from: Square, delta: i8) -> Option<Square> {
    let cell = MAILBOX64[from.index()] as i16 + delta as i16;
    match MAILBOX.get(cell as usize) {
        Some(&sq) if sq != OFF_BOARD => Some(Square::from_index_unchecked(sq as u8)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_and_board_indices_agree() {
        for sq in Square::all() {
            assert_eq!(MAILBOX[MAILBOX64[sq.index()] as usize], sq.index() as i8);
        }
        let on_board = MAILBOX.iter().filter(|&&c| c != OFF_BOARD).count();
        assert_eq!(on_board, 64);
    }

    #[test]
    fn corner_knight_has_two_targets() {
        let targets = KNIGHT_OFFSETS
            .iter()
            .filter_map(|&d| step(Square::A1, d))
            .count();
        assert_eq!(targets, 2);
    }

    #[test]
    fn center_king_has_eight_targets() {
        let e4 = Square::from_algebraic("e4").unwrap();
        let targets = offsets(PieceKind::King)
            .iter()
            .filter_map(|&d| step(e4, d))
            .count();
        assert_eq!(targets, 8);
    }
}
