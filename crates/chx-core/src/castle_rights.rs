//! Castling rights and the fixed geometry of each castling move.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Which wing to castle toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// Castling rights as a 4-bit set: bit 0 = white king-side, 1 = white
/// queen-side, 2 = black king-side, 3 = black queen-side.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    /// Raw 4-bit value, usable as a table index.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.contains(Self::flag(color, side))
    }

    /// Rights left after a move touching `from` and `to`.
    ///
    /// Moving the king or a rook off its home square, or capturing on a
    /// rook's home square, clears the corresponding rights.
    #[inline]
    pub fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & KEEP_MASK[from.index()] & KEEP_MASK[to.index()])
    }

    const fn flag(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => Self::WHITE_KING,
            (Color::White, CastleSide::QueenSide) => Self::WHITE_QUEEN,
            (Color::Black, CastleSide::KingSide) => Self::BLACK_KING,
            (Color::Black, CastleSide::QueenSide) => Self::BLACK_QUEEN,
        }
    }

    /// Parse the FEN castling field (`"KQkq"`, `"Kq"`, `"-"`, ...).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        s.chars().try_fold(CastleRights::NONE, |rights, c| {
            let flag = match c {
                'K' => Self::WHITE_KING,
                'Q' => Self::WHITE_QUEEN,
                'k' => Self::BLACK_KING,
                'q' => Self::BLACK_QUEEN,
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            Ok(CastleRights(rights.0 | flag.0))
        })
    }

    /// Serialize to the FEN castling field.
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ]
        .into_iter()
        .filter(|&(flag, _)| self.contains(flag))
        .map(|(_, c)| c)
        .collect()
    }
}

/// Per-square mask of rights that survive a move touching that square.
const KEEP_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    mask[Square::E1.index()] = 0b1100;
    mask[Square::A1.index()] = 0b1101;
    mask[Square::H1.index()] = 0b1110;
    mask[Square::E8.index()] = 0b0011;
    mask[Square::A8.index()] = 0b0111;
    mask[Square::H8.index()] = 0b1011;
    mask
};

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({})", self.to_fen())
    }
}

/// Squares involved in one castling move.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub empty: &'static [Square],
    /// Squares the king stands on or crosses; none may be attacked.
    pub safe: &'static [Square],
}

const WHITE_KING_SIDE: CastlePath = CastlePath {
    king_from: Square::E1,
    king_to: Square::G1,
    rook_from: Square::H1,
    rook_to: Square::F1,
    empty: &[Square::F1, Square::G1],
    safe: &[Square::E1, Square::F1, Square::G1],
};

const WHITE_QUEEN_SIDE: CastlePath = CastlePath {
    king_from: Square::E1,
    king_to: Square::C1,
    rook_from: Square::A1,
    rook_to: Square::D1,
    empty: &[Square::B1, Square::C1, Square::D1],
    safe: &[Square::E1, Square::D1, Square::C1],
};

const BLACK_KING_SIDE: CastlePath = CastlePath {
    king_from: Square::E8,
    king_to: Square::G8,
    rook_from: Square::H8,
    rook_to: Square::F8,
    empty: &[Square::F8, Square::G8],
    safe: &[Square::E8, Square::F8, Square::G8],
};

const BLACK_QUEEN_SIDE: CastlePath = CastlePath {
    king_from: Square::E8,
    king_to: Square::C8,
    rook_from: Square::A8,
    rook_to: Square::D8,
    empty: &[Square::B8, Square::C8, Square::D8],
    safe: &[Square::E8, Square::D8, Square::C8],
};

impl CastlePath {
    pub(crate) const fn of(color: Color, side: CastleSide) -> CastlePath {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => WHITE_KING_SIDE,
            (Color::White, CastleSide::QueenSide) => WHITE_QUEEN_SIDE,
            (Color::Black, CastleSide::KingSide) => BLACK_KING_SIDE,
            (Color::Black, CastleSide::QueenSide) => BLACK_QUEEN_SIDE,
        }
    }

    /// The castling path whose king destination is `king_to`, if any.
    pub(crate) fn by_destination(king_to: Square) -> Option<CastlePath> {
        [WHITE_KING_SIDE, WHITE_QUEEN_SIDE, BLACK_KING_SIDE, BLACK_QUEEN_SIDE]
            .into_iter()
            .find(|path| path.king_to == king_to)
    }
}
