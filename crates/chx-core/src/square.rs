//! Board squares in Little-Endian Rank-File order (a1 = 0, h8 = 63).

use std::fmt;

use crate::mailbox;

/// A square on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Number of squares.
    pub const COUNT: usize = 64;

    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Build a square from a zero-based file (a = 0) and rank (1st = 0).
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    /// Build a square from its index, or `None` when out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 { Some(Square(index)) } else { None }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    /// Parse algebraic notation such as `"e4"`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        match s.as_bytes() {
            &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some(Square::new(file - b'a', rank - b'1')),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based file, a = 0.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Zero-based rank, 1st rank = 0.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Mirror across the horizontal axis (a1 <-> a8).
    #[inline]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Step by a 10x12 mailbox offset; `None` when the step leaves the board.
    #[inline]
    pub fn offset(self, delta: i8) -> Option<Square> {
        mailbox::step(self, delta)
    }

    /// All 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Square;

    #[test]
    fn algebraic_roundtrip_for_every_square() {
        for sq in Square::all() {
            let text = sq.to_string();
            assert_eq!(Square::from_algebraic(&text), Some(sq), "roundtrip of {text}");
        }
    }

    #[test]
    fn rejects_bad_algebraic() {
        for bad in ["", "e", "e9", "i1", "E4", "e44"] {
            assert_eq!(Square::from_algebraic(bad), None, "{bad:?} should not parse");
        }
    }

    #[test]
    fn file_and_rank_follow_lerf() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(e4.index(), 28);
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.rank(), 3);
        assert_eq!(Square::H8.index(), 63);
    }

    #[test]
    fn flip_rank_mirrors_vertically() {
        assert_eq!(Square::E1.flip_rank(), Square::E8);
        assert_eq!(Square::A8.flip_rank(), Square::A1);
    }

    #[test]
    fn offset_detects_board_edges() {
        assert_eq!(Square::A1.offset(-1), None);
        assert_eq!(Square::H1.offset(1), None);
        assert_eq!(Square::E1.offset(10), Square::from_algebraic("e2"));
        assert_eq!(Square::H8.offset(10), None);
        assert_eq!(Square::B1.offset(19), Square::from_algebraic("a3"));
    }
}
