//! The two sides of the board.

use std::fmt;
use std::ops::Not;

/// A side: the owner of a piece or the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Number of sides.
    pub const COUNT: usize = 2;

    /// Both sides, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Array index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The opponent.
    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Mailbox offset of a single pawn push for this side.
    #[inline]
    pub const fn pawn_push(self) -> i8 {
        match self {
            Color::White => 10,
            Color::Black => -10,
        }
    }

    /// Translate an absolute rank (0 = rank 1) into this side's point of view,
    /// where 0 is the own back rank and 7 the promotion rank.
    #[inline]
    pub const fn relative_rank(self, rank: u8) -> u8 {
        match self {
            Color::White => rank,
            Color::Black => 7 - rank,
        }
    }

    /// Lowercase English name.
    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn opponent_of_opponent_is_self() {
        for color in Color::ALL {
            assert_eq!(!!color, color);
            assert_ne!(!color, color);
        }
    }

    #[test]
    fn pawn_push_points_toward_promotion() {
        assert_eq!(Color::White.pawn_push(), 10);
        assert_eq!(Color::Black.pawn_push(), -10);
    }

    #[test]
    fn relative_rank_mirrors_for_black() {
        assert_eq!(Color::White.relative_rank(1), 1);
        assert_eq!(Color::Black.relative_rank(6), 1);
        assert_eq!(Color::Black.relative_rank(0), 7);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Color::White.to_string(), "white");
        assert_eq!(Color::Black.to_string(), "black");
    }
}
