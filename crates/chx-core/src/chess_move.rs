//! Chess move representation, bit-packed into a `u32` key.

use std::fmt;
use std::ops::BitOr;

use crate::piece::PieceKind;
use crate::square::Square;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 8;
const PROMO_SHIFT: u32 = 16;
const FLAGS_SHIFT: u32 = 24;
const BYTE: u32 = 0xFF;

/// Move property flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    /// Removes an enemy piece (including en passant).
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    /// King moves two squares and the rook jumps over it.
    pub const CASTLE: MoveFlags = MoveFlags(2);
    /// Pawn captures the pawn that just double-pushed past it.
    pub const EN_PASSANT: MoveFlags = MoveFlags(4);
    /// Pawn advances two squares from its home rank.
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(8);
    /// Any pawn move.
    pub const PAWN: MoveFlags = MoveFlags(16);
    /// Pawn reaches the last rank and is replaced.
    pub const PROMOTION: MoveFlags = MoveFlags(32);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | other.0)
    }
}

impl BitOr for MoveFlags {
    type Output = MoveFlags;

    #[inline]
    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        self.union(rhs)
    }
}

impl fmt::Debug for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (MoveFlags::CAPTURE, "capture"),
            (MoveFlags::CASTLE, "castle"),
            (MoveFlags::EN_PASSANT, "en-passant"),
            (MoveFlags::DOUBLE_PUSH, "double-push"),
            (MoveFlags::PAWN, "pawn"),
            (MoveFlags::PROMOTION, "promotion"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "[{}]", set.join("|"))
    }
}

/// A move encoded in 32 bits.
///
/// ```text
/// bits  0-7:  from square
/// bits  8-15: to square
/// bits 16-23: promotion piece kind + 1 (0 = none)
/// bits 24-31: MoveFlags
/// ```
///
/// The raw key is stable, so it doubles as an index into per-move tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Placeholder that is never a real move (from == to == a1).
    pub const NULL: Move = Move(0);

    /// A non-promoting move.
    #[inline]
    pub const fn new(from: Square, to: Square, flags: MoveFlags) -> Move {
        Move(
            (from.index() as u32) << FROM_SHIFT
                | (to.index() as u32) << TO_SHIFT
                | (flags.bits() as u32) << FLAGS_SHIFT,
        )
    }

    /// A promoting pawn move. Pawn and promotion flags are added here.
    #[inline]
    pub const fn new_promotion(from: Square, to: Square, promotion: PieceKind, flags: MoveFlags) -> Move {
        debug_assert!(!matches!(promotion, PieceKind::Pawn | PieceKind::King));
        let flags = flags.union(MoveFlags::PAWN).union(MoveFlags::PROMOTION);
        Move(
            (from.index() as u32) << FROM_SHIFT
                | (to.index() as u32) << TO_SHIFT
                | (promotion.index() as u32 + 1) << PROMO_SHIFT
                | (flags.bits() as u32) << FLAGS_SHIFT,
        )
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked(((self.0 >> FROM_SHIFT) & BYTE) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> TO_SHIFT) & BYTE) as u8)
    }

    /// The piece a pawn turns into, if this is a promotion.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match (self.0 >> PROMO_SHIFT) & BYTE {
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn flags(self) -> MoveFlags {
        MoveFlags(((self.0 >> FLAGS_SHIFT) & BYTE) as u8)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags().contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flags().contains(MoveFlags::CASTLE)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags().contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.flags().contains(MoveFlags::DOUBLE_PUSH)
    }

    #[inline]
    pub const fn is_pawn_move(self) -> bool {
        self.flags().contains(MoveFlags::PAWN)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flags().contains(MoveFlags::PROMOTION)
    }

    /// Captures and promotions: the moves quiescence search follows.
    #[inline]
    pub const fn is_noisy(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Whether the move resets the fifty-move clock.
    #[inline]
    pub const fn is_irreversible(self) -> bool {
        self.is_capture() || self.is_pawn_move()
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The packed 32-bit key.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Rebuild a move from its key.
    #[inline]
    pub const fn from_raw(raw: u32) -> Move {
        Move(raw)
    }
}

impl fmt::Display for Move {
    /// Coordinate notation: `e2e4`, `e7e8q`, `0000` for the null move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self} {:?})", self.flags())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn size_of_move() {
        assert_eq!(std::mem::size_of::<Move>(), 4);
    }

    #[test]
    fn fields_survive_packing() {
        let flags = MoveFlags::PAWN | MoveFlags::DOUBLE_PUSH;
        let mv = Move::new(sq("e2"), sq("e4"), flags);
        assert_eq!(mv.from(), sq("e2"));
        assert_eq!(mv.to(), sq("e4"));
        assert_eq!(mv.promotion(), None);
        assert!(mv.is_double_push());
        assert!(mv.is_pawn_move());
        assert!(!mv.is_capture());
        assert!(mv.is_irreversible());
        assert_eq!(Move::from_raw(mv.raw()), mv);
    }

    #[test]
    fn promotion_sets_flags_and_piece() {
        for kind in PieceKind::PROMOTIONS {
            let mv = Move::new_promotion(sq("a7"), sq("b8"), kind, MoveFlags::CAPTURE);
            assert_eq!(mv.promotion(), Some(kind));
            assert!(mv.is_promotion());
            assert!(mv.is_capture());
            assert!(mv.is_noisy());
        }
    }

    #[test]
    fn display_uses_coordinate_notation() {
        let quiet = Move::new(sq("g1"), sq("f3"), MoveFlags::NONE);
        let promo = Move::new_promotion(sq("e7"), sq("e8"), PieceKind::Queen, MoveFlags::NONE);
        assert_eq!(quiet.to_string(), "g1f3");
        assert_eq!(promo.to_string(), "e7e8q");
        assert_eq!(Move::NULL.to_string(), "0000");
    }

    #[test]
    fn distinct_promotions_have_distinct_keys() {
        let keys: std::collections::HashSet<u32> = PieceKind::PROMOTIONS
            .into_iter()
            .map(|k| Move::new_promotion(sq("h2"), sq("h1"), k, MoveFlags::NONE).raw())
            .collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn flags_debug_lists_names() {
        let flags = MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
        assert_eq!(format!("{flags:?}"), "[capture|en-passant]");
    }
}
