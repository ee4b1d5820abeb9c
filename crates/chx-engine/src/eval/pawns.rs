//! Pawn structure: doubled, isolated, backward and passed pawns.
//!
//! Everything is measured in relative ranks (0 = own back rank, 7 = the
//! promotion rank), so one routine serves both colors.

use chx_core::{Color, PieceKind, Position, Square};

use crate::eval::pst::pst_value;

const DOUBLED_PAWN_PENALTY: i32 = 10;
const ISOLATED_PAWN_PENALTY: i32 = 20;
const BACKWARD_PAWN_PENALTY: i32 = 8;
const PASSED_PAWN_BONUS: i32 = 20;

/// Relative rank recorded for a file without pawns. No pawn can stand on
/// the promotion rank, so this reads as "further advanced than any pawn".
pub(crate) const NO_PAWN: u8 = 7;

/// Least advanced pawn of each side on each file.
///
/// Slots are `file + 1`; slots 0 and 9 are empty buffer files so that
/// neighbour lookups need no edge checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PawnFiles {
    least_advanced: [[u8; 10]; Color::COUNT],
}

impl PawnFiles {
    pub(crate) fn new(position: &Position) -> PawnFiles {
        let mut least_advanced = [[NO_PAWN; 10]; Color::COUNT];
        for (sq, piece) in position.pieces() {
            if piece.kind() != PieceKind::Pawn {
                continue;
            }
            let color = piece.color();
            let slot = &mut least_advanced[color.index()][sq.file() as usize + 1];
            *slot = (*slot).min(color.relative_rank(sq.rank()));
        }
        PawnFiles { least_advanced }
    }

    /// Relative rank of `color`'s least advanced pawn in `slot` (file + 1).
    #[inline]
    pub(crate) fn at(&self, color: Color, slot: usize) -> u8 {
        self.least_advanced[color.index()][slot]
    }

    /// Whether `slot` holds no pawn of either side.
    #[inline]
    pub(crate) fn is_open(&self, slot: usize) -> bool {
        self.at(Color::White, slot) == NO_PAWN && self.at(Color::Black, slot) == NO_PAWN
    }
}

/// Table value plus structure terms for a `color` pawn on `sq`.
pub(crate) fn pawn_term(files: &PawnFiles, color: Color, sq: Square) -> i32 {
    let them = !color;
    let slot = sq.file() as usize + 1;
    let rank = color.relative_rank(sq.rank());
    let own = |s: usize| files.at(color, s);
    let mut score = pst_value(PieceKind::Pawn, color, sq);

    // A friendly pawn further back on the same file.
    if own(slot) < rank {
        score -= DOUBLED_PAWN_PENALTY;
    }

    if own(slot - 1) == NO_PAWN && own(slot + 1) == NO_PAWN {
        score -= ISOLATED_PAWN_PENALTY;
    } else if own(slot - 1) > rank && own(slot + 1) > rank {
        score -= BACKWARD_PAWN_PENALTY;
    }

    // No enemy pawn ahead on this or an adjacent file. An enemy pawn at its
    // own relative rank `q` stands ahead of ours when `q < 7 - rank`.
    let passed = (slot - 1..=slot + 1).all(|s| files.at(them, s) >= 7 - rank);
    if passed {
        score += i32::from(rank) * PASSED_PAWN_BONUS;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn term(fen: &str, color: Color, at: &str) -> i32 {
        let pos: Position = fen.parse().unwrap();
        pawn_term(&PawnFiles::new(&pos), color, sq(at))
    }

    #[test]
    fn files_track_least_advanced_pawn() {
        let pos: Position = "4k3/3p4/8/3p4/8/3P4/3P4/4K3 w - - 0 1".parse().unwrap();
        let files = PawnFiles::new(&pos);
        assert_eq!(files.at(Color::White, 4), 1);
        assert_eq!(files.at(Color::Black, 4), 1);
        assert_eq!(files.at(Color::White, 5), NO_PAWN);
        assert!(files.is_open(0));
        assert!(!files.is_open(4));
    }

    #[test]
    fn doubled_and_isolated() {
        // d2 and d3 with no neighbours; d3 is the doubled one.
        let fen = "4k3/8/8/8/8/3P4/3P4/4K3 w - - 0 1";
        let table = pst_value(PieceKind::Pawn, Color::White, sq("d3"));
        let passed = 2 * PASSED_PAWN_BONUS;
        assert_eq!(
            term(fen, Color::White, "d3"),
            table - DOUBLED_PAWN_PENALTY - ISOLATED_PAWN_PENALTY + passed
        );
    }

    #[test]
    fn backward_pawn() {
        // d2 trails both neighbours on c3 and e3; a black pawn on d7 stops it being passed.
        let fen = "4k3/3p4/8/8/8/2P1P3/3P4/4K3 w - - 0 1";
        let table = pst_value(PieceKind::Pawn, Color::White, sq("d2"));
        assert_eq!(term(fen, Color::White, "d2"), table - BACKWARD_PAWN_PENALTY);
    }

    #[test]
    fn passed_pawn_bonus_grows_with_rank() {
        let fen = "4k3/8/1P6/8/8/8/8/4K3 w - - 0 1";
        let table = pst_value(PieceKind::Pawn, Color::White, sq("b6"));
        assert_eq!(
            term(fen, Color::White, "b6"),
            table - ISOLATED_PAWN_PENALTY + 5 * PASSED_PAWN_BONUS
        );
    }

    #[test]
    fn colors_are_symmetric() {
        let white = term("4k3/8/8/8/3P4/8/8/4K3 w - - 0 1", Color::White, "d4");
        let black = term("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1", Color::Black, "d5");
        assert_eq!(white, black);
    }

    #[test]
    fn enemy_pawn_in_front_blocks_passer() {
        let blocked = term("4k3/8/2p5/8/3P4/8/8/4K3 w - - 0 1", Color::White, "d4");
        let free = term("4k3/8/8/8/3P4/2p5/8/4K3 w - - 0 1", Color::White, "d4");
        assert_eq!(free - blocked, 3 * PASSED_PAWN_BONUS);
    }
}
