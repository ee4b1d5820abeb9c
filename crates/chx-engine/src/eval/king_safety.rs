//! King safety: pawn shelter in the middlegame, centralization in the endgame.

use chx_core::{Color, PieceKind, Square};

use crate::eval::pawns::{NO_PAWN, PawnFiles};
use crate::eval::pst::{king_endgame_value, pst_value};

/// At or below this much enemy piece material (pawns excluded) the king
/// stops hiding and heads for the centre.
const ENDGAME_PIECE_MATERIAL: i32 = 1200;

/// Full starting piece material of one side. The shelter term is scaled by
/// the fraction of it the opponent still has.
const FULL_PIECE_MATERIAL: i32 = 3100;

/// Penalty per open file next to an uncastled king.
const OPEN_FILE_NEAR_KING: i32 = 10;

/// King placement for `color`, given the opponent's piece material.
pub(crate) fn king_term(files: &PawnFiles, color: Color, sq: Square, enemy_pieces: i32) -> i32 {
    if enemy_pieces <= ENDGAME_PIECE_MATERIAL {
        return king_endgame_value(color, sq);
    }

    let slot = sq.file() as usize + 1;
    let shelter = match sq.file() {
        // c- and f-file pawns matter half as much.
        0..=2 => file_shelter(files, color, 1) + file_shelter(files, color, 2) + file_shelter(files, color, 3) / 2,
        5..=7 => file_shelter(files, color, 8) + file_shelter(files, color, 7) + file_shelter(files, color, 6) / 2,
        _ => {
            let open = (slot - 1..=slot + 1).filter(|&s| files.is_open(s)).count() as i32;
            -OPEN_FILE_NEAR_KING * open
        }
    };

    (pst_value(PieceKind::King, color, sq) + shelter) * enemy_pieces / FULL_PIECE_MATERIAL
}

/// Shelter penalty for one file in front of a castled king.
fn file_shelter(files: &PawnFiles, color: Color, slot: usize) -> i32 {
    let own = match files.at(color, slot) {
        1 => 0,
        2 => -10,
        NO_PAWN => -25,
        _ => -20,
    };
    // Relative to the enemy: 5 and 4 are our third and fourth ranks.
    let enemy = match files.at(!color, slot) {
        NO_PAWN => -15,
        5 => -10,
        4 => -5,
        _ => 0,
    };
    own + enemy
}

#[cfg(test)]
mod tests {
    use chx_core::Position;

    use super::*;
    use crate::eval::material::Material;

    fn term(fen: &str, color: Color) -> i32 {
        let pos: Position = fen.parse().unwrap();
        let enemy = Material::count(&pos).pieces[(!color).index()];
        king_term(&PawnFiles::new(&pos), color, pos.king_square(color), enemy)
    }

    #[test]
    fn intact_shelter_beats_broken_shelter() {
        let intact = term("r2qk2r/pppppppp/8/8/8/8/PPPPPPPP/R2Q1RK1 w kq - 0 1", Color::White);
        let broken = term("r2qk2r/pppppppp/8/8/6P1/7P/PPPPPP2/R2Q1RK1 w kq - 0 1", Color::White);
        assert!(intact > broken, "intact {intact} should beat broken {broken}");
    }

    #[test]
    fn shelter_is_scaled_by_enemy_material() {
        // Both kings sheltered identically; only Black lost a rook.
        let fen = "1r1qk3/pppppppp/8/8/8/8/PPPPPPPP/R2Q1RK1 w - - 0 1";
        let pos: Position = fen.parse().unwrap();
        let material = Material::count(&pos);
        assert_eq!(material.pieces[Color::Black.index()], 1400);
        let table = pst_value(PieceKind::King, Color::White, Square::G1);
        assert_eq!(term(fen, Color::White), table * 1400 / FULL_PIECE_MATERIAL);
    }

    #[test]
    fn endgame_uses_centralization() {
        let fen = "4k3/8/8/8/3K4/8/8/7R w - - 0 1";
        let d4 = Square::from_algebraic("d4").unwrap();
        assert_eq!(term(fen, Color::White), king_endgame_value(Color::White, d4));
        assert_eq!(term(fen, Color::Black), king_endgame_value(Color::Black, Square::E8));
    }

    #[test]
    fn open_files_near_central_king() {
        let closed = term("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", Color::White);
        let open = term("rnbqkbnr/ppp3pp/8/8/8/8/PPP3PP/RNBQKBNR w KQkq - 0 1", Color::White);
        assert_eq!(closed, 0);
        assert_eq!(open, -3 * OPEN_FILE_NEAR_KING);
    }
}
