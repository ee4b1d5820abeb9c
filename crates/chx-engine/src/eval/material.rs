//! Material counting and the material-only evaluator.

use chx_core::{Color, PieceKind, Position};

/// Material per side, split into pawns and pieces.
///
/// `pieces` excludes pawns; the king counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Material {
    pub pieces: [i32; Color::COUNT],
    pub pawns: [i32; Color::COUNT],
}

impl Material {
    pub fn count(position: &Position) -> Material {
        let mut material = Material::default();
        for (_, piece) in position.pieces() {
            let side = piece.color().index();
            match piece.kind() {
                PieceKind::Pawn => material.pawns[side] += PieceKind::Pawn.value(),
                kind => material.pieces[side] += kind.value(),
            }
        }
        material
    }

    /// Pawns plus pieces for one side.
    #[inline]
    pub fn total(&self, color: Color) -> i32 {
        self.pieces[color.index()] + self.pawns[color.index()]
    }
}

/// Material balance from the side to move's point of view.
pub fn simple(position: &Position) -> i32 {
    let material = Material::count(position);
    let us = position.side_to_move();
    material.total(us) - material.total(!us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_balanced() {
        let pos = Position::initial();
        let material = Material::count(&pos);
        assert_eq!(material.pawns, [800, 800]);
        assert_eq!(material.pieces, [3100, 3100]);
        assert_eq!(simple(&pos), 0);
    }

    #[test]
    fn score_is_relative_to_side_to_move() {
        let white: Position = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        let black: Position = "4k3/8/8/8/8/8/8/R3K3 b - - 0 1".parse().unwrap();
        assert_eq!(simple(&white), 500);
        assert_eq!(simple(&black), -500);
    }
}
