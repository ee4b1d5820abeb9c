//! Static evaluation.
//!
//! Scores are in centipawns from the side to move's point of view.

pub mod king_safety;
pub mod material;
pub mod pawns;
pub mod pst;
pub mod rooks;

use std::fmt;

use chx_core::{Color, PieceKind, Position};

use self::king_safety::king_term;
use self::material::Material;
use self::pawns::{PawnFiles, pawn_term};
use self::pst::pst_value;
use self::rooks::rook_term;
use crate::search::negamax::MATE_THRESHOLD;

/// Largest static score magnitude; anything beyond reads as a mate.
pub const EVAL_LIMIT: i32 = MATE_THRESHOLD - 1;

/// Which static evaluator to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EvalStrategy {
    /// Material only.
    Simple,
    /// Material, piece-square tables, pawn structure, rook files, king safety.
    #[default]
    Original,
}

impl EvalStrategy {
    pub const fn name(self) -> &'static str {
        match self {
            EvalStrategy::Simple => "simple",
            EvalStrategy::Original => "original",
        }
    }
}

impl fmt::Display for EvalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate `position` for the side to move, within `±EVAL_LIMIT`.
pub fn evaluate(position: &Position, strategy: EvalStrategy) -> i32 {
    let score = match strategy {
        EvalStrategy::Simple => material::simple(position),
        EvalStrategy::Original => original(position),
    };
    score.clamp(-EVAL_LIMIT, EVAL_LIMIT)
}

fn original(position: &Position) -> i32 {
    let material = Material::count(position);
    let files = PawnFiles::new(position);
    let mut score = [material.total(Color::White), material.total(Color::Black)];

    for (sq, piece) in position.pieces() {
        let color = piece.color();
        score[color.index()] += match piece.kind() {
            PieceKind::Pawn => pawn_term(&files, color, sq),
            kind @ (PieceKind::Knight | PieceKind::Bishop) => pst_value(kind, color, sq),
            PieceKind::Rook => rook_term(&files, color, sq),
            PieceKind::Queen => 0,
            PieceKind::King => king_term(&files, color, sq, material.pieces[(!color).index()]),
        };
    }

    let us = position.side_to_move();
    score[us.index()] - score[(!us).index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORDE_FEN: &str = "4k3/8/8/8/8/QQ6/RRBBNN2/QQQQKQQQ w - - 0 1";

    const MIRRORED: [(&str, &str); 3] = [
        (
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3",
        ),
        (
            "6k1/5ppp/8/8/8/8/1P3PPP/R5K1 w - - 0 1",
            "r5k1/1p3ppp/8/8/8/8/5PPP/6K1 b - - 0 1",
        ),
        ("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1", "4k3/8/8/8/3p4/8/8/4K3 b - - 0 1"),
    ];

    #[test]
    fn huge_material_stays_below_mate_scores() {
        let horde: Position = HORDE_FEN.parse().unwrap();
        for strategy in [EvalStrategy::Simple, EvalStrategy::Original] {
            assert_eq!(evaluate(&horde, strategy), EVAL_LIMIT, "{strategy}");
        }
    }

    #[test]
    fn starting_position_is_zero() {
        let pos = Position::initial();
        assert_eq!(evaluate(&pos, EvalStrategy::Simple), 0);
        assert_eq!(evaluate(&pos, EvalStrategy::Original), 0);
    }

    #[test]
    fn color_mirror_gives_same_score() {
        for (white, black) in MIRRORED {
            let w: Position = white.parse().unwrap();
            let b: Position = black.parse().unwrap();
            for strategy in [EvalStrategy::Simple, EvalStrategy::Original] {
                assert_eq!(
                    evaluate(&w, strategy),
                    evaluate(&b, strategy),
                    "{strategy} differs between {white} and {black}"
                );
            }
        }
    }

    #[test]
    fn side_to_move_flips_sign() {
        let w: Position = "6k1/5ppp/8/8/8/8/1P3PPP/R5K1 w - - 0 1".parse().unwrap();
        let b: Position = "6k1/5ppp/8/8/8/8/1P3PPP/R5K1 b - - 0 1".parse().unwrap();
        assert_eq!(evaluate(&w, EvalStrategy::Original), -evaluate(&b, EvalStrategy::Original));
        assert!(evaluate(&w, EvalStrategy::Original) > 500);
    }

    #[test]
    fn original_prefers_developed_centre() {
        let start = Position::initial();
        let e4: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        assert!(evaluate(&e4, EvalStrategy::Original) > evaluate(&start, EvalStrategy::Original));
        assert_eq!(evaluate(&e4, EvalStrategy::Simple), 0);
    }
}
