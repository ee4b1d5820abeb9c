//! Copy-make move application with king-safety validation.

use crate::castle_rights::CastlePath;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::IllegalMove;
use crate::movegen::generate_pseudo_legal;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;

/// Play `mv` after checking that the generator produces it here.
///
/// Unlike [`Position::apply`], this accepts moves from untrusted sources
/// such as user input or an opening book.
pub fn apply_move(position: &Position, mv: Move) -> Result<Position, IllegalMove> {
    if !generate_pseudo_legal(position).contains(mv) {
        return Err(IllegalMove { mv });
    }
    position.apply(mv)
}

impl Position {
    /// Play `mv` and return the resulting position.
    ///
    /// `mv` must come from the move generator for this position. The move is
    /// rejected with [`IllegalMove`] when it would leave the mover's king
    /// attacked, or when a castling king would start on, cross, or land on an
    /// attacked square or pass an occupied one. `self` is never modified.
    pub fn apply(&self, mv: Move) -> Result<Position, IllegalMove> {
        let us = self.side_to_move();
        let illegal = IllegalMove { mv };

        let moving = match self.piece_on(mv.from()) {
            Some(piece) if piece.color() == us => piece,
            _ => return Err(illegal),
        };

        let castle = if mv.is_castle() {
            let path = CastlePath::by_destination(mv.to()).ok_or(illegal)?;
            if !self.castle_path_is_clear(&path, us) {
                return Err(illegal);
            }
            Some(path)
        } else {
            None
        };

        let mut next = self.clone();
        next.advance_clocks(mv.is_irreversible());

        if mv.is_en_passant() {
            let victim = mv.to().offset(-us.pawn_push()).ok_or(illegal)?;
            next.take(victim);
        } else {
            next.take(mv.to());
        }

        next.take(mv.from());
        let landed = match mv.promotion() {
            Some(kind) => Piece::new(us, kind),
            None => moving,
        };
        next.put(mv.to(), landed);

        if let Some(path) = castle {
            if let Some(rook) = next.take(path.rook_from) {
                next.put(path.rook_to, rook);
            }
        }

        next.set_castling(self.castling().after_move(mv.from(), mv.to()));
        let target = if mv.is_double_push() {
            mv.from().offset(us.pawn_push())
        } else {
            None
        };
        next.set_en_passant(target);
        next.pass_turn();

        if next.is_in_check(us) {
            return Err(illegal);
        }
        debug_assert_eq!(next.hash(), crate::zobrist::zobrist_hash(&next));
        Ok(next)
    }

    /// Castling preconditions checked before the king moves: the rook is
    /// home, the squares between are empty, and the king neither starts
    /// in, crosses, nor lands on an attacked square.
    fn castle_path_is_clear(&self, path: &CastlePath, us: Color) -> bool {
        self.piece_on(path.rook_from) == Some(Piece::new(us, PieceKind::Rook))
            && self.king_square(us) == path.king_from
            && path.empty.iter().all(|&sq| self.piece_on(sq).is_none())
            && path.safe.iter().all(|&sq| !self.is_square_attacked(sq, !us))
    }
}
