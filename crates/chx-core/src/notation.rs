//! Coordinate move notation (`e2e4`, `e7e8q`).

use crate::chess_move::Move;
use crate::movegen::MoveList;
use crate::piece::PieceKind;
use crate::square::Square;

/// Match coordinate text against `legal_moves`.
///
/// The text is four characters of from/to squares plus an optional promotion
/// letter in either case. A promotion without a letter means a queen.
/// Returns `None` when the text is malformed or names no move in the list.
pub fn parse_coordinate_move(text: &str, legal_moves: &MoveList) -> Option<Move> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return None;
    }
    let from = Square::from_algebraic(&text[0..2])?;
    let to = Square::from_algebraic(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_letter(c)? {
            PieceKind::Pawn | PieceKind::King => return None,
            kind => Some(kind),
        },
    };

    legal_moves.as_slice().iter().copied().find(|mv| {
        mv.from() == from
            && mv.to() == to
            && match (mv.promotion(), promotion) {
                (None, None) => true,
                (Some(kind), Some(wanted)) => kind == wanted,
                (Some(kind), None) => kind == PieceKind::Queen,
                (None, Some(_)) => false,
            }
    })
}

/// Coordinate text for `mv`; the inverse of [`parse_coordinate_move`].
pub fn format_coordinate_move(mv: Move) -> String {
    mv.to_string()
}
