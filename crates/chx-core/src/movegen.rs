//! Pseudo-legal move generation over the mailbox board.
//!
//! Generated moves respect piece movement but not king safety: a move may
//! leave the mover in check, and castling is offered whenever the rights
//! allow it. [`Position::apply`] rejects the illegal ones.

use crate::castle_rights::{CastlePath, CastleSide};
use crate::chess_move::{Move, MoveFlags};
use crate::mailbox;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Stack-allocated buffer for generated moves. Capacity 256 covers the theoretical max of 218.
pub struct MoveList {
    moves: [Move; 256],
    len: u16,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; 256],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < 256);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Mutable view, used to reorder moves in place.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len as usize]
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// All pseudo-legal moves for the side to move, in square order.
pub fn generate_pseudo_legal(position: &Position) -> MoveList {
    let mut list = MoveList::new();
    generate(position, false, &mut list);
    list
}

/// Pseudo-legal captures and promotions only, for quiescence search.
pub fn generate_captures(position: &Position) -> MoveList {
    let mut list = MoveList::new();
    generate(position, true, &mut list);
    list
}

/// Pseudo-legal moves that [`Position::apply`] accepts.
pub fn generate_legal_moves(position: &Position) -> MoveList {
    let mut legal = MoveList::new();
    for &mv in &generate_pseudo_legal(position) {
        if position.apply(mv).is_ok() {
            legal.push(mv);
        }
    }
    legal
}

fn generate(position: &Position, noisy_only: bool, list: &mut MoveList) {
    let us = position.side_to_move();
    for (from, piece) in position.pieces() {
        if piece.color() != us {
            continue;
        }
        match piece.kind() {
            PieceKind::Pawn => gen_pawn(position, from, noisy_only, list),
            kind => {
                gen_piece(position, from, kind, noisy_only, list);
                if kind == PieceKind::King && !noisy_only {
                    gen_castles(position, from, list);
                }
            }
        }
    }
}

// ── Pieces ──────────────────────────────────────────────────────────────────

fn gen_piece(position: &Position, from: Square, kind: PieceKind, noisy_only: bool, list: &mut MoveList) {
    let us = position.side_to_move();
    for &delta in mailbox::offsets(kind) {
        let mut cur = from;
        while let Some(to) = cur.offset(delta) {
            match position.piece_on(to) {
                Some(target) => {
                    if target.color() != us {
                        list.push(Move::new(from, to, MoveFlags::CAPTURE));
                    }
                    break;
                }
                None => {
                    if !noisy_only {
                        list.push(Move::new(from, to, MoveFlags::NONE));
                    }
                }
            }
            if !kind.slides() {
                break;
            }
            cur = to;
        }
    }
}

fn gen_castles(position: &Position, king: Square, list: &mut MoveList) {
    let us = position.side_to_move();
    for side in [CastleSide::KingSide, CastleSide::QueenSide] {
        let path = CastlePath::of(us, side);
        if position.castling().has(us, side) && path.king_from == king {
            list.push(Move::new(path.king_from, path.king_to, MoveFlags::CASTLE));
        }
    }
}

// ── Pawns ───────────────────────────────────────────────────────────────────

fn gen_pawn(position: &Position, from: Square, noisy_only: bool, list: &mut MoveList) {
    let us = position.side_to_move();
    let push = us.pawn_push();
    let relative_rank = us.relative_rank(from.rank());
    let promotes = relative_rank == 6;

    for delta in [push - 1, push + 1] {
        let Some(to) = from.offset(delta) else {
            continue;
        };
        match position.piece_on(to) {
            Some(target) if target.color() != us => {
                push_pawn_move(from, to, MoveFlags::CAPTURE, promotes, list);
            }
            None if position.en_passant() == Some(to) => {
                let flags = MoveFlags::PAWN | MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
                list.push(Move::new(from, to, flags));
            }
            _ => {}
        }
    }

    let Some(one) = from.offset(push) else {
        return;
    };
    if position.piece_on(one).is_some() {
        return;
    }
    if promotes {
        push_pawn_move(from, one, MoveFlags::NONE, true, list);
    } else if !noisy_only {
        list.push(Move::new(from, one, MoveFlags::PAWN));
        if relative_rank == 1
            && let Some(two) = one.offset(push)
            && position.piece_on(two).is_none()
        {
            list.push(Move::new(from, two, MoveFlags::PAWN | MoveFlags::DOUBLE_PUSH));
        }
    }
}

/// Push a pawn move, expanding it into the four promotions (queen first)
/// when the pawn reaches the last rank.
fn push_pawn_move(from: Square, to: Square, flags: MoveFlags, promotes: bool, list: &mut MoveList) {
    if promotes {
        for &kind in PieceKind::PROMOTIONS.iter().rev() {
            list.push(Move::new_promotion(from, to, kind, flags));
        }
    } else {
        list.push(Move::new(from, to, flags | MoveFlags::PAWN));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn texts(list: &MoveList) -> Vec<String> {
        list.as_slice().iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn starting_position_20_moves() {
        let pos = Position::initial();
        let moves = generate_pseudo_legal(&pos);
        assert_eq!(moves.len(), 20, "got {:?}", texts(&moves));
        let pawn_moves = moves.as_slice().iter().filter(|m| m.is_pawn_move()).count();
        assert_eq!(pawn_moves, 16);
    }

    #[test]
    fn twenty_replies_to_e4() {
        let pos = Position::initial();
        let e4 = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
            MoveFlags::PAWN | MoveFlags::DOUBLE_PUSH,
        );
        let next = pos.apply(e4).unwrap();
        assert_eq!(generate_legal_moves(&next).len(), 20);
    }

    #[test]
    fn captures_only_lists_noisy_moves() {
        // White queen d4 can take the knight on d7 or the pawn on g7; a7 promotes.
        let pos: Position = "4k3/P2n2p1/8/8/3Q4/8/8/4K3 w - - 0 1".parse().unwrap();
        let noisy = generate_captures(&pos);
        assert!(noisy.as_slice().iter().all(|m| m.is_noisy()));
        let mut found = texts(&noisy);
        found.sort();
        assert_eq!(found, ["a7a8b", "a7a8n", "a7a8q", "a7a8r", "d4d7", "d4g7"]);
    }

    #[test]
    fn promotion_generates_4_moves() {
        let pos: Position = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&pos);
        let promos: Vec<_> = moves.as_slice().iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promos.len(), 4, "promotion should generate 4 moves (Q/R/B/N)");
        assert_eq!(promos[0].promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn castling_is_gated_by_rights_only() {
        // Bishop on a6 attacks f1: the castle is generated but not legal.
        let pos: Position = "4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        let pseudo = texts(&generate_pseudo_legal(&pos));
        assert!(pseudo.contains(&"e1g1".to_string()));
        assert!(pseudo.contains(&"e1c1".to_string()));

        let legal = texts(&generate_legal_moves(&pos));
        assert!(!legal.contains(&"e1g1".to_string()));
        assert!(legal.contains(&"e1c1".to_string()));
    }

    #[test]
    fn no_castling_without_rights() {
        let pos: Position = "4k3/8/8/8/8/8/8/R3K2R w - - 0 1".parse().unwrap();
        assert!(generate_pseudo_legal(&pos).as_slice().iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn en_passant_is_generated() {
        let pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        let moves = generate_legal_moves(&pos);
        let ep: Vec<_> = moves.as_slice().iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 1, "should have 1 en passant move");
    }

    #[test]
    fn en_passant_discovered_check_illegal() {
        // bxc6 would expose the king on a5 to the rook on h5.
        let pos: Position = "4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1".parse().unwrap();
        let moves = generate_legal_moves(&pos);
        assert!(moves.as_slice().iter().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn pinned_knight_zero_moves() {
        let pos: Position = "4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&pos);
        let knight = Square::from_algebraic("e2").unwrap();
        assert_eq!(moves.as_slice().iter().filter(|m| m.from() == knight).count(), 0);
    }

    #[test]
    fn double_check_king_only() {
        let pos: Position = "4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_legal_moves(&pos);
        assert!(!moves.is_empty());
        for mv in &moves {
            assert_eq!(mv.from(), pos.king_square(Color::White), "non-king move {mv}");
        }
    }

    #[test]
    fn blocked_pawn_has_no_push() {
        let pos: Position = "4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1".parse().unwrap();
        let moves = generate_pseudo_legal(&pos);
        let e2 = Square::from_algebraic("e2").unwrap();
        assert!(moves.as_slice().iter().all(|m| m.from() != e2));
    }
}
