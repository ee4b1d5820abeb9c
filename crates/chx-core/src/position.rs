//! The position: piece placement, side to move, rule counters, hash, and
//! the short hash history needed for repetition detection.

use std::fmt;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::PositionError;
use crate::mailbox::{BISHOP_OFFSETS, KNIGHT_OFFSETS, ROOK_OFFSETS, ROYAL_OFFSETS};
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist::{self, KEYS};

/// Number of earlier hashes a position remembers.
///
/// Covers the whole fifty-move window, beyond which no repetition can span.
pub const HISTORY_LEN: usize = 128;

/// A chess position.
///
/// Positions are values: [`Position::apply`](crate::Position::apply)
/// returns a new position and leaves the receiver untouched, so undoing a
/// move is just dropping the child.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    /// Half-moves since the last capture or pawn move.
    fifty: u16,
    /// Half-moves since the search root.
    ply: u16,
    /// Half-moves since the game started.
    hply: u32,
    fullmove: u16,
    hash: u64,
    kings: [Square; Color::COUNT],
    /// `history[h % HISTORY_LEN]` is the hash of the position at half-move `h`.
    history: [u64; HISTORY_LEN],
    /// Number of valid `history` entries, saturating at `HISTORY_LEN`.
    recorded: u16,
}

/// The fields that identify a position for transposition purposes.
///
/// Two positions with equal keys have the same legal moves and the same
/// static evaluation; rule counters and history are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A fresh game from the standard starting position.
pub fn new_game() -> Position {
    Position::initial()
}

impl Position {
    /// The standard starting position.
    pub fn initial() -> Position {
        let mut squares = [None; 64];
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            squares[Square::new(file, 0).index()] = Some(Piece::new(Color::White, kind));
            squares[Square::new(file, 1).index()] = Some(Piece::new(Color::White, PieceKind::Pawn));
            squares[Square::new(file, 6).index()] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            squares[Square::new(file, 7).index()] = Some(Piece::new(Color::Black, kind));
        }
        let mut position = Position {
            squares,
            side_to_move: Color::White,
            castling: CastleRights::ALL,
            en_passant: None,
            fifty: 0,
            ply: 0,
            hply: 0,
            fullmove: 1,
            hash: 0,
            kings: [Square::E1, Square::E8],
            history: [0; HISTORY_LEN],
            recorded: 0,
        };
        position.hash = zobrist::zobrist_hash(&position);
        position
    }

    /// Assemble a position from its parts, validating king placement and
    /// pawn ranks. Used by FEN parsing.
    pub(crate) fn from_parts(
        squares: [Option<Piece>; 64],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        fifty: u16,
        fullmove: u16,
    ) -> Result<Position, PositionError> {
        let mut kings = [Square::A1; Color::COUNT];
        for color in Color::ALL {
            let found: Vec<Square> = Square::all()
                .filter(|sq| squares[sq.index()] == Some(Piece::new(color, PieceKind::King)))
                .collect();
            match found.as_slice() {
                &[king] => kings[color.index()] = king,
                _ => {
                    return Err(PositionError::KingCount {
                        color,
                        count: found.len(),
                    });
                }
            }
        }

        let pawn_on_back_rank = Square::all().any(|sq| {
            matches!(squares[sq.index()], Some(p) if p.kind() == PieceKind::Pawn)
                && (sq.rank() == 0 || sq.rank() == 7)
        });
        if pawn_on_back_rank {
            return Err(PositionError::PawnOnBackRank);
        }

        let hply = u32::from(fullmove.saturating_sub(1)) * 2 + side_to_move.index() as u32;
        let mut position = Position {
            squares,
            side_to_move,
            castling,
            en_passant,
            fifty,
            ply: 0,
            hply,
            fullmove: fullmove.max(1),
            hash: 0,
            kings,
            history: [0; HISTORY_LEN],
            recorded: 0,
        };
        // Otherwise the mover could capture a king.
        if position.is_in_check(!side_to_move) {
            return Err(PositionError::OpponentInCheck {
                color: !side_to_move,
            });
        }
        position.hash = zobrist::zobrist_hash(&position);
        Ok(position)
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn may capture onto en passant, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn fifty(&self) -> u16 {
        self.fifty
    }

    /// Half-moves since the search root (see [`reset_ply`](Self::reset_ply)).
    #[inline]
    pub fn ply(&self) -> u16 {
        self.ply
    }

    /// Half-moves since the start of the game.
    #[inline]
    pub fn hply(&self) -> u32 {
        self.hply
    }

    #[inline]
    pub fn fullmove(&self) -> u16 {
        self.fullmove
    }

    /// Incrementally maintained Zobrist hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Occupied squares and their pieces, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_on(sq).map(|piece| (sq, piece)))
    }

    /// Identity used by the transposition table for exact verification.
    pub fn key(&self) -> PositionKey {
        PositionKey {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    /// Make this position the root of a new search (ply 0).
    pub fn reset_ply(&mut self) {
        self.ply = 0;
    }

    // ── Rules ───────────────────────────────────────────────────────────────

    /// Whether any piece of `by` attacks `sq`.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let holds = |from: Option<Square>, kinds: &[PieceKind]| {
            from.and_then(|f| self.piece_on(f))
                .is_some_and(|p| p.color() == by && kinds.contains(&p.kind()))
        };

        let push = by.pawn_push();
        if holds(sq.offset(-(push - 1)), &[PieceKind::Pawn])
            || holds(sq.offset(-(push + 1)), &[PieceKind::Pawn])
        {
            return true;
        }
        if KNIGHT_OFFSETS
            .iter()
            .any(|&d| holds(sq.offset(d), &[PieceKind::Knight]))
        {
            return true;
        }
        if ROYAL_OFFSETS
            .iter()
            .any(|&d| holds(sq.offset(d), &[PieceKind::King]))
        {
            return true;
        }

        let ray_hits = |offsets: &[i8], kinds: &[PieceKind]| {
            offsets.iter().any(|&d| {
                let mut cur = sq;
                while let Some(next) = cur.offset(d) {
                    if let Some(piece) = self.piece_on(next) {
                        return piece.color() == by && kinds.contains(&piece.kind());
                    }
                    cur = next;
                }
                false
            })
        };
        ray_hits(&ROOK_OFFSETS, &[PieceKind::Rook, PieceKind::Queen])
            || ray_hits(&BISHOP_OFFSETS, &[PieceKind::Bishop, PieceKind::Queen])
    }

    /// Whether `side`'s king is attacked.
    #[inline]
    pub fn is_in_check(&self, side: Color) -> bool {
        self.is_square_attacked(self.king_square(side), !side)
    }

    /// How many earlier positions since the last irreversible move share
    /// this position's hash.
    pub fn repetition_count(&self) -> usize {
        let window = usize::from(self.fifty).min(usize::from(self.recorded));
        let hply = self.hply as usize;
        (2..=window)
            .step_by(2)
            .filter(|&back| self.history[(hply - back) % HISTORY_LEN] == self.hash)
            .count()
    }

    /// Third (or later) occurrence of this position.
    #[inline]
    pub fn is_repetition_draw(&self) -> bool {
        self.repetition_count() >= 2
    }

    /// A hundred half-moves without a capture or pawn move.
    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.fifty >= 100
    }

    // ── Mutation helpers for move application ──────────────────────────────

    /// Remove and return whatever stands on `sq`, updating the hash.
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[sq.index()].take();
        if let Some(piece) = piece {
            self.hash ^= KEYS.piece(piece, sq);
        }
        piece
    }

    /// Place `piece` on the empty square `sq`, updating the hash.
    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.squares[sq.index()].is_none(), "put on occupied {sq}");
        self.squares[sq.index()] = Some(piece);
        self.hash ^= KEYS.piece(piece, sq);
        if piece.kind() == PieceKind::King {
            self.kings[piece.color().index()] = sq;
        }
    }

    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= KEYS.castling(self.castling) ^ KEYS.castling(rights);
        self.castling = rights;
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= KEYS.en_passant(old);
        }
        if let Some(new) = target {
            self.hash ^= KEYS.en_passant(new);
        }
        self.en_passant = target;
    }

    /// Record the current hash and advance the move counters for a move
    /// about to be made; `irreversible` resets the fifty-move clock.
    pub(crate) fn advance_clocks(&mut self, irreversible: bool) {
        self.history[self.hply as usize % HISTORY_LEN] = self.hash;
        self.recorded = (self.recorded + 1).min(HISTORY_LEN as u16);
        self.hply += 1;
        self.ply += 1;
        self.fifty = if irreversible { 0 } else { self.fifty.saturating_add(1) };
        if self.side_to_move == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }
    }

    pub(crate) fn pass_turn(&mut self) {
        self.side_to_move = !self.side_to_move;
        self.hash ^= KEYS.side();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Position {
    /// Text diagram, rank 8 at the top, `.` for empty squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = self
                    .piece_on(Square::new(file, rank))
                    .map_or('.', Piece::fen_char);
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "\n   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn initial_layout() {
        let pos = Position::initial();
        assert_eq!(pos.pieces().count(), 32);
        assert_eq!(pos.piece_on(Square::E1), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(pos.piece_on(Square::D8), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(pos.piece_on(sq("e4")), None);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling(), CastleRights::ALL);
        assert_eq!(pos.king_square(Color::Black), Square::E8);
    }

    #[test]
    fn nobody_in_check_at_start() {
        let pos = Position::initial();
        assert!(!pos.is_in_check(Color::White));
        assert!(!pos.is_in_check(Color::Black));
    }

    #[test]
    fn pawn_attacks_diagonally_forward() {
        let pos: Position = "4k3/8/8/8/4p3/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_square_attacked(sq("d3"), Color::Black));
        assert!(pos.is_square_attacked(sq("f3"), Color::Black));
        assert!(!pos.is_square_attacked(sq("e3"), Color::Black));
        assert!(!pos.is_square_attacked(sq("d5"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let pos: Position = "4k3/8/8/8/r2P3K/8/8/8 w - - 0 1".parse().unwrap();
        assert!(pos.is_square_attacked(sq("c4"), Color::Black));
        assert!(pos.is_square_attacked(sq("d4"), Color::Black));
        assert!(!pos.is_square_attacked(sq("h4"), Color::Black));
        assert!(!pos.is_in_check(Color::White));
    }

    #[test]
    fn knight_and_queen_give_check() {
        let knight: Position = "4k3/8/3N4/8/8/8/8/4K3 b - - 0 1".parse().unwrap();
        assert!(knight.is_in_check(Color::Black));
        let queen: Position = "4k3/8/8/8/8/8/8/Q3K3 b - - 0 1".parse().unwrap();
        assert!(!queen.is_in_check(Color::Black));
        let diagonal: Position = "4k3/8/8/8/Q7/8/8/4K3 b - - 0 1".parse().unwrap();
        assert!(diagonal.is_in_check(Color::Black));
    }

    #[test]
    fn missing_king_is_rejected() {
        let err = "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(err.to_string().contains("black has 0 kings"), "{err}");
    }

    #[test]
    fn fresh_position_has_no_repetitions() {
        let pos = Position::initial();
        assert_eq!(pos.repetition_count(), 0);
        assert!(!pos.is_repetition_draw());
        assert!(!pos.is_fifty_move_draw());
    }

    #[test]
    fn fifty_move_flag_at_hundred() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K2Q w - - 100 80".parse().unwrap();
        assert!(pos.is_fifty_move_draw());
    }

    #[test]
    fn key_ignores_counters() {
        let a: Position = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let b: Position = "4k3/8/8/8/8/8/8/4K3 w - - 37 60".parse().unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn display_draws_rank_eight_first() {
        let text = Position::initial().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8  r n b q k b n r");
        assert!(text.ends_with("white to move"));
    }
}
