//! Zobrist hashing keys.
//!
//! All keys come from one xorshift64 stream evaluated at compile time, so
//! hashes are identical across runs and platforms.

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

const SEED: u64 = 0x4348_5841_4253_3031;

/// The full key set.
pub(crate) struct Keys {
    /// Indexed by `[Piece::index()][Square::index()]`.
    piece_square: [[u64; 64]; Piece::COUNT],
    /// XORed in when Black is to move.
    black_to_move: u64,
    /// Indexed by `CastleRights::bits()`.
    castling: [u64; 16],
    /// Indexed by the en passant target's file.
    en_passant_file: [u64; 8],
}

pub(crate) static KEYS: Keys = {
    let mut state = SEED;
    let mut keys = Keys {
        piece_square: [[0; 64]; Piece::COUNT],
        black_to_move: 0,
        castling: [0; 16],
        en_passant_file: [0; 8],
    };

    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < 64 {
            state = xorshift64(state);
            keys.piece_square[piece][sq] = state;
            sq += 1;
        }
        piece += 1;
    }

    state = xorshift64(state);
    keys.black_to_move = state;

    let mut i = 0;
    while i < 16 {
        state = xorshift64(state);
        keys.castling[i] = state;
        i += 1;
    }

    let mut file = 0;
    while file < 8 {
        state = xorshift64(state);
        keys.en_passant_file[file] = state;
        file += 1;
    }

    keys
};

const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

impl Keys {
    #[inline]
    pub(crate) fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.piece_square[piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move
    }

    #[inline]
    pub(crate) fn castling(&self, rights: CastleRights) -> u64 {
        self.castling[rights.bits() as usize]
    }

    #[inline]
    pub(crate) fn en_passant(&self, target: Square) -> u64 {
        self.en_passant_file[target.file() as usize]
    }
}

/// Recompute a position's hash from its contents.
///
/// The incrementally maintained [`Position::hash`] must always equal this.
pub fn zobrist_hash(position: &Position) -> u64 {
    let mut hash = position
        .pieces()
        .fold(0u64, |h, (sq, piece)| h ^ KEYS.piece(piece, sq));

    if position.side_to_move() == Color::Black {
        hash ^= KEYS.side();
    }
    hash ^= KEYS.castling(position.castling());
    if let Some(target) = position.en_passant() {
        hash ^= KEYS.en_passant(target);
    }
    hash
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn keys_are_distinct_and_nonzero() {
        let mut seen = HashSet::new();
        for row in &KEYS.piece_square {
            for &key in row {
                assert_ne!(key, 0);
                assert!(seen.insert(key), "duplicate piece-square key");
            }
        }
        assert!(seen.insert(KEYS.black_to_move));
        for &key in KEYS.castling.iter().chain(&KEYS.en_passant_file) {
            assert!(seen.insert(key), "duplicate auxiliary key");
        }
    }

    #[test]
    fn side_to_move_changes_hash() {
        let white: Position = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let black: Position = "4k3/8/8/8/8/8/8/4K3 b - - 0 1".parse().unwrap();
        assert_eq!(zobrist_hash(&white) ^ zobrist_hash(&black), KEYS.side());
    }

    #[test]
    fn castling_rights_change_hash() {
        let all: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let none: Position = "r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1".parse().unwrap();
        assert_ne!(zobrist_hash(&all), zobrist_hash(&none));
    }

    #[test]
    fn initial_position_hash_matches_stored_hash() {
        let pos = Position::initial();
        assert_eq!(zobrist_hash(&pos), pos.hash());
    }
}
