//! Error types for position setup and move application.

use crate::chess_move::Move;
use crate::color::Color;

/// A move that cannot be played in the given position.
///
/// Returned without modifying the position it was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal move: {mv}")]
pub struct IllegalMove {
    /// The rejected move.
    pub mv: Move,
}

/// Structural problems in a position built from external input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// A side does not have exactly one king.
    #[error("{color} has {count} kings, expected exactly 1")]
    KingCount {
        /// The side with the wrong king count.
        color: Color,
        /// Number of kings found.
        count: usize,
    },

    /// A pawn stands on the first or eighth rank.
    #[error("pawn on back rank")]
    PawnOnBackRank,

    /// The side that just moved left its king attacked.
    #[error("{color} is in check but it is not {color}'s move")]
    OpponentInCheck {
        /// The side not to move.
        color: Color,
    },
}

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// Fewer than four or more than six space-separated fields.
    #[error("expected 4 to 6 FEN fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },

    /// The piece placement does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },

    /// A rank describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index in FEN order (0 = rank 8).
        rank_index: usize,
        /// Number of squares described.
        length: usize,
    },

    /// Unrecognized character in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The offending character.
        character: char,
    },

    /// The active color is not `w` or `b`.
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The offending field.
        found: String,
    },

    /// Unrecognized character in the castling field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar {
        /// The offending character.
        character: char,
    },

    /// The en passant field is not `-` or a square on rank 3 or 6.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant {
        /// The offending field.
        found: String,
    },

    /// A move counter is not a number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// `"halfmove clock"` or `"fullmove number"`.
        field: &'static str,
        /// The offending field.
        found: String,
    },

    /// The placement parsed but violates a structural invariant.
    #[error("invalid position: {source}")]
    InvalidPosition {
        /// The underlying validation failure.
        #[from]
        source: PositionError,
    },
}
