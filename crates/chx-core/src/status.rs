//! Game-end detection.

use std::fmt;

use crate::color::Color;
use crate::movegen::generate_legal_moves;
use crate::position::Position;

/// Whether the game is over, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveDraw,
    RepetitionDraw,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::FiftyMoveDraw => f.write_str("draw by the fifty-move rule"),
            GameStatus::RepetitionDraw => f.write_str("draw by threefold repetition"),
        }
    }
}

/// Classify `position`. Checkmate and stalemate take precedence over the
/// draw counters.
pub fn game_status(position: &Position) -> GameStatus {
    let us = position.side_to_move();
    if generate_legal_moves(position).is_empty() {
        return if position.is_in_check(us) {
            GameStatus::Checkmate { winner: !us }
        } else {
            GameStatus::Stalemate
        };
    }
    if position.is_fifty_move_draw() {
        GameStatus::FiftyMoveDraw
    } else if position.is_repetition_draw() {
        GameStatus::RepetitionDraw
    } else {
        GameStatus::Ongoing
    }
}
