//! Opening-book seam consulted before searching.

use std::collections::HashMap;

use chx_core::{Move, Position, generate_legal_moves, parse_coordinate_move};
use thiserror::Error;

/// A source of prepared replies keyed by the moves played so far.
pub trait OpeningBook {
    /// The reply to play after `history` (moves from the initial position),
    /// if the book has one.
    fn book_move(&self, history: &[Move]) -> Option<Move>;
}

/// A book that never answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBook;

impl OpeningBook for NoBook {
    fn book_move(&self, _history: &[Move]) -> Option<Move> {
        None
    }
}

/// A book line that does not replay from the initial position.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("book line {line}: `{text}` is not a legal move")]
pub struct BookError {
    pub line: usize,
    pub text: String,
}

/// In-memory book mapping a move sequence to a reply.
#[derive(Debug, Default, Clone)]
pub struct LineBook {
    replies: HashMap<Vec<Move>, Move>,
}

impl LineBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `reply` after exactly `history`.
    pub fn insert(&mut self, history: Vec<Move>, reply: Move) {
        self.replies.insert(history, reply);
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// Build a book from lines of coordinate moves, one game line per text
    /// line. Every prefix of a line answers with the move that follows it.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_lines(text: &str) -> Result<Self, BookError> {
        let mut book = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }
            let mut position = Position::initial();
            let mut history = Vec::new();
            for word in raw.split_whitespace() {
                let illegal = || BookError {
                    line: index + 1,
                    text: word.to_string(),
                };
                let mv = parse_coordinate_move(word, &generate_legal_moves(&position)).ok_or_else(illegal)?;
                position = position.apply(mv).map_err(|_| illegal())?;
                book.replies.entry(history.clone()).or_insert(mv);
                history.push(mv);
            }
        }
        Ok(book)
    }
}

impl OpeningBook for LineBook {
    fn book_move(&self, history: &[Move]) -> Option<Move> {
        self.replies.get(history).copied()
    }
}
