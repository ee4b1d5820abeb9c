//! Core chess types: position representation, move generation, move
//! application, and game rules.

mod apply;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod mailbox;
mod movegen;
mod notation;
mod perft;
mod piece;
mod position;
mod square;
mod status;
mod zobrist;

pub use apply::apply_move;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveFlags};
pub use color::Color;
pub use error::{FenError, IllegalMove, PositionError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveList, generate_captures, generate_legal_moves, generate_pseudo_legal};
pub use notation::{format_coordinate_move, parse_coordinate_move};
pub use perft::{divide, perft};
pub use piece::{Piece, PieceKind};
pub use position::{HISTORY_LEN, Position, PositionKey, new_game};
pub use square::Square;
pub use status::{GameStatus, game_status};
pub use zobrist::zobrist_hash;
