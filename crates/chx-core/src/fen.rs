//! FEN string parsing and serialization for [`Position`].

use std::str::FromStr;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a FEN string. The two move counters may be omitted and default
    /// to `0` and `1`.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let squares = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let castling = CastleRights::from_fen(fields[2])?;
        let en_passant = parse_en_passant(fields[3], side_to_move)?;

        let fifty = parse_counter(fields.get(4).copied(), "halfmove clock", 0)?;
        let fullmove = parse_counter(fields.get(5).copied(), "fullmove number", 1)?;

        Ok(Position::from_parts(
            squares,
            side_to_move,
            castling,
            en_passant,
            fifty,
            fullmove,
        )?)
    }

    /// Serialize to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(64);
        for rank in (0..8).rev() {
            let mut empty = 0u8;
            for file in 0..8 {
                match self.piece_on(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        placement.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push((b'0' + empty) as char);
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {} {en_passant} {} {}",
            self.castling().to_fen(),
            self.fifty(),
            self.fullmove()
        )
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        Position::from_fen(fen)
    }
}

fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut squares = [None; 64];
    for (rank_index, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first.
        let rank = 7 - rank_index as u8;
        let mut file: usize = 0;

        for c in rank_str.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                file += run as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            if file >= 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: file + 1,
                });
            }
            squares[Square::new(file as u8, rank).index()] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadRankLength {
                rank_index,
                length: file,
            });
        }
    }
    Ok(squares)
}

/// The target must sit behind a pawn that just double-pushed: rank 6 when
/// White is to move, rank 3 when Black is.
fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant {
        found: field.to_string(),
    };
    let sq = Square::from_algebraic(field).ok_or_else(invalid)?;
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if sq.rank() != expected_rank {
        return Err(invalid());
    }
    Ok(Some(sq))
}

fn parse_counter(field: Option<&str>, name: &'static str, default: u16) -> Result<u16, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse::<u16>().map_err(|_| FenError::InvalidMoveCounter {
            field: name,
            found: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;
    use crate::error::PositionError;

    #[test]
    fn starting_fen_matches_initial() {
        let parsed: Position = STARTING_FEN.parse().unwrap();
        assert_eq!(parsed, Position::initial());
        assert_eq!(Position::initial().to_fen(), STARTING_FEN);
    }

    #[test]
    fn fen_round_trips() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "4k3/8/8/8/8/8/8/4K3 b - - 37 60",
        ];
        for fen in fens {
            let pos: Position = fen.parse().unwrap();
            assert_eq!(pos.to_fen(), fen, "round-trip failed");
        }
    }

    #[test]
    fn counters_are_optional() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 w - -".parse().unwrap();
        assert_eq!(pos.fifty(), 0);
        assert_eq!(pos.fullmove(), 1);
    }

    #[test]
    fn black_to_move_sets_history_ply() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K3 b - - 0 10".parse().unwrap();
        assert_eq!(pos.hply(), 19);
        assert_eq!(pos.ply(), 0);
    }

    #[test]
    fn piece_placement() {
        let pos: Position = "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1".parse().unwrap();
        assert_eq!(pos.piece_on(Square::A1), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert_eq!(pos.king_square(Color::White), Square::E1);
        assert_eq!(pos.king_square(Color::Black), Square::E8);
    }

    #[test]
    fn wrong_field_count() {
        let err = "4k3/8/8/8/8/8/8/4K3 w".parse::<Position>().unwrap_err();
        assert_eq!(err, FenError::WrongFieldCount { found: 2 });
    }

    #[test]
    fn wrong_rank_count() {
        let err = "4k3/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert_eq!(err, FenError::WrongRankCount { found: 7 });
    }

    #[test]
    fn rank_too_long() {
        let err = "4k4/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert_eq!(
            err,
            FenError::BadRankLength {
                rank_index: 0,
                length: 9
            }
        );
    }

    #[test]
    fn invalid_piece_char() {
        let err = "4k3/8/8/8/8/8/8/4X3 w - - 0 1".parse::<Position>().unwrap_err();
        assert_eq!(err, FenError::InvalidPieceChar { character: 'X' });
    }

    #[test]
    fn invalid_color() {
        let err = "4k3/8/8/8/8/8/8/4K3 x - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidColor { .. }));
    }

    #[test]
    fn en_passant_must_match_side_to_move() {
        let ok = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse::<Position>();
        assert!(ok.is_ok());
        let err = "4k3/8/8/3pP3/8/8/8/4K3 w - d3 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidEnPassant { .. }));
    }

    #[test]
    fn bad_counter() {
        let err = "4k3/8/8/8/8/8/8/4K3 w - - x 1".parse::<Position>().unwrap_err();
        assert!(matches!(
            err,
            FenError::InvalidMoveCounter {
                field: "halfmove clock",
                ..
            }
        ));
    }

    #[test]
    fn pawn_on_back_rank_is_rejected() {
        let err = "P3k3/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err();
        assert!(matches!(err, FenError::InvalidPosition { .. }));
    }

    #[test]
    fn side_not_to_move_in_check_is_rejected() {
        let err = "4k3/8/8/8/8/8/8/4R1K1 w - - 0 1".parse::<Position>().unwrap_err();
        assert_eq!(
            err,
            FenError::InvalidPosition {
                source: PositionError::OpponentInCheck { color: Color::Black }
            }
        );
        // The same placement is fine with the checked side to move.
        assert!("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1".parse::<Position>().is_ok());
    }
}
