//! Forsyth-Edwards Notation in and out.

use std::fmt;
use std::str::FromStr;

use crate::board::{CastlingRights, Position};
use crate::error::FenError;
use crate::types::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse and validate a FEN string. Halfmove and fullmove counters may be
    /// omitted and default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::MissingFields(fields.len()));
        }

        let mut pos = Position::empty();
        parse_placement(fields[0], &mut pos)?;

        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };
        pos.castling = parse_castling(fields[2])?;
        pos.en_passant = parse_en_passant(fields[3])?;
        pos.halfmove_clock = parse_counter(fields.get(4).copied().unwrap_or("0"))?;
        pos.fullmove_number = parse_counter(fields.get(5).copied().unwrap_or("1"))?.max(1);

        validate(&mut pos, fields[3])?;
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match sq(file, rank).and_then(|s| self.piece_at(s)) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let rights = [
            (CastlingRights::WHITE_KINGSIDE, 'K'),
            (CastlingRights::WHITE_QUEENSIDE, 'Q'),
            (CastlingRights::BLACK_KINGSIDE, 'k'),
            (CastlingRights::BLACK_QUEENSIDE, 'q'),
        ];
        let before = out.len();
        for (flag, ch) in rights {
            if self.castling.has(flag) {
                out.push(ch);
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }

        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        ));
        out
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

fn parse_placement(placement: &str, pos: &mut Position) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }
    for (idx, row) in ranks.iter().enumerate() {
        // FEN lists rank 8 first.
        let rank = 7 - idx as i8;
        let mut file: i8 = 0;
        for ch in row.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::InvalidPiece(ch));
                }
                file += skip as i8;
            } else {
                let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                let target = sq(file, rank).ok_or(FenError::RankWidth {
                    rank: rank as u8 + 1,
                })?;
                pos.set_piece(target, Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::RankWidth {
                    rank: rank as u8 + 1,
                });
            }
        }
        if file != 8 {
            return Err(FenError::RankWidth {
                rank: rank as u8 + 1,
            });
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }
    for ch in field.chars() {
        let flag = match ch {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
        rights.grant(flag);
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<u8>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    coord_to_sq(field)
        .map(Some)
        .ok_or_else(|| FenError::InvalidEnPassant(field.to_string()))
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field
        .parse()
        .map_err(|_| FenError::InvalidCounter(field.to_string()))
}

/// Reject positions move generation cannot handle and drop castling rights
/// whose king or rook has left its home square.
fn validate(pos: &mut Position, ep_field: &str) -> Result<(), FenError> {
    for color in [Color::White, Color::Black] {
        if pos.squares_of(Piece::new(color, PieceKind::King)).count() != 1 {
            return Err(FenError::KingCount(color));
        }
    }

    for s in (0..8).chain(56..64) {
        if pos.piece_at(s).map(|pc| pc.kind) == Some(PieceKind::Pawn) {
            return Err(FenError::PawnOnBackRank(sq_to_coord(s)));
        }
    }

    if pos.in_check(pos.side_to_move.other()) {
        return Err(FenError::OpponentInCheck);
    }

    let homes = [
        (CastlingRights::WHITE_KINGSIDE, Color::White, 4u8, 7u8),
        (CastlingRights::WHITE_QUEENSIDE, Color::White, 4, 0),
        (CastlingRights::BLACK_KINGSIDE, Color::Black, 60, 63),
        (CastlingRights::BLACK_QUEENSIDE, Color::Black, 60, 56),
    ];
    for (flag, color, king_home, rook_home) in homes {
        let king_ok = pos.piece_at(king_home) == Some(Piece::new(color, PieceKind::King));
        let rook_ok = pos.piece_at(rook_home) == Some(Piece::new(color, PieceKind::Rook));
        if !(king_ok && rook_ok) {
            pos.castling.revoke(flag);
        }
    }

    if let Some(ep) = pos.en_passant {
        // The pawn that just double-pushed belongs to the side not to move.
        let pusher = pos.side_to_move.other();
        let (ep_rank, step) = match pusher {
            Color::White => (2, 1),
            Color::Black => (5, -1),
        };
        let pawn_sq = sq(file_of(ep), rank_of(ep) + step);
        let origin_sq = sq(file_of(ep), rank_of(ep) - step);
        let pawn_ok =
            pawn_sq.and_then(|s| pos.piece_at(s)) == Some(Piece::new(pusher, PieceKind::Pawn));
        let path_clear =
            pos.piece_at(ep).is_none() && origin_sq.and_then(|s| pos.piece_at(s)).is_none();
        if rank_of(ep) != ep_rank || !pawn_ok || !path_clear {
            return Err(FenError::InvalidEnPassant(ep_field.to_string()));
        }
    }
    Ok(())
}
