//! Standard Algebraic Notation for move records.

use crate::board::Position;
use crate::movegen::{has_legal_move, legal_moves};
use crate::types::*;

/// SAN for `mv`, which must be legal in `pos` (the position before the move).
pub fn to_san(pos: &Position, mv: Move) -> String {
    let Some(piece) = pos.piece_at(mv.from) else {
        return format!("{}{}", sq_to_coord(mv.from), sq_to_coord(mv.to));
    };

    let mut san = if mv.is_castle {
        if file_of(mv.to) > file_of(mv.from) {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let mut san = String::new();
        let is_capture = mv.is_en_passant || pos.piece_at(mv.to).is_some();

        if piece.kind == PieceKind::Pawn {
            if is_capture {
                san.push((b'a' + file_of(mv.from) as u8) as char);
            }
        } else {
            san.push(piece.kind.to_char().to_ascii_uppercase());
            san.push_str(&disambiguation(pos, mv, piece));
        }
        if is_capture {
            san.push('x');
        }
        san.push_str(&sq_to_coord(mv.to));
        if let Some(promo) = mv.promo {
            san.push('=');
            san.push(promo.to_char().to_ascii_uppercase());
        }
        san
    };

    let mut after = pos.clone();
    after.make_move(mv);
    if after.in_check(after.side_to_move) {
        san.push(if has_legal_move(&after) { '+' } else { '#' });
    }
    san
}

/// File, rank, or full square of the origin when another piece of the same
/// kind can reach the same destination.
fn disambiguation(pos: &Position, mv: Move, piece: Piece) -> String {
    let rivals: Vec<u8> = legal_moves(pos)
        .into_iter()
        .filter(|m| m.to == mv.to && m.from != mv.from && pos.piece_at(m.from) == Some(piece))
        .map(|m| m.from)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }
    let coord = sq_to_coord(mv.from);
    if rivals.iter().all(|&s| file_of(s) != file_of(mv.from)) {
        coord[0..1].to_string()
    } else if rivals.iter().all(|&s| rank_of(s) != rank_of(mv.from)) {
        coord[1..2].to_string()
    } else {
        coord
    }
}
