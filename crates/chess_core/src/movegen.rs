use crate::board::{CastlingRights, Position, DIAGONALS, KING_STEPS, KNIGHT_STEPS, ORTHOGONALS};
use crate::types::*;

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut scratch = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut scratch, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
/// `pos` is restored before returning.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let exposed = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !exposed
    });
}

pub fn has_legal_move(pos: &Position) -> bool {
    !legal_moves(pos).is_empty()
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move;
    for from in 0..64u8 {
        let Some(pc) = pos.piece_at(from) else {
            continue;
        };
        if pc.color != us {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, us, out),
            PieceKind::Knight => gen_steps(pos, from, us, &KNIGHT_STEPS, out),
            PieceKind::Bishop => gen_rays(pos, from, us, &DIAGONALS, out),
            PieceKind::Rook => gen_rays(pos, from, us, &ORTHOGONALS, out),
            PieceKind::Queen => {
                gen_rays(pos, from, us, &DIAGONALS, out);
                gen_rays(pos, from, us, &ORTHOGONALS, out);
            }
            PieceKind::King => {
                gen_steps(pos, from, us, &KING_STEPS, out);
                gen_castles(pos, from, us, out);
            }
        }
    }
}

fn push_pawn_move(from: u8, to: u8, us: Color, out: &mut Vec<Move>) {
    if rank_of(to) == us.promotion_rank() {
        for kind in PROMOTIONS {
            let mut mv = Move::new(from, to);
            mv.promo = Some(kind);
            out.push(mv);
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(pos: &Position, from: u8, us: Color, out: &mut Vec<Move>) {
    let (f, r) = (file_of(from), rank_of(from));
    let (dir, start_rank) = match us {
        Color::White => (1, 1),
        Color::Black => (-1, 6),
    };

    if let Some(one) = sq(f, r + dir).filter(|&s| pos.piece_at(s).is_none()) {
        push_pawn_move(from, one, us, out);
        if r == start_rank {
            if let Some(two) = sq(f, r + 2 * dir).filter(|&s| pos.piece_at(s).is_none()) {
                out.push(Move::new(from, two));
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != us => push_pawn_move(from, to, us, out),
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_steps(pos: &Position, from: u8, us: Color, steps: &[(i8, i8)], out: &mut Vec<Move>) {
    for (df, dr) in steps {
        if let Some(to) = sq(file_of(from) + df, rank_of(from) + dr) {
            if pos.piece_at(to).map_or(true, |pc| pc.color != us) {
                out.push(Move::new(from, to));
            }
        }
    }
}

fn gen_rays(pos: &Position, from: u8, us: Color, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    for (df, dr) in dirs {
        let (mut f, mut r) = (file_of(from) + df, rank_of(from) + dr);
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) => {
                    if pc.color != us {
                        out.push(Move::new(from, to));
                    }
                    break;
                }
            }
            f += df;
            r += dr;
        }
    }
}

/// Castling: the king is on its home square, the right is held, the squares
/// between king and rook are empty, and the king does not start in, pass
/// through or land on an attacked square. Landing is rechecked by the
/// legality filter anyway.
fn gen_castles(pos: &Position, from: u8, us: Color, out: &mut Vec<Move>) {
    let home = match us {
        Color::White => 4u8,
        Color::Black => 60u8,
    };
    if from != home || pos.in_check(us) {
        return;
    }
    let them = us.other();
    // (right, squares that must be empty, squares the king crosses, destination)
    let sides: [(u8, &[u8], [u8; 2], u8); 2] = [
        (
            CastlingRights::kingside(us),
            &[home + 1, home + 2],
            [home + 1, home + 2],
            home + 2,
        ),
        (
            CastlingRights::queenside(us),
            &[home - 1, home - 2, home - 3],
            [home - 1, home - 2],
            home - 2,
        ),
    ];
    for (right, empty, crossed, to) in sides {
        if !pos.castling.has(right) {
            continue;
        }
        if empty.iter().any(|&s| pos.piece_at(s).is_some()) {
            continue;
        }
        if crossed.iter().any(|&s| pos.is_square_attacked(s, them)) {
            continue;
        }
        let mut mv = Move::new(from, to);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
