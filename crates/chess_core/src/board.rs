//! Mailbox position with make/unmake.

use crate::types::*;
use crate::zobrist::ZOBRIST;

pub(crate) const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];
pub(crate) const KING_STEPS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
pub(crate) const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Castling rights packed as four flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    pub const ALL: CastlingRights = CastlingRights(0b1111);
    pub const NONE: CastlingRights = CastlingRights(0);

    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }
    pub fn grant(&mut self, flag: u8) {
        self.0 |= flag;
    }
    pub fn revoke(&mut self, flag: u8) {
        self.0 &= !flag;
    }
    pub fn kingside(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }
    pub fn queenside(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Flag lost when a rook leaves or is captured on `sq`.
    fn rook_home_flag(sq: u8) -> u8 {
        match sq {
            0 => Self::WHITE_QUEENSIDE,
            7 => Self::WHITE_KINGSIDE,
            56 => Self::BLACK_QUEENSIDE,
            63 => Self::BLACK_KINGSIDE,
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// Everything `unmake_move` needs that the move itself does not carry.
#[derive(Clone, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    pub capture_sq: u8,
    pub moved_piece: Piece,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub rook_move: Option<(u8, u8)>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn empty() -> Self {
        Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        p.castling = CastlingRights::ALL;

        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.board[f] = Some(Piece::new(Color::White, kind));
            p.board[8 + f] = Some(Piece::new(Color::White, PieceKind::Pawn));
            p.board[48 + f] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            p.board[56 + f] = Some(Piece::new(Color::Black, kind));
        }
        p
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }
    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        self.board[sq as usize] = pc;
    }

    /// Squares holding `piece`, in a1..h8 order.
    pub fn squares_of(&self, piece: Piece) -> impl Iterator<Item = u8> + '_ {
        (0..64u8).filter(move |&s| self.piece_at(s) == Some(piece))
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.squares_of(Piece::new(c, PieceKind::King)).next()
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    fn holds(&self, sq: Option<u8>, by: Color, kinds: &[PieceKind]) -> bool {
        match sq.and_then(|s| self.piece_at(s)) {
            Some(pc) => pc.color == by && kinds.contains(&pc.kind),
            None => false,
        }
    }

    /// First occupied square along a ray from `from` (exclusive).
    fn ray_blocker(&self, from: u8, (df, dr): (i8, i8)) -> Option<u8> {
        let (mut f, mut r) = (file_of(from) + df, rank_of(from) + dr);
        while let Some(s) = sq(f, r) {
            if self.piece_at(s).is_some() {
                return Some(s);
            }
            f += df;
            r += dr;
        }
        None
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let tf = file_of(target);
        let tr = rank_of(target);

        // A pawn of `by` attacks diagonally forward, so look one rank behind.
        let behind = match by {
            Color::White => -1,
            Color::Black => 1,
        };
        if [-1, 1]
            .iter()
            .any(|df| self.holds(sq(tf + df, tr + behind), by, &[PieceKind::Pawn]))
        {
            return true;
        }
        if KNIGHT_STEPS
            .iter()
            .any(|(df, dr)| self.holds(sq(tf + df, tr + dr), by, &[PieceKind::Knight]))
        {
            return true;
        }
        if KING_STEPS
            .iter()
            .any(|(df, dr)| self.holds(sq(tf + df, tr + dr), by, &[PieceKind::King]))
        {
            return true;
        }
        DIAGONALS.iter().any(|&d| {
            self.holds(
                self.ray_blocker(target, d),
                by,
                &[PieceKind::Bishop, PieceKind::Queen],
            )
        }) || ORTHOGONALS.iter().any(|&d| {
            self.holds(
                self.ray_blocker(target, d),
                by,
                &[PieceKind::Rook, PieceKind::Queen],
            )
        })
    }

    /// Whether the side to move has a pawn placed to capture en passant.
    /// Pins are not considered.
    pub fn en_passant_capturable(&self) -> bool {
        let Some(ep) = self.en_passant else {
            return false;
        };
        let us = self.side_to_move;
        let from_rank = rank_of(ep)
            - match us {
                Color::White => 1,
                Color::Black => -1,
            };
        [-1, 1]
            .iter()
            .any(|df| self.holds(sq(file_of(ep) + df, from_rank), us, &[PieceKind::Pawn]))
    }

    /// Play a move produced by move generation. Illegal input is not checked.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let moved = self.board[mv.from as usize]
            .unwrap_or_else(|| panic!("make_move: empty origin {}", sq_to_coord(mv.from)));
        let capture_sq = if mv.is_en_passant {
            // The captured pawn sits beside the origin, on the destination file.
            (rank_of(mv.from) * 8 + file_of(mv.to)) as u8
        } else {
            mv.to
        };
        let undo = Undo {
            captured: self.piece_at(capture_sq),
            capture_sq,
            moved_piece: moved,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            rook_move: if mv.is_castle {
                Some(castle_rook_squares(mv.to))
            } else {
                None
            },
        };

        self.set_piece(capture_sq, None);
        self.set_piece(mv.from, None);
        let placed = match mv.promo {
            Some(kind) if moved.kind == PieceKind::Pawn => Piece::new(moved.color, kind),
            _ => moved,
        };
        self.set_piece(mv.to, Some(placed));

        if let Some((rook_from, rook_to)) = undo.rook_move {
            let rook = self.piece_at(rook_from);
            self.set_piece(rook_from, None);
            self.set_piece(rook_to, rook);
        }

        if moved.kind == PieceKind::King {
            self.castling.revoke(CastlingRights::kingside(moved.color));
            self.castling.revoke(CastlingRights::queenside(moved.color));
        }
        self.castling.revoke(CastlingRights::rook_home_flag(mv.from));
        self.castling.revoke(CastlingRights::rook_home_flag(mv.to));

        self.en_passant = None;
        if moved.kind == PieceKind::Pawn && (rank_of(mv.to) - rank_of(mv.from)).abs() == 2 {
            self.en_passant = sq(file_of(mv.from), (rank_of(mv.from) + rank_of(mv.to)) / 2);
        }

        if moved.kind == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.other();
        undo
    }

    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some((rook_from, rook_to)) = undo.rook_move {
            let rook = self.piece_at(rook_to);
            self.set_piece(rook_to, None);
            self.set_piece(rook_from, rook);
        }
        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved_piece));
        self.set_piece(undo.capture_sq, undo.captured);
    }

    /// Zobrist key of the position for repetition detection. The en-passant
    /// file only counts when a capture there is possible.
    pub fn position_hash(&self) -> u64 {
        let mut h = 0u64;
        for s in 0..64u8 {
            if let Some(pc) = self.piece_at(s) {
                h ^= ZOBRIST.piece_key(pc, s);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.black_to_move();
        }
        for (i, flag) in [
            CastlingRights::WHITE_KINGSIDE,
            CastlingRights::WHITE_QUEENSIDE,
            CastlingRights::BLACK_KINGSIDE,
            CastlingRights::BLACK_QUEENSIDE,
        ]
        .into_iter()
        .enumerate()
        {
            if self.castling.has(flag) {
                h ^= ZOBRIST.castling_key(i);
            }
        }
        if let Some(ep) = self.en_passant {
            if self.en_passant_capturable() {
                h ^= ZOBRIST.ep_key(file_of(ep) as u8);
            }
        }
        h
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can mate: bare kings, a single minor piece, or only
    /// bishops that all stand on one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut bishop_colors = [false; 2];
        let mut knights = 0;
        for pc_sq in 0..64u8 {
            let Some(pc) = self.piece_at(pc_sq) else {
                continue;
            };
            match pc.kind {
                PieceKind::King => {}
                PieceKind::Knight => {
                    minors += 1;
                    knights += 1;
                }
                PieceKind::Bishop => {
                    minors += 1;
                    bishop_colors[is_dark_square(pc_sq) as usize] = true;
                }
                _ => return false,
            }
        }
        minors <= 1 || (knights == 0 && !(bishop_colors[0] && bishop_colors[1]))
    }
}

/// Rook origin and destination for a castling king landing on `king_to`.
fn castle_rook_squares(king_to: u8) -> (u8, u8) {
    match king_to {
        6 => (7, 5),
        2 => (0, 3),
        62 => (63, 61),
        58 => (56, 59),
        _ => panic!("not a castling destination: {}", sq_to_coord(king_to)),
    }
}
