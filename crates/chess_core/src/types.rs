use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// Rank (0-based) a pawn of this colour promotes on.
    pub fn promotion_rank(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn idx(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lowercase letter used by FEN (black) and UCI promotion suffixes.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Pieces a pawn may promote to.
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn to_fen_char(self) -> char {
        let ch = self.kind.to_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Piece> {
        let kind = PieceKind::from_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }
}

/// A fully resolved legal move. Flags are filled in by move generation,
/// never by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: u8, // 0..63
    pub to: u8,   // 0..63
    pub promo: Option<PieceKind>,
    pub is_en_passant: bool,
    pub is_castle: bool,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            is_en_passant: false,
            is_castle: false,
        }
    }

    pub fn intent(self) -> MoveIntent {
        MoveIntent {
            from: self.from,
            to: self.to,
            promotion: self.promo,
        }
    }
}

/// A move proposal from the human or the engine that has not been validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub from: u8,
    pub to: u8,
    pub promotion: Option<PieceKind>,
}

impl MoveIntent {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Build an intent from two coordinate strings such as `"e2"`, `"e4"`.
    pub fn from_coords(from: &str, to: &str) -> Option<Self> {
        Some(Self::new(coord_to_sq(from)?, coord_to_sq(to)?))
    }
}

// Helpers
pub fn file_of(sq: u8) -> i8 {
    (sq % 8) as i8
}
pub fn rank_of(sq: u8) -> i8 {
    (sq / 8) as i8
}
pub fn sq(file: i8, rank: i8) -> Option<u8> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank as u8) * 8 + (file as u8))
    } else {
        None
    }
}

/// True for a1, c1, ... (the dark squares).
pub fn is_dark_square(sq: u8) -> bool {
    (file_of(sq) + rank_of(sq)) % 2 == 0
}

pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % 8)) as char;
    let r = (b'1' + (sq / 8)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    let file = f - b'a';
    let rank = r - b'1';
    Some(rank * 8 + file)
}
