//! Zobrist keys for repetition detection.
//!
//! One key per (piece, square), one for black to move, one per castling flag
//! and one per en-passant file, laid out in a single table that is filled at
//! compile time by splitmix64 from a fixed seed. Hashes are therefore stable
//! across runs and builds.

use crate::types::Piece;

const PIECE_KEYS: usize = 2 * 6 * 64;
const BLACK_TO_MOVE: usize = PIECE_KEYS;
const CASTLING: usize = BLACK_TO_MOVE + 1;
const EN_PASSANT: usize = CASTLING + 4;
const KEY_COUNT: usize = EN_PASSANT + 8;

pub struct ZobristKeys {
    table: [u64; KEY_COUNT],
}

impl ZobristKeys {
    const fn generate(seed: u64) -> Self {
        let mut table = [0u64; KEY_COUNT];
        let mut state = seed;
        let mut i = 0;
        while i < KEY_COUNT {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            table[i] = z ^ (z >> 31);
            i += 1;
        }
        Self { table }
    }

    #[inline]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.table[(piece.color.idx() * 6 + piece.kind.idx()) * 64 + sq as usize]
    }

    #[inline]
    pub fn black_to_move(&self) -> u64 {
        self.table[BLACK_TO_MOVE]
    }

    /// `index`: 0 white kingside, 1 white queenside, 2 black kingside,
    /// 3 black queenside.
    #[inline]
    pub fn castling_key(&self, index: usize) -> u64 {
        self.table[CASTLING + index]
    }

    #[inline]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.table[EN_PASSANT + file as usize]
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::generate(0x4D59_5DF4_D0F3_3173);

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
