//! The authoritative game record: position, move history and status.
//!
//! `GameState` is the only thing allowed to decide whether a move is legal.
//! Moves from the human and moves from the engine both come in as
//! [`MoveIntent`]s and go through [`GameState::apply_move`].

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::{FenError, MoveError};
use crate::movegen::{has_legal_move, legal_moves};
use crate::san::to_san;
use crate::types::*;

/// Derived from the position after every applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    Draw { reason: DrawReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw { reason } => match reason {
                DrawReason::FiftyMoveRule => write!(f, "draw by the fifty-move rule"),
                DrawReason::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
                DrawReason::InsufficientMaterial => write!(f, "draw by insufficient material"),
            },
        }
    }
}

/// A validated, applied move. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// 1-based half-move index within the game
    pub ply: u32,
    pub color: Color,
    /// The move as played, promotion piece resolved
    pub mv: Move,
    pub uci: String,
    pub san: String,
    pub fen_before: String,
    pub fen_after: String,
}

#[derive(Debug, Clone)]
pub struct GameState {
    position: Position,
    history: Vec<MoveRecord>,
    /// Position hashes since the game (or loaded FEN) started, for repetition
    repetitions: Vec<u64>,
    status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Start from an arbitrary validated position instead of the initial one.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    fn from_position(position: Position) -> Self {
        let mut game = Self {
            repetitions: vec![position.position_hash()],
            position,
            history: Vec::new(),
            status: GameStatus::InProgress,
        };
        game.status = game.evaluate_status();
        game
    }

    /// Back to the standard starting position with an empty history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn current_position(&self) -> &Position {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Legal intents for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<MoveIntent> {
        if self.is_game_over() {
            return Vec::new();
        }
        legal_moves(&self.position)
            .into_iter()
            .map(Move::intent)
            .collect()
    }

    /// Validate `intent` against the current position and play it.
    ///
    /// A pawn reaching the last rank without a promotion piece becomes a
    /// queen. A promotion piece on a non-promoting move is ignored. On any
    /// error nothing changes.
    pub fn apply_move(&mut self, intent: MoveIntent) -> Result<MoveRecord, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let mv = self.resolve(intent)?;

        let fen_before = self.position.to_fen();
        let san = to_san(&self.position, mv);
        let color = self.position.side_to_move;
        self.position.make_move(mv);

        let record = MoveRecord {
            ply: self.history.len() as u32 + 1,
            color,
            mv,
            uci: mv.intent().to_string(),
            san,
            fen_before,
            fen_after: self.position.to_fen(),
        };
        self.history.push(record.clone());
        self.repetitions.push(self.position.position_hash());
        self.status = self.evaluate_status();
        Ok(record)
    }

    fn resolve(&self, intent: MoveIntent) -> Result<Move, MoveError> {
        if let Some(kind) = intent.promotion {
            if !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotion(kind));
            }
        }
        let wanted_promo = intent.promotion.unwrap_or(PieceKind::Queen);
        legal_moves(&self.position)
            .into_iter()
            .find(|m| {
                m.from == intent.from
                    && m.to == intent.to
                    && m.promo.map_or(true, |p| p == wanted_promo)
            })
            .ok_or_else(|| MoveError::Illegal(intent.to_string()))
    }

    fn evaluate_status(&self) -> GameStatus {
        let pos = &self.position;
        if !has_legal_move(pos) {
            return if pos.in_check(pos.side_to_move) {
                GameStatus::Checkmate {
                    winner: pos.side_to_move.other(),
                }
            } else {
                GameStatus::Stalemate
            };
        }
        if pos.is_fifty_move_draw() {
            return GameStatus::Draw {
                reason: DrawReason::FiftyMoveRule,
            };
        }
        if pos.is_insufficient_material() {
            return GameStatus::Draw {
                reason: DrawReason::InsufficientMaterial,
            };
        }
        let current = pos.position_hash();
        if self.repetitions.iter().filter(|&&h| h == current).count() >= 3 {
            return GameStatus::Draw {
                reason: DrawReason::ThreefoldRepetition,
            };
        }
        GameStatus::InProgress
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
