//! UCI long-algebraic move tokens (`e2e4`, `e7e8q`).

use std::fmt;
use std::str::FromStr;

use crate::error::ParseMoveError;
use crate::types::*;

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", sq_to_coord(self.from), sq_to_coord(self.to))?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

/// Four characters name origin and destination; a fifth names the
/// promotion piece. Anything else is refused.
impl FromStr for MoveIntent {
    type Err = ParseMoveError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(token.to_string());
        if !token.is_ascii() || !(4..=5).contains(&token.len()) {
            return Err(err());
        }
        let from = coord_to_sq(&token[0..2]).ok_or_else(err)?;
        let to = coord_to_sq(&token[2..4]).ok_or_else(err)?;
        let promotion = match token[4..].chars().next() {
            None => None,
            Some(ch) => Some(PieceKind::from_char(ch).ok_or_else(err)?),
        };
        Ok(MoveIntent {
            from,
            to,
            promotion,
        })
    }
}
