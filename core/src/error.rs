use thiserror::Error;

use crate::{CardIndex, PairCount};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Requested {requested} pairs but the catalog only has {available} symbols")]
    InsufficientSymbols { requested: usize, available: usize },
    #[error("A {rows}x{cols} grid cannot hold {cards} cards")]
    GridTooSmall { rows: u16, cols: u16, cards: usize },
    #[error("Symbol catalog contains a duplicate entry")]
    DuplicateSymbol,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Card {0} does not belong to the current board")]
    InvalidReference(CardIndex),
}

impl GameError {
    /// Setup-time errors that the caller can recover from by choosing again.
    pub const fn is_configuration(self) -> bool {
        !matches!(self, Self::InvalidReference(_))
    }

    pub(crate) fn insufficient(requested: PairCount, available: usize) -> Self {
        Self::InsufficientSymbols {
            requested: requested.into(),
            available,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
