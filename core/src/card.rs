use serde::{Deserialize, Serialize};

use crate::{CardIndex, Rect, SymbolId};

/// A single card on the board.
///
/// Cards are created by a [`DeckGenerator`](crate::DeckGenerator) and afterwards only mutated by the
/// [`MatchEngine`](crate::MatchEngine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub(crate) id: CardIndex,
    pub(crate) symbol: SymbolId,
    pub(crate) position: Rect,
    pub(crate) is_flipped: bool,
    pub(crate) is_matched: bool,
    pub(crate) is_hint: bool,
}

impl Card {
    pub const fn new(id: CardIndex, symbol: SymbolId, position: Rect) -> Self {
        Self {
            id,
            symbol,
            position,
            is_flipped: false,
            is_matched: false,
            is_hint: false,
        }
    }

    pub const fn id(&self) -> CardIndex {
        self.id
    }

    pub const fn symbol(&self) -> SymbolId {
        self.symbol
    }

    pub const fn position(&self) -> Rect {
        self.position
    }

    pub const fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub const fn is_matched(&self) -> bool {
        self.is_matched
    }

    pub const fn is_hint(&self) -> bool {
        self.is_hint
    }

    /// Whether the symbol face should be drawn.
    pub const fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched || self.is_hint
    }

    pub const fn can_flip(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }
}
