//! Core of the Truc Xanh musical memory game.
//!
//! The crate owns the rules only: dealing a deck, flipping cards, resolving pairs, rotating turns and
//! expiring the timed effects. Drawing and sound are left to a [`Presenter`] and time is always supplied
//! by the caller, so a game is fully determined by its seed and its input/time sequence.

#![no_std]

extern crate alloc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use presenter::*;
pub use router::*;
pub use scheduler::*;
pub use session::*;
pub use state::*;
pub use types::*;

mod card;
mod catalog;
mod config;
mod engine;
mod error;
mod generator;
mod presenter;
mod router;
mod scheduler;
mod session;
mod state;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupOutcome {
    NoChange,
    /// Choice recorded, the other one is still missing
    Pending,
    Started,
}

impl SetupOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    NoChange,
    Flipped,
    Matched,
    Mismatched,
    Won,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        use FlipOutcome::*;
        match self {
            NoChange => false,
            Flipped => true,
            Matched => true,
            Mismatched => true,
            Won => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintOutcome {
    NoChange,
    Revealed(CardIndex),
}

impl HintOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenOutcome {
    NoChange,
    Changed,
}

impl ScreenOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

bitflags! {
    /// Deadlines applied by a single tick.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TickOutcome: u8 {
        const UNFLIPPED       = 1;
        const MESSAGE_CLEARED = 1 << 1;
        const HINT_CLEARED    = 1 << 2;
    }
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !self.is_empty()
    }
}
