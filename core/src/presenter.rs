use core::fmt;

use crate::*;

/// Read-only view handed to the presentation layer once per frame.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    pub now: Timestamp,
    pub state: &'a MatchState,
    pub buttons: &'a [Button],
    pub catalog: &'a SymbolCatalog,
}

/// Drawing and sound, implemented outside the core.
pub trait Presenter {
    type Error: fmt::Display;

    fn render(&mut self, frame: &Frame<'_>);

    /// Fire-and-forget; a failure is logged and otherwise ignored.
    fn play_tone(&mut self, symbol: &Symbol) -> core::result::Result<(), Self::Error>;
}
