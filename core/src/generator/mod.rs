use alloc::vec::Vec;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Source of deck orderings.
///
/// Implementations may assume `1 <= pairs <= catalog.len()`; [`build_deck`] checks it before asking.
pub trait DeckGenerator {
    /// Returns the `2 * pairs` symbols of a new deck in board order.
    fn deal(&mut self, pairs: PairCount, catalog: &SymbolCatalog) -> Result<Vec<SymbolId>>;
}

impl<G: DeckGenerator + ?Sized> DeckGenerator for &mut G {
    fn deal(&mut self, pairs: PairCount, catalog: &SymbolCatalog) -> Result<Vec<SymbolId>> {
        (**self).deal(pairs, catalog)
    }
}

/// Builds a positioned deck of `2 * pairs` cards laid out row-major in a `rows` by `cols` grid.
pub fn build_deck<G: DeckGenerator + ?Sized>(
    generator: &mut G,
    pairs: PairCount,
    catalog: &SymbolCatalog,
    (rows, cols): (u16, u16),
    board: &BoardMetrics,
) -> Result<Vec<Card>> {
    if pairs == 0 {
        return Err(GameError::InvalidConfig("a deck needs at least one pair"));
    }
    if usize::from(pairs) > catalog.len() {
        return Err(GameError::insufficient(pairs, catalog.len()));
    }

    let card_count = usize::from(pairs) * 2;
    if usize::from(rows) * usize::from(cols) < card_count {
        return Err(GameError::GridTooSmall {
            rows,
            cols,
            cards: card_count,
        });
    }

    let symbols = generator.deal(pairs, catalog)?;
    if symbols.len() != card_count {
        log::warn!(
            "Generator dealt {} cards, expected {}",
            symbols.len(),
            card_count
        );
        return Err(GameError::InvalidConfig("generator dealt the wrong number of cards"));
    }

    let cards = symbols
        .into_iter()
        .enumerate()
        .map(|(id, symbol)| {
            // both bounded by rows * cols, which fits since rows and cols are u16
            let row = (id / usize::from(cols)) as u16;
            let col = (id % usize::from(cols)) as u16;
            Card::new(id, symbol, board.cell_rect((rows, cols), (row, col)))
        })
        .collect();
    log::debug!("Built deck of {} cards on a {}x{} grid", card_count, rows, cols);
    Ok(cards)
}
