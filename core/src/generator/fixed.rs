use super::*;

/// Deals a predetermined symbol order, e.g. to replay a known board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDeckGenerator {
    order: Vec<SymbolId>,
}

impl FixedDeckGenerator {
    pub fn new(order: Vec<SymbolId>) -> Self {
        Self { order }
    }

    /// Resolves symbol names against `catalog`; unknown names are an [`GameError::InvalidConfig`].
    pub fn from_names(catalog: &SymbolCatalog, names: &[&str]) -> Result<Self> {
        names
            .iter()
            .map(|name| {
                catalog
                    .id_of(name)
                    .ok_or(GameError::InvalidConfig("fixed deck names an unknown symbol"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}

impl DeckGenerator for FixedDeckGenerator {
    fn deal(&mut self, pairs: PairCount, catalog: &SymbolCatalog) -> Result<Vec<SymbolId>> {
        if self.order.len() != usize::from(pairs) * 2 {
            return Err(GameError::InvalidConfig("fixed deck does not match the pair count"));
        }
        if self.order.iter().any(|id| catalog.get(*id).is_none()) {
            return Err(GameError::InvalidConfig("fixed deck names an unknown symbol"));
        }
        let pairs_intact = self
            .order
            .iter()
            .all(|id| self.order.iter().filter(|other| *other == id).count() == 2);
        if !pairs_intact {
            return Err(GameError::InvalidConfig("fixed deck must hold every symbol twice"));
        }
        Ok(self.order.clone())
    }
}
