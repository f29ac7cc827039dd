use super::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::{SliceRandom, index};

/// Uniformly random decks: symbols are sampled without replacement, then the doubled deck is shuffled.
#[derive(Clone, Debug)]
pub struct ShuffledDeckGenerator {
    rng: SmallRng,
}

impl ShuffledDeckGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DeckGenerator for ShuffledDeckGenerator {
    fn deal(&mut self, pairs: PairCount, catalog: &SymbolCatalog) -> Result<Vec<SymbolId>> {
        let pairs = usize::from(pairs);
        if pairs > catalog.len() {
            return Err(GameError::InsufficientSymbols {
                requested: pairs,
                available: catalog.len(),
            });
        }

        let chosen: Vec<SymbolId> = index::sample(&mut self.rng, catalog.len(), pairs)
            .into_iter()
            .map(|index| SymbolId(index as u16))
            .collect();
        log::trace!("Chose symbols {:?}", chosen);

        let mut deck: Vec<SymbolId> = chosen.iter().chain(chosen.iter()).copied().collect();
        deck.shuffle(&mut self.rng);
        Ok(deck)
    }
}
