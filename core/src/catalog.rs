use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// One playable note: a name plus the handles the presentation layer resolves to an image and a tone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: None,
            tone: None,
        }
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }
}

/// Ordered set of distinct symbols a deck can be drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.len() > usize::from(u16::MAX) {
            return Err(GameError::InvalidConfig("symbol catalog is too large"));
        }

        let mut seen = BTreeSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.name.as_str()) {
                log::warn!("Duplicate symbol {:?} in catalog", symbol.name);
                return Err(GameError::DuplicateSymbol);
            }
        }

        Ok(Self { symbols })
    }

    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Symbol::new).collect())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        (0..self.symbols.len() as u16).map(SymbolId)
    }

    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|symbol| symbol.name == name)
            .map(|index| SymbolId(index as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId(index as u16), symbol))
    }
}

impl TryFrom<Vec<Symbol>> for SymbolCatalog {
    type Error = GameError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolCatalog> for Vec<Symbol> {
    fn from(catalog: SymbolCatalog) -> Self {
        catalog.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let result = SymbolCatalog::from_names(["C4", "D4", "C4"]);

        assert_eq!(result, Err(GameError::DuplicateSymbol));
    }

    #[test]
    fn ids_follow_catalog_order() {
        let catalog = SymbolCatalog::from_names(["A2", "B2", "C2"]).unwrap();

        assert_eq!(catalog.id_of("B2"), Some(SymbolId(1)));
        assert_eq!(catalog.get(SymbolId(2)).map(|s| s.name.as_str()), Some("C2"));
        assert_eq!(catalog.get(SymbolId(3)), None);
        assert_eq!(catalog.ids().count(), 3);
    }

    #[test]
    fn deserializes_from_symbol_list() {
        let json = r#"[{"name": "C4", "tone": "piano-mp3/C4.mp3"}, {"name": "D4"}]"#;

        let catalog: SymbolCatalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(SymbolId(0)).and_then(|s| s.tone.as_deref()),
            Some("piano-mp3/C4.mp3")
        );
        assert!(serde_json::from_str::<SymbolCatalog>(r#"[{"name": "C4"}, {"name": "C4"}]"#).is_err());
    }
}
