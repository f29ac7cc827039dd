use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use trucxanh_core::{GameConfig, SymbolCatalog};

/// Stock settings with the 29 piano notes.
pub const DEFAULT_CONFIG: &str = include_str!("../default.toml");

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub game: GameConfig,
    pub symbols: SymbolCatalog,
}

impl AppConfig {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config
            .game
            .validate_with(&config.symbols)
            .context("Rejected game settings")?;
        Ok(config)
    }

    /// Reads `path`, or the bundled settings when none is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
            }
            None => Self::parse(DEFAULT_CONFIG).context("Invalid bundled config"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_stock_game() {
        let config = AppConfig::load(None).unwrap();

        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.symbols.len(), 29);
        let c4 = config.symbols.id_of("C4").unwrap();
        let symbol = config.symbols.get(c4).unwrap();
        assert_eq!(symbol.asset.as_deref(), Some("images/C4.png"));
        assert_eq!(symbol.tone.as_deref(), Some("piano-mp3/C4.mp3"));
    }

    #[test]
    fn game_section_is_optional() {
        let config = AppConfig::parse(
            r#"
            [[symbols]]
            name = "x"
            [[symbols]]
            name = "y"
            "#,
        );

        // default presets want 20 symbols
        assert!(config.is_err());

        let config = AppConfig::parse(
            r#"
            [game.presets]
            small = 1
            large = 2

            [[symbols]]
            name = "x"
            [[symbols]]
            name = "y"
            "#,
        )
        .unwrap();
        assert_eq!(config.game.presets.large, 2);
        assert_eq!(config.game.hints_per_game, 5);
    }

    #[test]
    fn duplicate_symbols_are_rejected() {
        let config = AppConfig::parse(
            r#"
            [game.presets]
            small = 1
            large = 1

            [[symbols]]
            name = "x"
            [[symbols]]
            name = "x"
            "#,
        );

        assert!(config.is_err());
    }
}
