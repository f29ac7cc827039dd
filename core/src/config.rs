use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// The two board sizes offered on the menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    pub small: PairCount,
    pub large: PairCount,
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            small: 10,
            large: 20,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOverride {
    pub pairs: PairCount,
    pub rows: u16,
}

/// Chooses the grid dimensions for a given number of pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPolicy {
    pub default_rows: u16,
    pub overrides: Vec<GridOverride>,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            default_rows: 5,
            overrides: alloc::vec![GridOverride { pairs: 10, rows: 4 }],
        }
    }
}

impl GridPolicy {
    pub fn rows_for(&self, pairs: PairCount) -> u16 {
        self.overrides
            .iter()
            .find(|rule| rule.pairs == pairs)
            .map_or(self.default_rows, |rule| rule.rows)
            .max(1)
    }

    /// Returns `(rows, cols)` with enough cells for every card.
    pub fn dimensions(&self, pairs: PairCount) -> (u16, u16) {
        let rows = self.rows_for(pairs);
        let cards = u32::from(pairs) * 2;
        let cols = cards.div_ceil(u32::from(rows)).max(1);
        (rows, u16::try_from(cols).unwrap_or(u16::MAX))
    }
}

/// Pixel geometry used to place cards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardMetrics {
    pub viewport: (u32, u32),
    pub card_size: u32,
    pub margin: u32,
}

impl Default for BoardMetrics {
    fn default() -> Self {
        Self {
            viewport: (800, 600),
            card_size: 90,
            margin: 10,
        }
    }
}

impl BoardMetrics {
    /// Rectangle of the cell at `(row, col)` for a grid of `rows` by `cols`, centred in the viewport.
    pub fn cell_rect(&self, (rows, cols): (u16, u16), (row, col): (u16, u16)) -> Rect {
        let spacing = i64::from(self.card_size) + i64::from(self.margin);
        let span = |count: u16| i64::from(count) * spacing - i64::from(self.margin);
        let origin_x = (i64::from(self.viewport.0) - span(cols)).div_euclid(2);
        let origin_y = (i64::from(self.viewport.1) - span(rows)).div_euclid(2);

        let clamp = |value: i64| value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Rect::new(
            clamp(origin_x + i64::from(col) * spacing),
            clamp(origin_y + i64::from(row) * spacing),
            self.card_size,
            self.card_size,
        )
    }
}

/// Tunables of a game; every field has a default matching the stock game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub presets: Presets,
    pub grid: GridPolicy,
    pub board: BoardMetrics,
    pub hints_per_game: u8,
    pub hint_duration_ms: u64,
    pub message_duration_ms: u64,
    pub mismatch_wait_ms: u64,
    pub tick_rate_hz: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            presets: Presets::default(),
            grid: GridPolicy::default(),
            board: BoardMetrics::default(),
            hints_per_game: 5,
            hint_duration_ms: 3_000,
            message_duration_ms: 1_000,
            mismatch_wait_ms: 1_000,
            tick_rate_hz: 60,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.presets.small == 0 || self.presets.large == 0 {
            return Err(GameError::InvalidConfig("pair presets must be positive"));
        }
        if self.grid.default_rows == 0 || self.grid.overrides.iter().any(|rule| rule.rows == 0) {
            return Err(GameError::InvalidConfig("grid rows must be positive"));
        }
        if self.board.card_size == 0 {
            return Err(GameError::InvalidConfig("card size must be positive"));
        }
        if self.hint_duration_ms == 0 || self.message_duration_ms == 0 || self.mismatch_wait_ms == 0
        {
            return Err(GameError::InvalidConfig("timer durations must be positive"));
        }
        if self.tick_rate_hz == 0 {
            return Err(GameError::InvalidConfig("tick rate must be positive"));
        }
        Ok(())
    }

    /// Fails when a preset asks for more pairs than the catalog holds.
    pub fn validate_with(&self, catalog: &SymbolCatalog) -> Result<()> {
        self.validate()?;
        let largest = self.presets.small.max(self.presets.large);
        if usize::from(largest) > catalog.len() {
            return Err(GameError::insufficient(largest, catalog.len()));
        }
        Ok(())
    }

    pub const fn hint_duration(&self) -> Duration {
        Duration::from_millis(self.hint_duration_ms)
    }

    pub const fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    pub const fn mismatch_wait(&self) -> Duration {
        Duration::from_millis(self.mismatch_wait_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_grid_dimensions() {
        let grid = GridPolicy::default();

        assert_eq!(grid.dimensions(10), (4, 5));
        assert_eq!(grid.dimensions(20), (5, 8));
        assert_eq!(grid.dimensions(7), (5, 3));
        assert_eq!(grid.dimensions(1), (5, 1));
    }

    #[test]
    fn cells_are_centred_in_viewport() {
        let board = BoardMetrics::default();

        // 5 columns: 5 * 100 - 10 = 490 wide, 4 rows: 390 tall
        assert_eq!(board.cell_rect((4, 5), (0, 0)), Rect::new(155, 105, 90, 90));
        assert_eq!(board.cell_rect((4, 5), (3, 4)), Rect::new(555, 405, 90, 90));
    }

    #[test]
    fn validation_rejects_zero_values() {
        let mut config = GameConfig::default();
        assert!(config.validate().is_ok());

        config.mismatch_wait_ms = 0;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.presets.large = 30;
        let catalog = SymbolCatalog::from_names(["C", "D", "E"]).unwrap();
        assert_eq!(
            config.validate_with(&catalog),
            Err(GameError::InsufficientSymbols {
                requested: 30,
                available: 3
            })
        );
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"hints_per_game": 2}"#).unwrap();

        assert_eq!(config.hints_per_game, 2);
        assert_eq!(config.presets, Presets::default());
        assert_eq!(config.mismatch_wait(), Duration::from_secs(1));
    }
}
