use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Engine configuration. Every field has a default, so an empty TOML file
/// (or `GameConfig::default()`) gives the classic game: 4x4 board, two seed
/// tiles, 10% fours.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Tiles per row/column. Fixed for the whole session; the UI reads it to
    /// size its rendering grid, the engine to bound the cell array.
    #[serde(default = "defaults::board_size")]
    pub board_size: usize,

    /// Seed for the session RNG. Omit for entropy; set for reproducible
    /// games and tests.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub spawn: Spawn,
}

/// New-tile spawn policy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Spawn {
    /// Probability that a spawned tile is a 4 instead of a 2.
    #[serde(default = "defaults::four_chance")]
    pub four_chance: f64,

    /// Tiles seeded by a new game.
    #[serde(default = "defaults::initial_tiles")]
    pub initial_tiles: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            seed: None,
            spawn: Spawn::default(),
        }
    }
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            four_chance: defaults::four_chance(),
            initial_tiles: defaults::initial_tiles(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl GameConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Bounds checks for hand-written config files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "board_size must be at least 2, got {}",
                self.board_size
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn.four_chance) {
            return Err(ConfigError::Invalid(format!(
                "spawn.four_chance must be within [0, 1], got {}",
                self.spawn.four_chance
            )));
        }
        if self.spawn.initial_tiles == 0
            || self.spawn.initial_tiles > self.board_size * self.board_size
        {
            return Err(ConfigError::Invalid(format!(
                "spawn.initial_tiles must fit the board, got {}",
                self.spawn.initial_tiles
            )));
        }
        Ok(())
    }
}

mod defaults {
    pub fn board_size() -> usize {
        4
    }
    pub fn four_chance() -> f64 {
        0.1
    }
    pub fn initial_tiles() -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_classic_game() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.board_size, 4);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.spawn.four_chance, 0.1);
        assert_eq!(cfg.spawn.initial_tiles, 2);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: GameConfig = toml::from_str(
            r#"
            board_size = 5
            [spawn]
            four_chance = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(cfg.board_size, 5);
        assert_eq!(cfg.spawn.four_chance, 0.25);
        assert_eq!(cfg.spawn.initial_tiles, 2);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cfg: GameConfig = toml::from_str("board_size = 1").unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let cfg: GameConfig = toml::from_str(
            r#"
            [spawn]
            four_chance = 1.5
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let cfg: GameConfig = toml::from_str(
            r#"
            board_size = 2
            [spawn]
            initial_tiles = 5
            "#,
        )
        .unwrap();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }
}
